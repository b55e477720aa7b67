//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Text and border styles for a field box
fn field_styles(is_active: bool) -> (Style, Style) {
    if is_active {
        (Style::default().fg(Color::Cyan), Style::default().fg(Color::Cyan))
    } else {
        (Style::default().fg(Color::Gray), Style::default().fg(Color::DarkGray))
    }
}

/// Draw a form field from the domain layer
///
/// Dropdowns render as a selector; required fields get a `*` in the title.
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let title = if field.descriptor.required {
        format!(" {} * ", field.label())
    } else {
        format!(" {} ", field.label())
    };

    if field.descriptor.is_dropdown() {
        draw_selector(frame, area, &title, &field.display_value(), is_active);
        return;
    }

    let (style, border_style) = field_styles(is_active);
    let display_value = field.display_value();
    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_value, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.block(block), area);
}

/// Draw a value picked with Left/Right
pub fn draw_selector(frame: &mut Frame, area: Rect, title: &str, value: &str, is_active: bool) {
    let (style, border_style) = field_styles(is_active);
    let arrow_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled("◂ ", arrow_style),
        Span::styled(value.to_string(), style),
        Span::styled(" ▸", arrow_style),
    ]));

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.block(block), area);
}
