//! Bordered button used for the form submit action

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a centered button; `is_ready` lights it up once the form is complete
pub fn render_button(frame: &mut Frame, area: Rect, label: &str, is_ready: bool) {
    let (border_style, text_style) = if is_ready {
        (
            Style::default().fg(Color::Green),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Gray),
        )
    };

    let width = (label.chars().count() as u16 + 4).min(area.width);
    let button_area = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let paragraph = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(paragraph, button_area);
}
