//! Dynamic form rendering (type selector, fields, progress, submit)

use super::field_renderer::{draw_field, draw_selector};
use crate::app::{App, FormFocus};
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::Form;
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

const FORM_WIDTH: u16 = 60;
const FIELD_HEIGHT: u16 = 3;

/// Draw the form view
pub fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.controller.session();
    let fields = session.fields();

    let width = area.width.min(FORM_WIDTH);
    let form_area = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let title = match session.editing_entry_id() {
        Some(id) => format!(" Edit Entry #{id} "),
        None => " Dynamic Form ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let has_type = session.active_type().is_some();
    let mut constraints = vec![Constraint::Length(FIELD_HEIGHT)]; // Type selector
    constraints.extend(fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    if has_type {
        constraints.push(Constraint::Length(3)); // Progress
        constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Submit
    }
    constraints.push(Constraint::Length(1)); // Help text
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let type_label = session
        .active_type()
        .map(|t| t.title())
        .unwrap_or("Choose...");
    draw_selector(
        frame,
        chunks[0],
        " Select Form ",
        type_label,
        app.form_focus == FormFocus::TypeSelector,
    );

    for (idx, field) in fields.iter().enumerate() {
        let is_active =
            app.form_focus == FormFocus::Fields && session.active_field() == idx;
        draw_field(frame, chunks[idx + 1], field, is_active);
    }

    let mut next = fields.len() + 1;
    if has_type {
        let completion = session.completion();
        draw_progress(frame, chunks[next], completion);
        let label = if session.editing_entry_id().is_some() {
            "Update"
        } else {
            "Submit"
        };
        render_button(frame, chunks[next + 1], label, completion >= 100);
        next += 2;
    }

    draw_help_text(frame, chunks[next], has_type);
}

/// Completion gauge; optional fields count as filled
fn draw_progress(frame: &mut Frame, area: Rect, percent: u8) {
    let color = if percent >= 100 {
        Color::Green
    } else {
        Color::Blue
    };
    let gauge = Gauge::default()
        .block(Block::default().title(" Progress ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(percent.min(100)))
        .label(format!("{percent}%"));
    frame.render_widget(gauge, area);
}

fn draw_help_text(frame: &mut Frame, area: Rect, has_type: bool) {
    let key = Style::default().fg(Color::Cyan);
    let spans = if has_type {
        vec![
            Span::styled("Tab", key),
            Span::raw(": next  "),
            Span::styled("◂▸", key),
            Span::raw(": choose  "),
            Span::styled(format!("Enter/{SUBMIT_SHORTCUT}"), key),
            Span::raw(": submit"),
        ]
    } else {
        vec![
            Span::styled("◂▸", key),
            Span::raw(": pick a form type"),
        ]
    };
    let help = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
