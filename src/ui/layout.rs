//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::Mode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const QUIT_HINT: &str = " ^C:quit ";

/// Split the screen into the content area and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = app.controller.mode();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode.label().to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(mode_hints(mode), Style::default().fg(Color::Gray)),
    ];

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let count = app.controller.store().len();
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("{count} saved"),
        Style::default().fg(Color::Blue),
    ));

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let width = (QUIT_HINT.len() as u16).min(area.width);
    let quit_area = Rect {
        x: area.x + area.width - width,
        width,
        ..area
    };
    let quit_widget =
        Paragraph::new(QUIT_HINT).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current mode
fn mode_hints(mode: Mode) -> String {
    match mode {
        Mode::Editing => format!("Tab:next  ←→:choose  Enter/{SUBMIT_SHORTCUT}:submit"),
        Mode::Reviewing => "j/k:nav  e:edit  d:delete  Esc:back".to_string(),
    }
}
