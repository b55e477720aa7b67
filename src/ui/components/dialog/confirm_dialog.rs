//! Confirmation dialog for deleting a submitted entry

use super::base::{key_hints, render_dialog, DialogConfig};
use crate::app::PendingDelete;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

const MAX_DISPLAY_LEN: usize = 30;

/// Render the Cancel / Delete choice for a pending delete
pub fn render_confirm_dialog(frame: &mut Frame, pending: &PendingDelete) {
    let message = format!(
        "Delete {} entry #{} \"{}\"?",
        pending.form_type,
        pending.id,
        truncate_string(&pending.entry_display, MAX_DISPLAY_LEN)
    );

    // false = Cancel, true = Delete
    let options = [(false, "Cancel", Color::White), (true, "Delete", Color::Red)];
    let body = options
        .into_iter()
        .map(|(is_delete, label, color)| {
            if pending.selected_option == is_delete {
                Line::from(Span::styled(
                    format!("▸ {label}"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(Color::DarkGray),
                ))
            }
        })
        .collect();

    render_dialog(
        frame,
        DialogConfig {
            title: "Confirm Delete",
            color: Color::Red,
            message: &message,
            body,
            hint: Some(key_hints(&[
                ("↑↓", "select"),
                ("Enter", "confirm"),
                ("Esc", "cancel"),
            ])),
            max_width: 50,
        },
    );
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
