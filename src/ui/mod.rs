//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod tables;

use crate::app::App;
use crate::state::Mode;
use components::{render_confirm_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match app.controller.mode() {
        Mode::Editing => forms::draw_form(frame, main_area, app),
        Mode::Reviewing => tables::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Dialogs on top, error last so it stays visible
    if let Some(pending) = &app.pending_delete {
        render_confirm_dialog(frame, pending);
    }
    if let Some(message) = app.current_error() {
        render_error_dialog(frame, message);
    }
}
