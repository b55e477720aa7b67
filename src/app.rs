//! Application state and core logic

use crate::platform::SUBMIT_MODIFIER;
use crate::state::{
    Entry, EntryId, FieldEdit, Form, FormError, FormEvent, FormType, Mode, ViewController,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;

/// Which row of the form has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    /// The form type selector above the fields
    #[default]
    TypeSelector,
    /// One of the schema fields (index kept by the session)
    Fields,
}

/// Delete awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub form_type: FormType,
    pub id: EntryId,
    /// Short description of the entry shown in the dialog
    pub entry_display: String,
    /// true = "Delete" highlighted, false = "Cancel"
    pub selected_option: bool,
}

/// Main application struct
pub struct App {
    /// Form session, submission store and view state
    pub controller: ViewController,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar until the next key press
    pub status_message: Option<String>,
    /// Errors shown one at a time in a modal dialog
    errors: VecDeque<String>,
    pub form_focus: FormFocus,
    /// Selected row across all review tables
    pub selected_row: usize,
    pub pending_delete: Option<PendingDelete>,
}

impl App {
    /// Create a new App instance
    pub fn new(controller: ViewController) -> Self {
        let form_focus = if controller.session().active_type().is_some() {
            FormFocus::Fields
        } else {
            FormFocus::TypeSelector
        };
        Self {
            controller,
            quit: false,
            status_message: None,
            errors: VecDeque::new(),
            form_focus,
            selected_row: 0,
            pending_delete: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push_back(message.into());
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Every stored entry in table order
    pub fn review_rows(&self) -> Vec<&Entry> {
        let store = self.controller.store();
        store
            .non_empty_types()
            .into_iter()
            .flat_map(|t| store.list_entries(t).iter())
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.review_rows().get(self.selected_row).copied()
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_error();
            }
            return Ok(());
        }

        // Handle delete confirmation (modal)
        if self.pending_delete.is_some() {
            self.handle_confirm_delete_key(key);
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        match self.controller.mode() {
            Mode::Editing => self.handle_form_key(key),
            Mode::Reviewing => self.handle_review_key(key),
        }
        Ok(())
    }

    /// Surface a failed transition without touching state
    fn report(&mut self, result: Result<(), FormError>) {
        if let Err(e) = result {
            tracing::debug!("Rejected: {e}");
            self.push_error(e.to_string());
        }
    }

    /// Handle keys while filling in a form
    fn handle_form_key(&mut self, key: KeyEvent) {
        let on_type_row = self.form_focus == FormFocus::TypeSelector;

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(SUBMIT_MODIFIER) => self.submit(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.next_row(),
            KeyCode::BackTab | KeyCode::Up => self.prev_row(),
            KeyCode::Left | KeyCode::Right if on_type_row => {
                self.cycle_form_type(key.code == KeyCode::Right)
            }
            KeyCode::Left | KeyCode::Right => self.edit_active_field(FieldEdit::Cycle {
                forward: key.code == KeyCode::Right,
            }),
            KeyCode::Char(c)
                if !on_type_row
                    && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit_active_field(FieldEdit::Insert(c));
            }
            KeyCode::Backspace if !on_type_row => self.edit_active_field(FieldEdit::Backspace),
            _ => {}
        }
    }

    /// Switch to the neighbouring form type; typed values are discarded
    fn cycle_form_type(&mut self, forward: bool) {
        let session = self.controller.session();
        let next = FormType::cycle(session.active_type(), forward);
        let discarded = session
            .values()
            .values()
            .filter(|v| !v.trim().is_empty())
            .count();

        let result = self.controller.handle(FormEvent::TypeChanged(next));
        if result.is_ok() && discarded > 0 {
            self.status_message = Some(format!("Discarded {discarded} filled field(s)"));
        }
        self.report(result);
    }

    /// Turn a keystroke on the active field into a field change event
    fn edit_active_field(&mut self, edit: FieldEdit) {
        let Some((name, value)) = self.controller.session().preview_edit(edit) else {
            return;
        };
        let result = self.controller.handle(FormEvent::FieldChanged {
            name: name.to_string(),
            value,
        });
        self.report(result);
    }

    /// Move the cursor down: type selector, then each field, then wrap
    fn next_row(&mut self) {
        let Some(session) = self.controller.session_mut() else {
            return;
        };
        let count = session.field_count();
        match self.form_focus {
            FormFocus::TypeSelector if count > 0 => {
                session.set_active_field(0);
                self.form_focus = FormFocus::Fields;
            }
            FormFocus::TypeSelector => {}
            FormFocus::Fields if session.active_field() + 1 >= count => {
                self.form_focus = FormFocus::TypeSelector;
            }
            FormFocus::Fields => session.next_field(),
        }
    }

    /// Move the cursor up, wrapping from the selector to the last field
    fn prev_row(&mut self) {
        let Some(session) = self.controller.session_mut() else {
            return;
        };
        let count = session.field_count();
        match self.form_focus {
            FormFocus::TypeSelector if count > 0 => {
                session.set_active_field(count - 1);
                self.form_focus = FormFocus::Fields;
            }
            FormFocus::TypeSelector => {}
            FormFocus::Fields if session.active_field() == 0 => {
                self.form_focus = FormFocus::TypeSelector;
            }
            FormFocus::Fields => session.prev_field(),
        }
    }

    fn submit(&mut self) {
        let session = self.controller.session();
        let form_type = session.active_type();
        let editing = session.editing_entry_id();

        match self.controller.handle(FormEvent::SubmitRequested) {
            Ok(()) => {
                let msg = if editing.is_some() {
                    "Entry updated"
                } else {
                    "Entry saved"
                };
                self.status_message = Some(msg.to_string());

                // Appended entries land at the end of their type's table
                let store = self.controller.store();
                let id = editing.or_else(|| {
                    form_type
                        .and_then(|t| store.list_entries(t).last())
                        .map(|e| e.id)
                });
                self.selected_row = self
                    .review_rows()
                    .iter()
                    .position(|e| Some(e.id) == id)
                    .unwrap_or(0);
            }
            Err(e) => {
                if let Some(name) = e.missing_fields().first() {
                    self.focus_field(name);
                }
                self.report(Err(e));
            }
        }
    }

    /// Put the cursor on a field of the active form
    fn focus_field(&mut self, name: &str) {
        let Some(session) = self.controller.session_mut() else {
            return;
        };
        if let Some(index) = session.schema().iter().position(|d| d.name == name) {
            session.set_active_field(index);
            self.form_focus = FormFocus::Fields;
        }
    }

    /// Handle keys on the submitted-entries tables
    fn handle_review_key(&mut self, key: KeyEvent) {
        let row_count = self.review_rows().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if row_count > 0 && self.selected_row < row_count - 1 {
                    self.selected_row += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(entry) = self.selected_entry() {
                    let event = FormEvent::EditRequested {
                        form_type: entry.form_type(),
                        id: entry.id,
                    };
                    let result = self.controller.handle(event);
                    if result.is_ok() {
                        self.form_focus = FormFocus::Fields;
                    }
                    self.report(result);
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => self.start_delete(),
            KeyCode::Esc | KeyCode::Char('b') => {
                let result = self.controller.handle(FormEvent::GoBackRequested);
                if result.is_ok() {
                    self.form_focus = FormFocus::TypeSelector;
                }
                self.report(result);
            }
            _ => {}
        }
    }

    fn start_delete(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let (form_type, id) = (entry.form_type(), entry.id);
        let entry_display = entry
            .record
            .fields()
            .into_iter()
            .map(|(_, v)| v)
            .find(|v| !v.trim().is_empty())
            .unwrap_or("entry")
            .to_string();
        self.pending_delete = Some(PendingDelete {
            form_type,
            id,
            entry_display,
            selected_option: false,
        });
    }

    fn handle_confirm_delete_key(&mut self, key: KeyEvent) {
        let Some(pending) = self.pending_delete.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                pending.selected_option = !pending.selected_option;
            }
            KeyCode::Char('y') => {
                pending.selected_option = true;
                self.confirm_delete();
            }
            KeyCode::Enter => self.confirm_delete(),
            KeyCode::Esc | KeyCode::Char('n') => self.pending_delete = None,
            _ => {}
        }
    }

    fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        if !pending.selected_option {
            return;
        }
        let result = self.controller.handle(FormEvent::DeleteRequested {
            form_type: pending.form_type,
            id: pending.id,
        });
        if result.is_ok() {
            self.status_message = Some("Entry deleted".to_string());
            let rows = self.review_rows().len();
            self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        }
        self.report(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn app() -> App {
        App::new(ViewController::new(Box::new(MemoryStore::new())))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Select the user form and fill both names
    fn submit_user(app: &mut App, first: &str, last: &str) {
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        type_text(app, first);
        press(app, KeyCode::Tab);
        type_text(app, last);
        press(app, KeyCode::Enter);
    }

    mod form {
        use super::*;

        #[test]
        fn test_starts_on_type_selector() {
            let app = app();
            assert_eq!(app.form_focus, FormFocus::TypeSelector);
            assert!(!app.should_quit());
        }

        #[test]
        fn test_arrows_cycle_form_type() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            assert_eq!(app.controller.session().active_type(), Some(FormType::User));
            press(&mut app, KeyCode::Right);
            assert_eq!(
                app.controller.session().active_type(),
                Some(FormType::Address)
            );
            press(&mut app, KeyCode::Left);
            press(&mut app, KeyCode::Left);
            assert_eq!(app.controller.session().active_type(), None);
        }

        #[test]
        fn test_switching_type_reports_discarded_values() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Tab);
            type_text(&mut app, "Ada");
            press(&mut app, KeyCode::BackTab);
            press(&mut app, KeyCode::Right);

            assert_eq!(
                app.controller.session().active_type(),
                Some(FormType::Address)
            );
            assert!(app.controller.session().values().is_empty());
            assert_eq!(
                app.status_message.as_deref(),
                Some("Discarded 1 filled field(s)")
            );
        }

        #[test]
        fn test_typing_on_selector_is_ignored() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            type_text(&mut app, "abc");
            assert!(app.controller.session().values().is_empty());
        }

        #[test]
        fn test_tab_walks_fields_and_wraps() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            for _ in 0..3 {
                press(&mut app, KeyCode::Tab);
                assert_eq!(app.form_focus, FormFocus::Fields);
            }
            assert_eq!(app.controller.session().active_field(), 2);
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.form_focus, FormFocus::TypeSelector);
            press(&mut app, KeyCode::BackTab);
            assert_eq!(app.controller.session().active_field(), 2);
        }

        #[test]
        fn test_submit_moves_to_review() {
            let mut app = app();
            submit_user(&mut app, "Ada", "Lovelace");

            assert_eq!(app.controller.mode(), Mode::Reviewing);
            assert_eq!(app.status_message.as_deref(), Some("Entry saved"));
            assert_eq!(app.review_rows().len(), 1);
            assert!(!app.has_errors());
        }

        #[test]
        fn test_invalid_submit_shows_error() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.controller.mode(), Mode::Editing);
            assert_eq!(
                app.current_error(),
                Some("Missing required fields: firstName, lastName")
            );
            // Cursor jumps to the first missing field
            assert_eq!(app.form_focus, FormFocus::Fields);
            assert_eq!(app.controller.session().active_field(), 0);
            // Keys are swallowed until the error is dismissed
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.controller.session().active_field(), 0);
            press(&mut app, KeyCode::Esc);
            assert!(!app.has_errors());
        }

        #[test]
        fn test_missing_second_field_gets_focus() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Tab);
            type_text(&mut app, "Ada");
            press(&mut app, KeyCode::Enter);

            assert_eq!(
                app.current_error(),
                Some("Missing required fields: lastName")
            );
            assert_eq!(app.controller.session().active_field(), 1);
        }

        #[test]
        fn test_number_field_filters_input() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::BackTab);
            type_text(&mut app, "4x2");
            assert_eq!(app.controller.session().value("age"), "42");
            press(&mut app, KeyCode::Backspace);
            assert_eq!(app.controller.session().value("age"), "4");
        }

        #[test]
        fn test_dropdown_cycles_with_arrows() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Right);
            for _ in 0..3 {
                press(&mut app, KeyCode::Tab);
            }
            press(&mut app, KeyCode::Right);
            assert_eq!(app.controller.session().value("state"), "California");
        }

        #[test]
        fn test_ctrl_s_submits() {
            let mut app = app();
            press(&mut app, KeyCode::Right);
            app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
                .unwrap();
            assert!(app.has_errors());
            assert!(app.controller.session().values().is_empty());
        }
    }

    mod review {
        use super::*;

        #[test]
        fn test_edit_round_trip() {
            let mut app = app();
            submit_user(&mut app, "Ada", "Lovelace");
            let id = app.selected_entry().unwrap().id;

            press(&mut app, KeyCode::Char('e'));
            assert_eq!(app.controller.mode(), Mode::Editing);
            assert_eq!(app.form_focus, FormFocus::Fields);
            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Backspace);
            type_text(&mut app, "E");
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.status_message.as_deref(), Some("Entry updated"));
            let entry = app.selected_entry().unwrap();
            assert_eq!(entry.id, id);
            assert_eq!(entry.record.get("lastName"), Some("LovelacE"));
        }

        #[test]
        fn test_delete_requires_confirmation() {
            let mut app = app();
            submit_user(&mut app, "Ada", "Lovelace");

            press(&mut app, KeyCode::Char('d'));
            let pending = app.pending_delete.clone().unwrap();
            assert_eq!(pending.entry_display, "Ada");
            assert!(!pending.selected_option);

            // Enter on "Cancel" keeps the entry
            press(&mut app, KeyCode::Enter);
            assert!(app.pending_delete.is_none());
            assert_eq!(app.review_rows().len(), 1);

            press(&mut app, KeyCode::Char('d'));
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Enter);
            assert!(app.review_rows().is_empty());
            assert_eq!(app.status_message.as_deref(), Some("Entry deleted"));
            assert_eq!(app.controller.mode(), Mode::Reviewing);
        }

        #[test]
        fn test_selection_clamped_after_delete() {
            let mut app = app();
            submit_user(&mut app, "Ada", "Lovelace");
            press(&mut app, KeyCode::Esc);
            submit_user(&mut app, "Grace", "Hopper");
            assert_eq!(app.selected_row, 1);

            press(&mut app, KeyCode::Char('d'));
            press(&mut app, KeyCode::Char('y'));

            assert_eq!(app.selected_row, 0);
            assert_eq!(
                app.selected_entry().unwrap().record.get("firstName"),
                Some("Ada")
            );
        }

        #[test]
        fn test_go_back_returns_to_selector() {
            let mut app = app();
            submit_user(&mut app, "Ada", "Lovelace");
            press(&mut app, KeyCode::Char('b'));

            assert_eq!(app.controller.mode(), Mode::Editing);
            assert_eq!(app.form_focus, FormFocus::TypeSelector);
            assert!(app.controller.session().active_type().is_none());
        }

        #[test]
        fn test_row_navigation_bounds() {
            let mut app = app();
            submit_user(&mut app, "Ada", "Lovelace");
            press(&mut app, KeyCode::Char('k'));
            assert_eq!(app.selected_row, 0);
            press(&mut app, KeyCode::Char('j'));
            assert_eq!(app.selected_row, 0);
        }
    }
}
