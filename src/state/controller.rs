//! View controller: switches between filling in a form and reviewing
//! submitted entries, persisting after every transition

use super::error::FormError;
use super::forms::FormSession;
use super::schema::{schema_for_name, FormType};
use super::store::{Entry, EntryId, SubmissionStore};
use crate::storage::{KeyValueStore, FORM_TYPE_KEY, SHOW_TABLE_KEY, SUBMITTED_DATA_KEY};

/// Which half of the screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Form visible, table hidden
    #[default]
    Editing,
    /// Tables visible, form hidden
    Reviewing,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Reviewing => "reviewing",
        }
    }

    pub fn shows_table(&self) -> bool {
        matches!(self, Self::Reviewing)
    }
}

/// Discrete user intents produced by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    FieldChanged { name: String, value: String },
    TypeChanged(Option<FormType>),
    SubmitRequested,
    EditRequested { form_type: FormType, id: EntryId },
    DeleteRequested { form_type: FormType, id: EntryId },
    GoBackRequested,
}

impl FormEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FieldChanged { .. } => "field change",
            Self::TypeChanged(_) => "type change",
            Self::SubmitRequested => "submit",
            Self::EditRequested { .. } => "edit",
            Self::DeleteRequested { .. } => "delete",
            Self::GoBackRequested => "go back",
        }
    }
}

pub struct ViewController {
    mode: Mode,
    session: FormSession,
    store: SubmissionStore,
    storage: Box<dyn KeyValueStore>,
}

impl ViewController {
    /// Start from a blank session without reading `storage`
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            mode: Mode::default(),
            session: FormSession::new(),
            store: SubmissionStore::new(),
            storage,
        }
    }

    /// Rebuild the last session from `storage`; missing or malformed
    /// keys fall back to empty defaults
    pub fn restore(storage: Box<dyn KeyValueStore>) -> Self {
        let mut controller = Self::new(storage);

        if let Some(raw) = controller.load_key(SUBMITTED_DATA_KEY) {
            controller.store = SubmissionStore::from_json(&raw);
        }

        if let Some(raw) = controller.load_key(FORM_TYPE_KEY) {
            if !raw.is_empty() && schema_for_name(&raw).is_empty() {
                tracing::warn!("Ignoring unknown stored form type {raw:?}");
            }
            controller.session.select_type(FormType::from_name(&raw));
        }

        if let Some(raw) = controller.load_key(SHOW_TABLE_KEY) {
            match serde_json::from_str::<bool>(&raw) {
                Ok(true) => controller.mode = Mode::Reviewing,
                Ok(false) => {}
                Err(e) => tracing::warn!("Ignoring malformed {SHOW_TABLE_KEY}: {e}"),
            }
        }

        tracing::debug!(
            "Restored {} entries, mode={}",
            controller.store.len(),
            controller.mode.label()
        );
        controller
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    /// Keystroke-level access for the form view; only usable while editing
    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        match self.mode {
            Mode::Editing => Some(&mut self.session),
            Mode::Reviewing => None,
        }
    }

    pub fn store(&self) -> &SubmissionStore {
        &self.store
    }

    /// Dispatch one event from the rendering layer
    pub fn handle(&mut self, event: FormEvent) -> Result<(), FormError> {
        tracing::trace!("Handling {} while {}", event.name(), self.mode.label());
        match event {
            FormEvent::FieldChanged { name, value } => self.set_field(&name, value),
            FormEvent::TypeChanged(form_type) => self.select_type(form_type),
            FormEvent::SubmitRequested => self.submit().map(|_| ()),
            FormEvent::EditRequested { form_type, id } => self.edit(form_type, id),
            FormEvent::DeleteRequested { form_type, id } => self.delete(form_type, id).map(|_| ()),
            FormEvent::GoBackRequested => self.go_back(),
        }
    }

    pub fn select_type(&mut self, form_type: Option<FormType>) -> Result<(), FormError> {
        self.require(Mode::Editing, "type change")?;
        tracing::debug!("Form type changed to {form_type:?}");
        self.session.select_type(form_type);
        self.persist();
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.require(Mode::Editing, "field change")?;
        self.session.set_field(name, value)
    }

    /// Commit the session: append a new entry, or update the one being
    /// edited, then show the tables
    pub fn submit(&mut self) -> Result<Entry, FormError> {
        self.require(Mode::Editing, "submit")?;
        let record = self.session.validate()?;
        let entry = match self.session.editing_entry_id() {
            Some(id) => {
                let entry = self.store.update(id, record)?;
                tracing::info!("Updated {} entry {}", entry.form_type(), entry.id);
                entry
            }
            None => {
                let entry = self.store.append(record);
                tracing::info!("Added {} entry {}", entry.form_type(), entry.id);
                entry
            }
        };
        self.session.reset();
        self.mode = Mode::Reviewing;
        self.persist();
        Ok(entry)
    }

    /// Leave the tables; the user picks a form type again
    pub fn go_back(&mut self) -> Result<(), FormError> {
        self.require(Mode::Reviewing, "go back")?;
        self.session.select_type(None);
        self.mode = Mode::Editing;
        self.persist();
        Ok(())
    }

    /// Load a stored entry back into the form
    pub fn edit(&mut self, form_type: FormType, id: EntryId) -> Result<(), FormError> {
        self.require(Mode::Reviewing, "edit")?;
        let entry = self
            .store
            .get(form_type, id)
            .cloned()
            .ok_or(FormError::NotFound { form_type, id })?;
        self.session.select_type(Some(form_type));
        self.session.load_for_edit(&entry);
        self.mode = Mode::Editing;
        tracing::debug!("Editing {form_type} entry {id}");
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, form_type: FormType, id: EntryId) -> Result<Entry, FormError> {
        self.require(Mode::Reviewing, "delete")?;
        let removed = self.store.remove(form_type, id)?;
        tracing::info!("Deleted {form_type} entry {id}");
        self.persist();
        Ok(removed)
    }

    fn require(&self, mode: Mode, event: &'static str) -> Result<(), FormError> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(FormError::InvalidTransition {
                event,
                mode: self.mode.label(),
            })
        }
    }

    fn load_key(&self, key: &str) -> Option<String> {
        match self.storage.load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not read {key}: {e}");
                None
            }
        }
    }

    /// Write all three keys; failures are logged and the session goes on
    fn persist(&mut self) {
        let form_type = self
            .session
            .active_type()
            .map(|t| t.name())
            .unwrap_or_default();
        let submitted = self.store.to_json().to_string();
        let show_table = self.mode.shows_table().to_string();

        for (key, value) in [
            (SUBMITTED_DATA_KEY, submitted.as_str()),
            (SHOW_TABLE_KEY, show_table.as_str()),
            (FORM_TYPE_KEY, form_type),
        ] {
            if let Err(e) = self.storage.save(key, value) {
                tracing::warn!("Skipping persistence of {key}: {e}");
            }
        }
    }
}
