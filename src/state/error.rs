//! Errors raised by form state transitions

use super::schema::FormType;
use super::store::EntryId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Missing required fields: {}", .missing_fields.join(", "))]
    Validation { missing_fields: Vec<&'static str> },
    #[error("No {form_type} entry with id {id}")]
    NotFound { form_type: FormType, id: EntryId },
    #[error("Unknown field: {name}")]
    UnknownField { name: String },
    #[error("No form type selected")]
    NoFormType,
    #[error("Cannot handle {event} while {mode}")]
    InvalidTransition {
        event: &'static str,
        mode: &'static str,
    },
}

impl FormError {
    /// Names of the required fields left empty, if this is a validation failure
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::Validation { missing_fields } => missing_fields,
            _ => &[],
        }
    }
}
