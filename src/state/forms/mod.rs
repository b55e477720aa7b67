//! Form domain layer
//!
//! The form session tracks the selected form type, the raw values typed
//! so far and the completion gauge derived from them.

mod field;
mod form_state;

pub use field::{FieldEdit, FormField};
pub use form_state::{Form, FormSession};
