//! Application state module

mod controller;
mod error;
mod forms;
mod record;
mod schema;
mod store;

pub use controller::{FormEvent, Mode, ViewController};
pub use error::FormError;
pub use forms::{FieldEdit, Form, FormField};
pub use schema::{schema_for, FormType};
pub use store::{Entry, EntryId};
