//! Form session: the form currently being filled in

use super::field::{FieldEdit, FormField};
use crate::state::error::FormError;
use crate::state::record::{FieldValues, FormRecord};
use crate::state::schema::{descriptor, schema_for, FieldDescriptor, FormType};
use crate::state::store::{Entry, EntryId};

/// Trait for common form cursor operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// In-progress values for the selected form type
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    active_type: Option<FormType>,
    values: FieldValues,
    editing_entry_id: Option<EntryId>,
    /// Recomputed on every field change; 0 until the first one
    completion: u8,
    pub active_field_index: usize,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_type(&self) -> Option<FormType> {
        self.active_type
    }

    pub fn editing_entry_id(&self) -> Option<EntryId> {
        self.editing_entry_id
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Descriptors of the active form; empty when nothing is selected
    pub fn schema(&self) -> &'static [FieldDescriptor] {
        self.active_type.map(schema_for).unwrap_or(&[])
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Schema fields paired with their current values
    pub fn fields(&self) -> Vec<FormField<'_>> {
        self.schema()
            .iter()
            .map(|d| FormField::new(d, self.value(d.name)))
            .collect()
    }

    /// Switch form type, discarding everything typed so far
    pub fn select_type(&mut self, form_type: Option<FormType>) {
        self.active_type = form_type;
        self.values.clear();
        self.editing_entry_id = None;
        self.completion = 0;
        self.active_field_index = 0;
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let descriptor = self.descriptor(name)?;
        self.values.insert(descriptor.name.to_string(), value.into());
        self.completion = self.measure_completion();
        Ok(())
    }

    /// Percentage of fields that counted as filled at the last field change
    pub fn completion(&self) -> u8 {
        self.completion
    }

    /// Rounded share of fields that are filled or optional
    fn measure_completion(&self) -> u8 {
        let fields = self.fields();
        if fields.is_empty() {
            return 0;
        }
        let filled = fields.iter().filter(|f| f.counts_as_filled()).count();
        ((filled * 100 + fields.len() / 2) / fields.len()) as u8
    }

    /// Typed record for the current values, or every blank required field
    pub fn validate(&self) -> Result<FormRecord, FormError> {
        let form_type = self.active_type.ok_or(FormError::NoFormType)?;
        let missing_fields: Vec<_> = self
            .fields()
            .iter()
            .filter(|f| f.is_missing())
            .map(|f| f.name())
            .collect();
        if !missing_fields.is_empty() {
            return Err(FormError::Validation { missing_fields });
        }
        Ok(FormRecord::from_values(form_type, &self.values))
    }

    /// Load a stored entry for editing; the caller selects its type first
    pub fn load_for_edit(&mut self, entry: &Entry) {
        self.values = entry.fields();
        self.editing_entry_id = Some(entry.id);
        self.completion = self.measure_completion();
        self.active_field_index = 0;
    }

    /// Clear values and editing state, keeping the selected type
    pub fn reset(&mut self) {
        self.values.clear();
        self.editing_entry_id = None;
        self.completion = 0;
        self.active_field_index = 0;
    }

    /// Descriptor under the cursor
    pub fn active_descriptor(&self) -> Option<&'static FieldDescriptor> {
        self.schema().get(self.active_field_index)
    }

    /// Field name and new value for a keystroke on the active field
    pub fn preview_edit(&self, edit: FieldEdit) -> Option<(&'static str, String)> {
        let descriptor = self.active_descriptor()?;
        let value = edit.apply(descriptor, self.value(descriptor.name))?;
        Some((descriptor.name, value))
    }

    fn descriptor(&self, name: &str) -> Result<&'static FieldDescriptor, FormError> {
        let form_type = self.active_type.ok_or(FormError::NoFormType)?;
        descriptor(form_type, name).ok_or_else(|| FormError::UnknownField {
            name: name.to_string(),
        })
    }
}

impl Form for FormSession {
    fn field_count(&self) -> usize {
        self.schema().len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::{AddressRecord, UserRecord};
    use crate::state::store::SubmissionStore;

    fn session(form_type: FormType) -> FormSession {
        let mut s = FormSession::new();
        s.select_type(Some(form_type));
        s
    }

    mod selection {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_has_no_type() {
            let s = FormSession::default();
            assert!(s.active_type().is_none());
            assert!(s.schema().is_empty());
            assert_eq!(s.completion(), 0);
        }

        #[test]
        fn test_select_type_clears_values_and_edit() {
            let mut store = SubmissionStore::new();
            let entry = store.append(FormRecord::User(UserRecord::default()));
            let mut s = session(FormType::User);
            s.load_for_edit(&entry);
            s.set_field("firstName", "Ada").unwrap();

            s.select_type(Some(FormType::Address));

            assert_eq!(s.active_type(), Some(FormType::Address));
            assert!(s.values().is_empty());
            assert!(s.editing_entry_id().is_none());
            assert_eq!(s.field_count(), 4);
        }

        #[test]
        fn test_set_field_rejects_unknown_name() {
            let mut s = session(FormType::User);
            let err = s.set_field("street", "x").unwrap_err();
            assert_eq!(
                err,
                FormError::UnknownField {
                    name: "street".into()
                }
            );
            assert!(s.values().is_empty());
        }

        #[test]
        fn test_set_field_without_type_fails() {
            let mut s = FormSession::new();
            assert_eq!(s.set_field("firstName", "x"), Err(FormError::NoFormType));
        }
    }

    mod completion {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_zero_until_first_field_change() {
            let mut s = session(FormType::User);
            assert_eq!(s.completion(), 0);
            // age is optional, so it counts once anything is measured
            s.set_field("lastName", "").unwrap();
            assert_eq!(s.completion(), 33);
        }

        #[test]
        fn test_whitespace_does_not_fill() {
            let mut s = session(FormType::User);
            s.set_field("firstName", "   ").unwrap();
            assert_eq!(s.completion(), 33);
            s.set_field("firstName", "Ada").unwrap();
            assert_eq!(s.completion(), 67);
        }

        #[test]
        fn test_address_reaches_100() {
            let mut s = session(FormType::Address);
            assert_eq!(s.completion(), 0);
            s.set_field("street", "1 Main St").unwrap();
            assert_eq!(s.completion(), 25);
            s.set_field("city", "Springfield").unwrap();
            s.set_field("state", "Texas").unwrap();
            s.set_field("zipCode", "12345").unwrap();
            assert_eq!(s.completion(), 100);
        }

        #[test]
        fn test_reset_returns_to_baseline() {
            let mut s = session(FormType::Address);
            s.set_field("street", "1 Main St").unwrap();
            s.reset();
            assert_eq!(s.completion(), 0);
            assert_eq!(s.active_type(), Some(FormType::Address));
        }

        #[test]
        fn test_reset_clears_optional_credit() {
            let mut s = session(FormType::User);
            s.set_field("firstName", "Ada").unwrap();
            assert_eq!(s.completion(), 67);

            s.reset();
            assert_eq!(s.completion(), 0);
        }

        #[test]
        fn test_type_switch_clears_completion() {
            let mut s = session(FormType::User);
            s.set_field("firstName", "Ada").unwrap();
            s.select_type(Some(FormType::Payment));
            assert_eq!(s.completion(), 0);
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_missing_first_name_reported() {
            let mut s = session(FormType::User);
            s.set_field("firstName", "").unwrap();
            s.set_field("lastName", "Doe").unwrap();
            let err = s.validate().unwrap_err();
            assert_eq!(err.missing_fields(), ["firstName"]);
        }

        #[test]
        fn test_missing_fields_in_schema_order() {
            let s = session(FormType::Payment);
            assert_eq!(
                s.validate().unwrap_err().missing_fields(),
                ["cardNumber", "expiryDate", "cvv", "cardholderName"]
            );
        }

        #[test]
        fn test_validate_succeeds_iff_required_filled() {
            for form_type in FormType::ALL {
                let mut s = session(form_type);
                for d in schema_for(form_type) {
                    let value = if d.required { "x" } else { "" };
                    s.set_field(d.name, value).unwrap();
                }
                assert!(s.validate().is_ok(), "{form_type}");

                if let Some(required) = schema_for(form_type).iter().find(|d| d.required) {
                    s.set_field(required.name, " ").unwrap();
                    assert!(s.validate().is_err(), "{form_type}");
                }
            }
        }

        #[test]
        fn test_validate_returns_typed_record() {
            let mut s = session(FormType::Address);
            s.set_field("street", "1 Main St").unwrap();
            s.set_field("city", "Springfield").unwrap();
            s.set_field("state", "Texas").unwrap();
            s.set_field("zipCode", "12345").unwrap();
            assert_eq!(
                s.validate().unwrap(),
                FormRecord::Address(AddressRecord {
                    street: "1 Main St".into(),
                    city: "Springfield".into(),
                    state: "Texas".into(),
                    zip_code: "12345".into(),
                })
            );
        }

        #[test]
        fn test_validate_without_type() {
            assert_eq!(FormSession::new().validate(), Err(FormError::NoFormType));
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_load_for_edit_copies_fields() {
            let mut store = SubmissionStore::new();
            let entry = store.append(FormRecord::User(UserRecord {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                age: "36".into(),
            }));
            let mut s = session(FormType::User);
            s.load_for_edit(&entry);

            assert_eq!(s.editing_entry_id(), Some(entry.id));
            assert_eq!(s.value("lastName"), "Lovelace");
            assert_eq!(s.active_type(), Some(FormType::User));
            assert_eq!(s.completion(), 100);
        }

        #[test]
        fn test_cursor_wraps() {
            let mut s = session(FormType::User);
            s.prev_field();
            assert_eq!(s.active_field(), 2);
            s.next_field();
            assert_eq!(s.active_field(), 0);
        }

        #[test]
        fn test_cursor_noop_without_type() {
            let mut s = FormSession::new();
            s.next_field();
            s.prev_field();
            assert_eq!(s.active_field(), 0);
            assert_eq!(s.preview_edit(FieldEdit::Insert('a')), None);
        }

        #[test]
        fn test_preview_edit_targets_active_field() {
            let mut s = session(FormType::User);
            s.set_active_field(2);
            s.set_field("age", "4").unwrap();
            assert_eq!(
                s.preview_edit(FieldEdit::Insert('2')),
                Some(("age", "42".to_string()))
            );
            assert_eq!(s.preview_edit(FieldEdit::Insert('a')), None);
            assert_eq!(
                s.preview_edit(FieldEdit::Backspace),
                Some(("age", String::new()))
            );
            // Previewing leaves the session untouched
            assert_eq!(s.value("age"), "4");
        }

        #[test]
        fn test_cycle_only_on_dropdown() {
            let mut s = session(FormType::Address);
            assert_eq!(s.preview_edit(FieldEdit::Cycle { forward: true }), None);
            s.set_active_field(2);
            assert_eq!(
                s.preview_edit(FieldEdit::Cycle { forward: true }),
                Some(("state", "California".to_string()))
            );
        }
    }
}
