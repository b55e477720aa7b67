//! Field schema registry
//!
//! Static description of every form type and the inputs it renders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The enumerated set of forms a user can fill in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    User,
    Address,
    Payment,
}

impl FormType {
    /// All form types in selector order
    pub const ALL: [FormType; 3] = [FormType::User, FormType::Address, FormType::Payment];

    /// Name used as the persistence key
    pub fn name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Address => "address",
            Self::Payment => "payment",
        }
    }

    /// Title shown in the type selector
    pub fn title(&self) -> &'static str {
        match self {
            Self::User => "User Information",
            Self::Address => "Address Information",
            Self::Payment => "Payment Information",
        }
    }

    /// Heading of the submitted-entries table
    pub fn table_title(&self) -> &'static str {
        match self {
            Self::User => "User Data",
            Self::Address => "Address Data",
            Self::Payment => "Payment Data",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Step through `None -> User -> Address -> Payment -> None`
    pub fn cycle(current: Option<Self>, forward: bool) -> Option<Self> {
        let position = current.and_then(|t| Self::ALL.iter().position(|x| *x == t));
        let slots = Self::ALL.len() + 1;
        // Slot 0 is "no form selected"
        let slot = position.map(|p| p + 1).unwrap_or(0);
        let next = if forward {
            (slot + 1) % slots
        } else {
            (slot + slots - 1) % slots
        };
        next.checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input widget kind for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Password,
    Dropdown,
}

/// Metadata describing one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
    pub required: bool,
    /// Only non-empty for dropdowns
    pub choices: &'static [&'static str],
}

impl FieldDescriptor {
    const fn input(name: &'static str, kind: FieldKind, label: &'static str, required: bool) -> Self {
        Self {
            name,
            kind,
            label,
            required,
            choices: &[],
        }
    }

    const fn dropdown(
        name: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
        required: bool,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Dropdown,
            label,
            required,
            choices,
        }
    }

    /// Whether a typed character may be inserted into this field
    pub fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Text | FieldKind::Password => !c.is_control(),
            FieldKind::Number => c.is_ascii_digit(),
            FieldKind::Date => c.is_ascii_digit() || c == '-',
            FieldKind::Dropdown => false,
        }
    }

    pub fn is_dropdown(&self) -> bool {
        self.kind == FieldKind::Dropdown
    }
}

const STATES: &[&str] = &["California", "Texas", "New York"];

const USER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::input("firstName", FieldKind::Text, "First Name", true),
    FieldDescriptor::input("lastName", FieldKind::Text, "Last Name", true),
    FieldDescriptor::input("age", FieldKind::Number, "Age", false),
];

const ADDRESS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::input("street", FieldKind::Text, "Street", true),
    FieldDescriptor::input("city", FieldKind::Text, "City", true),
    FieldDescriptor::dropdown("state", "State", STATES, true),
    FieldDescriptor::input("zipCode", FieldKind::Text, "Zip Code", true),
];

const PAYMENT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::input("cardNumber", FieldKind::Text, "Card Number", true),
    FieldDescriptor::input("expiryDate", FieldKind::Date, "Expiry Date", true),
    FieldDescriptor::input("cvv", FieldKind::Password, "CVV", true),
    FieldDescriptor::input("cardholderName", FieldKind::Text, "Cardholder Name", true),
];

/// Ordered field descriptors for a form type
pub fn schema_for(form_type: FormType) -> &'static [FieldDescriptor] {
    match form_type {
        FormType::User => USER_FIELDS,
        FormType::Address => ADDRESS_FIELDS,
        FormType::Payment => PAYMENT_FIELDS,
    }
}

/// Lookup by persisted name; unknown names have no fields
pub fn schema_for_name(name: &str) -> &'static [FieldDescriptor] {
    FormType::from_name(name).map(schema_for).unwrap_or(&[])
}

/// Find one descriptor by field name
pub fn descriptor(form_type: FormType, name: &str) -> Option<&'static FieldDescriptor> {
    schema_for(form_type).iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_name_roundtrips_every_type() {
        for t in FormType::ALL {
            assert_eq!(FormType::from_name(t.name()), Some(t));
        }
        assert_eq!(FormType::from_name("shipping"), None);
        assert_eq!(FormType::from_name(""), None);
    }

    #[test]
    fn test_unknown_name_has_empty_schema() {
        assert!(schema_for_name("shipping").is_empty());
        assert_eq!(schema_for_name("user").len(), 3);
    }

    #[test]
    fn test_field_names_unique_within_type() {
        for t in FormType::ALL {
            let names: HashSet<_> = schema_for(t).iter().map(|f| f.name).collect();
            assert_eq!(names.len(), schema_for(t).len(), "duplicate field in {t}");
        }
    }

    #[test]
    fn test_only_dropdowns_have_choices() {
        for t in FormType::ALL {
            for field in schema_for(t) {
                assert_eq!(field.is_dropdown(), !field.choices.is_empty(), "{}", field.name);
            }
        }
    }

    #[test]
    fn test_address_schema_order() {
        let names: Vec<_> = schema_for(FormType::Address).iter().map(|f| f.name).collect();
        assert_eq!(names, ["street", "city", "state", "zipCode"]);
        assert!(schema_for(FormType::Address).iter().all(|f| f.required));
    }

    #[test]
    fn test_age_is_optional_number() {
        let age = descriptor(FormType::User, "age").unwrap();
        assert_eq!(age.kind, FieldKind::Number);
        assert!(!age.required);
    }

    #[test]
    fn test_accepts_filters_by_kind() {
        let age = descriptor(FormType::User, "age").unwrap();
        assert!(age.accepts('4'));
        assert!(!age.accepts('a'));

        let expiry = descriptor(FormType::Payment, "expiryDate").unwrap();
        assert!(expiry.accepts('-'));
        assert!(!expiry.accepts('/'));

        let state = descriptor(FormType::Address, "state").unwrap();
        assert!(!state.accepts('T'));

        let cvv = descriptor(FormType::Payment, "cvv").unwrap();
        assert!(cvv.accepts('x'));
        assert!(!cvv.accepts('\n'));
    }

    #[test]
    fn test_cycle_wraps_through_none() {
        assert_eq!(FormType::cycle(None, true), Some(FormType::User));
        assert_eq!(FormType::cycle(Some(FormType::Payment), true), None);
        assert_eq!(FormType::cycle(None, false), Some(FormType::Payment));
        assert_eq!(FormType::cycle(Some(FormType::User), false), None);
        assert_eq!(
            FormType::cycle(Some(FormType::User), true),
            Some(FormType::Address)
        );
    }
}
