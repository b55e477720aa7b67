//! Typed records for submitted forms
//!
//! Raw input is a string map keyed by field name. Once a form passes
//! validation it becomes one of these records, so a stored entry can
//! never carry a field its schema does not define.

use super::schema::{schema_for, FormType};
use std::collections::BTreeMap;

/// Raw field values keyed by field name
pub type FieldValues = BTreeMap<String, String>;

fn take(values: &FieldValues, name: &str) -> String {
    values.get(name).cloned().unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressRecord {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentRecord {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,
}

/// A schema-conforming submission for one form type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRecord {
    User(UserRecord),
    Address(AddressRecord),
    Payment(PaymentRecord),
}

impl FormRecord {
    /// Build a record from raw values; unknown keys are dropped and
    /// missing keys become empty strings
    pub fn from_values(form_type: FormType, values: &FieldValues) -> Self {
        match form_type {
            FormType::User => Self::User(UserRecord {
                first_name: take(values, "firstName"),
                last_name: take(values, "lastName"),
                age: take(values, "age"),
            }),
            FormType::Address => Self::Address(AddressRecord {
                street: take(values, "street"),
                city: take(values, "city"),
                state: take(values, "state"),
                zip_code: take(values, "zipCode"),
            }),
            FormType::Payment => Self::Payment(PaymentRecord {
                card_number: take(values, "cardNumber"),
                expiry_date: take(values, "expiryDate"),
                cvv: take(values, "cvv"),
                cardholder_name: take(values, "cardholderName"),
            }),
        }
    }

    pub fn form_type(&self) -> FormType {
        match self {
            Self::User(_) => FormType::User,
            Self::Address(_) => FormType::Address,
            Self::Payment(_) => FormType::Payment,
        }
    }

    /// Value of a field by its schema name
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match (self, name) {
            (Self::User(r), "firstName") => &r.first_name,
            (Self::User(r), "lastName") => &r.last_name,
            (Self::User(r), "age") => &r.age,
            (Self::Address(r), "street") => &r.street,
            (Self::Address(r), "city") => &r.city,
            (Self::Address(r), "state") => &r.state,
            (Self::Address(r), "zipCode") => &r.zip_code,
            (Self::Payment(r), "cardNumber") => &r.card_number,
            (Self::Payment(r), "expiryDate") => &r.expiry_date,
            (Self::Payment(r), "cvv") => &r.cvv,
            (Self::Payment(r), "cardholderName") => &r.cardholder_name,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Field name/value pairs in schema order
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        schema_for(self.form_type())
            .iter()
            .map(|f| (f.name, self.get(f.name).unwrap_or_default()))
            .collect()
    }

    pub fn to_values(&self) -> FieldValues {
        self.fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_values_zero_fills_missing() {
        let record = FormRecord::from_values(FormType::User, &values(&[("firstName", "Ada")]));
        assert_eq!(
            record,
            FormRecord::User(UserRecord {
                first_name: "Ada".into(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_from_values_trims_unknown_keys() {
        let record = FormRecord::from_values(
            FormType::Address,
            &values(&[("street", "1 Main St"), ("country", "US")]),
        );
        assert_eq!(record.get("country"), None);
        assert_eq!(record.to_values().len(), 4);
    }

    #[test]
    fn test_fields_follow_schema_order() {
        let record = FormRecord::Payment(PaymentRecord {
            card_number: "4111".into(),
            expiry_date: "2030-01-01".into(),
            cvv: "123".into(),
            cardholder_name: "Ada".into(),
        });
        assert_eq!(
            record.fields(),
            vec![
                ("cardNumber", "4111"),
                ("expiryDate", "2030-01-01"),
                ("cvv", "123"),
                ("cardholderName", "Ada"),
            ]
        );
    }

    #[test]
    fn test_to_values_and_back() {
        let raw = values(&[
            ("street", "1 Main St"),
            ("city", "Springfield"),
            ("state", "Texas"),
            ("zipCode", "12345"),
        ]);
        let record = FormRecord::from_values(FormType::Address, &raw);
        assert_eq!(record.form_type(), FormType::Address);
        assert_eq!(record.to_values(), raw);
    }

    #[test]
    fn test_get_rejects_field_of_other_type() {
        let record = FormRecord::User(UserRecord::default());
        assert_eq!(record.get("street"), None);
        assert_eq!(record.get("age"), Some(""));
    }
}
