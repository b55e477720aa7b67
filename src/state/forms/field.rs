//! Form field value objects

use crate::state::schema::{FieldDescriptor, FieldKind};

/// A schema field paired with its current raw value
#[derive(Debug, Clone, Copy)]
pub struct FormField<'a> {
    pub descriptor: &'static FieldDescriptor,
    pub value: &'a str,
}

impl<'a> FormField<'a> {
    pub fn new(descriptor: &'static FieldDescriptor, value: &'a str) -> Self {
        Self { descriptor, value }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn label(&self) -> &'static str {
        self.descriptor.label
    }

    /// Non-empty after trimming
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Counts toward the completion gauge. Optional fields always do.
    pub fn counts_as_filled(&self) -> bool {
        self.has_value() || !self.descriptor.required
    }

    /// Required but blank
    pub fn is_missing(&self) -> bool {
        self.descriptor.required && !self.has_value()
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self.descriptor.kind {
            FieldKind::Password => "•".repeat(self.value.chars().count()),
            FieldKind::Dropdown if self.value.is_empty() => "Select...".to_string(),
            _ => self.value.to_string(),
        }
    }
}

/// One keystroke aimed at a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    /// Drop the last character; dropdowns clear back to "Select..."
    Backspace,
    /// Step a dropdown through its choices, wrapping through the empty selection
    Cycle { forward: bool },
}

impl FieldEdit {
    /// New value after the edit, or `None` when the field ignores it
    pub fn apply(self, descriptor: &FieldDescriptor, current: &str) -> Option<String> {
        match self {
            Self::Insert(c) if descriptor.accepts(c) => {
                let mut value = current.to_string();
                value.push(c);
                Some(value)
            }
            Self::Insert(_) => None,
            Self::Backspace if current.is_empty() => None,
            Self::Backspace if descriptor.is_dropdown() => Some(String::new()),
            Self::Backspace => {
                let mut value = current.to_string();
                value.pop();
                Some(value)
            }
            Self::Cycle { forward } => cycle_choice(descriptor.choices, current, forward),
        }
    }
}

fn cycle_choice(choices: &[&str], current: &str, forward: bool) -> Option<String> {
    if choices.is_empty() {
        return None;
    }
    let slots = choices.len() + 1;
    let slot = choices
        .iter()
        .position(|c| *c == current)
        .map(|p| p + 1)
        .unwrap_or(0);
    let next = if forward {
        (slot + 1) % slots
    } else {
        (slot + slots - 1) % slots
    };
    Some(
        next.checked_sub(1)
            .map(|i| choices[i].to_string())
            .unwrap_or_default(),
    )
}
