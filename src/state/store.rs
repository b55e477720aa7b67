//! Submission store: submitted entries per form type

use super::error::FormError;
use super::record::{FieldValues, FormRecord};
use super::schema::FormType;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Identifier of a submitted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub record: FormRecord,
}

impl Entry {
    pub fn form_type(&self) -> FormType {
        self.record.form_type()
    }

    pub fn fields(&self) -> FieldValues {
        self.record.to_values()
    }
}

/// Hands out time-derived ids that never repeat, even when two
/// entries land in the same millisecond
#[derive(Debug, Default)]
struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    fn next(&mut self) -> EntryId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = match self.last.checked_add(1) {
            Some(after_last) => now.max(after_last),
            // Restored ids reached the top of the range
            None => {
                tracing::warn!("Entry ids exhausted, restarting from the clock");
                now
            }
        };
        EntryId(self.last)
    }

    /// Next id for which `taken` is false; only loops after the range wrapped
    fn next_free(&mut self, taken: impl Fn(EntryId) -> bool) -> EntryId {
        loop {
            let id = self.next();
            if !taken(id) {
                return id;
            }
        }
    }

    fn observe(&mut self, id: EntryId) {
        self.last = self.last.max(id.0);
    }
}

/// Submitted entries keyed by form type, in insertion order
#[derive(Debug, Default)]
pub struct SubmissionStore {
    entries: BTreeMap<FormType, Vec<Entry>>,
    ids: IdAllocator,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry at the end of its form type's list
    pub fn append(&mut self, record: FormRecord) -> Entry {
        let entries = &self.entries;
        let id = self
            .ids
            .next_free(|id| entries.values().flatten().any(|e| e.id == id));
        let entry = Entry { id, record };
        self.entries
            .entry(entry.form_type())
            .or_default()
            .push(entry.clone());
        entry
    }

    /// Replace the record of an existing entry, keeping its position
    pub fn update(&mut self, id: EntryId, record: FormRecord) -> Result<Entry, FormError> {
        let form_type = record.form_type();
        let entry = self
            .entries
            .get_mut(&form_type)
            .and_then(|list| list.iter_mut().find(|e| e.id == id))
            .ok_or(FormError::NotFound { form_type, id })?;
        entry.record = record;
        Ok(entry.clone())
    }

    /// Remove an entry; absent ids are reported rather than ignored
    pub fn remove(&mut self, form_type: FormType, id: EntryId) -> Result<Entry, FormError> {
        let list = self
            .entries
            .get_mut(&form_type)
            .ok_or(FormError::NotFound { form_type, id })?;
        let index = list
            .iter()
            .position(|e| e.id == id)
            .ok_or(FormError::NotFound { form_type, id })?;
        Ok(list.remove(index))
    }

    pub fn list_entries(&self, form_type: FormType) -> &[Entry] {
        self.entries
            .get(&form_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, form_type: FormType, id: EntryId) -> Option<&Entry> {
        self.list_entries(form_type).iter().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Form types that have at least one entry, in selector order
    pub fn non_empty_types(&self) -> Vec<FormType> {
        FormType::ALL
            .into_iter()
            .filter(|t| !self.list_entries(*t).is_empty())
            .collect()
    }

    /// Serialize as `{"user": [{"id": 1, "firstName": ...}], ...}`
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for form_type in FormType::ALL {
            let rows = self
                .list_entries(form_type)
                .iter()
                .map(|entry| {
                    let mut object = Map::new();
                    object.insert("id".to_string(), Value::from(entry.id.0));
                    for (name, value) in entry.record.fields() {
                        object.insert(name.to_string(), Value::from(value));
                    }
                    Value::Object(object)
                })
                .collect();
            root.insert(form_type.name().to_string(), Value::Array(rows));
        }
        Value::Object(root)
    }

    /// Rebuild a store from persisted JSON, skipping anything malformed
    pub fn from_json(raw: &str) -> Self {
        let mut store = Self::new();
        let root: Map<String, Value> = match serde_json::from_str(raw) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Ignoring malformed submitted data: {e}");
                return store;
            }
        };

        // Ids without a usable value are allocated after all stored ids
        // have been observed, so fresh ones cannot collide
        let mut pending: Vec<(FormType, FormRecord, Option<u64>)> = Vec::new();
        for (key, rows) in root {
            let Some(form_type) = FormType::from_name(&key) else {
                tracing::warn!("Dropping entries of unknown form type {key:?}");
                continue;
            };
            let Value::Array(rows) = rows else {
                tracing::warn!("Expected a list of {form_type} entries");
                continue;
            };
            for row in rows {
                match serde_json::from_value::<StoredEntry>(row) {
                    Ok(stored) => {
                        let id = stored.id.as_ref().and_then(Value::as_u64);
                        let values = stored.into_values();
                        pending.push((form_type, FormRecord::from_values(form_type, &values), id));
                    }
                    Err(e) => tracing::warn!("Dropping malformed {form_type} entry: {e}"),
                }
            }
        }

        let mut seen = HashSet::new();
        for (_, _, id) in &pending {
            if let Some(id) = id {
                store.ids.observe(EntryId(*id));
            }
        }
        for (form_type, record, id) in pending {
            let id = match id {
                Some(id) if seen.insert(id) => EntryId(id),
                _ => {
                    let fresh = store.ids.next_free(|id| seen.contains(&id.0));
                    seen.insert(fresh.0);
                    fresh
                }
            };
            store
                .entries
                .entry(form_type)
                .or_default()
                .push(Entry { id, record });
        }
        store
    }
}

/// Persisted row shape; field values may be any JSON scalar
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl StoredEntry {
    fn into_values(self) -> FieldValues {
        self.fields
            .into_iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    Value::Bool(_) | Value::Number(_) => value.to_string(),
                    Value::Array(_) | Value::Object(_) => return None,
                };
                Some((name, text))
            })
            .collect()
    }
}
