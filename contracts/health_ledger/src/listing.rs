//! Full scan of the world state.

use alloc::string::String;
use alloc::vec::Vec;
use serde_json::{json, Value};

use crate::codec;
use crate::schema::Record;
use crate::world_state::{StateIter, WorldState};

/// A listed value: a decoded record, or the raw text when decoding failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listed {
    Record(Record),
    Raw(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedEntry {
    pub key: String,
    pub value: Listed,
}

impl ListedEntry {
    pub fn is_raw(&self) -> bool {
        matches!(self.value, Listed::Raw(_))
    }

    pub fn to_value(&self) -> Value {
        let record = match &self.value {
            Listed::Record(record) => codec::to_value(record),
            Listed::Raw(raw) => Value::String(raw.clone()),
        };
        json!({ "Key": self.key, "Record": record })
    }
}

/// Lazy, single-pass listing. Order follows the host and carries no meaning.
pub struct Listing<'a> {
    inner: StateIter<'a>,
}

impl Iterator for Listing<'_> {
    type Item = ListedEntry;

    fn next(&mut self) -> Option<ListedEntry> {
        loop {
            let (key, bytes) = self.inner.next()?;
            if bytes.is_empty() {
                continue;
            }
            let value = match codec::decode(&bytes) {
                Ok(record) => Listed::Record(record),
                Err(_) => Listed::Raw(String::from_utf8_lossy(&bytes).into_owned()),
            };
            return Some(ListedEntry { key, value });
        }
    }
}

/// Scans the whole key space.
pub fn list_all<S: WorldState + ?Sized>(state: &S) -> Listing<'_> {
    Listing {
        inner: state.state_by_range("", ""),
    }
}

/// JSON array of `{"Key", "Record"}` objects.
pub fn to_json_array(entries: &[ListedEntry]) -> Value {
    Value::Array(entries.iter().map(ListedEntry::to_value).collect::<Vec<_>>())
}
