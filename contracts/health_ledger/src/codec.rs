//! Deterministic record encoding.
//!
//! Records are stored as compact JSON. Object keys are emitted in
//! lexicographic order at every nesting level, so two logically equal records
//! always produce identical bytes. Keys are inserted already sorted, which
//! keeps the output canonical even if `serde_json/preserve_order` is enabled
//! elsewhere in the build.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde_json::{Map, Value};

use crate::errors::ContractError;
use crate::schema::{Billing, Field, FieldKind, FieldValue, Policy, Record};

/// Encodes `record` into its canonical byte form.
pub fn encode(record: &Record) -> Vec<u8> {
    to_json_string(record).into_bytes()
}

/// Decodes stored bytes into a record.
pub fn decode(bytes: &[u8]) -> Result<Record, ContractError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|_| ContractError::MalformedRecord)?;
    from_value(value)
}

/// Canonical JSON text of `record`.
pub fn to_json_string(record: &Record) -> String {
    to_value(record).to_string()
}

pub fn to_value(record: &Record) -> Value {
    let mut entries: Vec<(&'static str, &FieldValue)> = record
        .fields()
        .map(|(field, value)| (field.name(), value))
        .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut object = Map::new();
    for (name, value) in entries {
        object.insert(name.into(), field_to_value(value));
    }
    Value::Object(object)
}

pub fn from_value(value: Value) -> Result<Record, ContractError> {
    let Value::Object(object) = value else {
        return Err(ContractError::MalformedRecord);
    };

    let mut record = Record::new();
    for (name, value) in object {
        let field = Field::from_name(&name).ok_or(ContractError::MalformedRecord)?;
        let value = field_from_value(field.kind(), value).ok_or(ContractError::MalformedRecord)?;
        record.insert(field, value);
    }
    Ok(record)
}

fn field_to_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Billing(billing) => billing.to_value(),
        FieldValue::Policy(policy) => policy.to_value(),
        FieldValue::Timestamp(ts) => Value::from(*ts),
    }
}

fn field_from_value(kind: FieldKind, value: Value) -> Option<FieldValue> {
    match (kind, value) {
        (FieldKind::Text, Value::String(text)) => Some(FieldValue::Text(text)),
        (FieldKind::Timestamp, Value::Number(n)) => n.as_u64().map(FieldValue::Timestamp),
        (FieldKind::Billing, value @ Value::Object(_)) => {
            Billing::from_value(value).map(FieldValue::Billing)
        }
        (FieldKind::Policy, value @ Value::Object(_)) => {
            Policy::from_value(value).map(FieldValue::Policy)
        }
        _ => None,
    }
}
