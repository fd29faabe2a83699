//! Record shapes, partitions and the storage key scheme.
//!
//! A [`Record`] belongs to exactly one [`Partition`]. Each partition owns a
//! key namespace (`<partition>_<id>`) and a fixed set of permitted fields.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use serde::Deserialize;
use serde_json::{json, Value};
use soroban_sdk::contracttype;

use crate::errors::ContractError;

/// Separator between the partition name and the logical identifier.
pub const KEY_SEPARATOR: char = '_';

/// Document type tag carried by unified records.
pub const HEALTH_RECORD_DOC_TYPE: &str = "healthRecord";

/// Stakeholder partitions of the world state.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Partition {
    Hospital,
    Insurance,
    Unified,
}

const HOSPITAL_FIELDS: &[Field] = &[
    Field::Id,
    Field::Name,
    Field::Gender,
    Field::BloodType,
    Field::Allergies,
    Field::Diagnosis,
    Field::Treatment,
    Field::Timestamp,
];

const INSURANCE_FIELDS: &[Field] = &[Field::Id, Field::Billing, Field::Policy, Field::Timestamp];

const UNIFIED_FIELDS: &[Field] = &Field::ALL;

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Hospital, Partition::Insurance, Partition::Unified];

    /// Name used as the key prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Hospital => "hospital",
            Partition::Insurance => "insurance",
            Partition::Unified => "unified",
        }
    }

    pub fn from_name(name: &str) -> Option<Partition> {
        Partition::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Fields a record of this partition may carry.
    pub fn allowed_fields(&self) -> &'static [Field] {
        match self {
            Partition::Hospital => HOSPITAL_FIELDS,
            Partition::Insurance => INSURANCE_FIELDS,
            Partition::Unified => UNIFIED_FIELDS,
        }
    }

    pub fn permits(&self, field: Field) -> bool {
        self.allowed_fields().contains(&field)
    }
}

/// Derives the storage key for `id` within `partition`.
pub fn derive_key(partition: Partition, id: &str) -> Result<String, ContractError> {
    if id.is_empty() {
        return Err(ContractError::InvalidArgument);
    }
    Ok(format!("{}{}{}", partition.as_str(), KEY_SEPARATOR, id))
}

/// Splits a storage key back into its partition and identifier.
pub fn parse_key(key: &str) -> Option<(Partition, &str)> {
    let (prefix, id) = key.split_once(KEY_SEPARATOR)?;
    let partition = Partition::from_name(prefix)?;
    if id.is_empty() {
        return None;
    }
    Some((partition, id))
}

/// Field names of a record.
///
/// Ordering of this enum is irrelevant to the stored bytes; the codec sorts by
/// [`Field::name`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Field {
    Id,
    Name,
    Gender,
    BloodType,
    Allergies,
    Diagnosis,
    Treatment,
    Billing,
    Policy,
    Timestamp,
    DocType,
}

/// Kind of value a field holds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Text,
    Billing,
    Policy,
    Timestamp,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::Name,
        Field::Gender,
        Field::BloodType,
        Field::Allergies,
        Field::Diagnosis,
        Field::Treatment,
        Field::Billing,
        Field::Policy,
        Field::Timestamp,
        Field::DocType,
    ];

    /// Clinical fields, never visible to insurance viewers.
    pub const CLINICAL: [Field; 6] = [
        Field::Name,
        Field::Gender,
        Field::BloodType,
        Field::Allergies,
        Field::Diagnosis,
        Field::Treatment,
    ];

    /// Persisted field name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Gender => "Gender",
            Field::BloodType => "BloodType",
            Field::Allergies => "Allergies",
            Field::Diagnosis => "Diagnosis",
            Field::Treatment => "Treatment",
            Field::Billing => "Billing",
            Field::Policy => "Policy",
            Field::Timestamp => "Timestamp",
            Field::DocType => "docType",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Billing => FieldKind::Billing,
            Field::Policy => FieldKind::Policy,
            Field::Timestamp => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }

    pub fn is_clinical(&self) -> bool {
        Field::CLINICAL.contains(self)
    }
}

/// Billing sub-document. Amounts are whole currency units.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Billing {
    pub total: u64,
    pub paid: u64,
    pub due: u64,
}

impl Billing {
    pub fn new(total: u64, paid: u64, due: u64) -> Self {
        Self { total, paid, due }
    }

    /// Parses the JSON text submitted by an insurance caller.
    pub fn from_json(text: &str) -> Result<Self, ContractError> {
        serde_json::from_str(text).map_err(|_| ContractError::InvalidArgument)
    }

    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn to_value(&self) -> Value {
        // members in sorted order
        json!({
            "Due": self.due,
            "Paid": self.paid,
            "Total": self.total,
        })
    }
}

/// Insurance policy sub-document.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Policy {
    pub policy_number: String,
    pub policy_name: String,
    pub policy_company: String,
    pub policy_validity: String,
}

impl Policy {
    pub fn new(number: &str, name: &str, company: &str, validity: &str) -> Self {
        Self {
            policy_number: number.to_string(),
            policy_name: name.to_string(),
            policy_company: company.to_string(),
            policy_validity: validity.to_string(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ContractError> {
        serde_json::from_str(text).map_err(|_| ContractError::InvalidArgument)
    }

    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn to_value(&self) -> Value {
        json!({
            "PolicyCompany": self.policy_company,
            "PolicyName": self.policy_name,
            "PolicyNumber": self.policy_number,
            "PolicyValidity": self.policy_validity,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    Text(String),
    Billing(Billing),
    Policy(Policy),
    Timestamp(u64),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One person's data within a single partition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    fields: BTreeMap<Field, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: FieldValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: Field, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field, value)
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.fields.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        match self.fields.get(&field) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.text(Field::Id)
    }

    pub fn billing(&self) -> Option<&Billing> {
        match self.fields.get(&Field::Billing) {
            Some(FieldValue::Billing(billing)) => Some(billing),
            _ => None,
        }
    }

    pub fn policy(&self) -> Option<&Policy> {
        match self.fields.get(&Field::Policy) {
            Some(FieldValue::Policy(policy)) => Some(policy),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Option<u64> {
        match self.fields.get(&Field::Timestamp) {
            Some(FieldValue::Timestamp(ts)) => Some(*ts),
            _ => None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.fields.iter().map(|(field, value)| (*field, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record keeping only `allowed` fields.
    pub fn select(&self, allowed: &[Field]) -> Record {
        let fields = self
            .fields
            .iter()
            .filter(|(field, _)| allowed.contains(field))
            .map(|(field, value)| (*field, value.clone()))
            .collect();
        Record { fields }
    }
}

/// Clinical fields written by hospital callers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClinicalInput {
    pub name: String,
    pub gender: String,
    pub blood_type: String,
    pub allergies: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl ClinicalInput {
    pub fn into_record(self) -> Record {
        let mut record = Record::new();
        self.write_into(&mut record);
        record
    }

    pub fn write_into(self, record: &mut Record) {
        record.insert(Field::Name, FieldValue::Text(self.name));
        record.insert(Field::Gender, FieldValue::Text(self.gender));
        record.insert(Field::BloodType, FieldValue::Text(self.blood_type));
        record.insert(Field::Allergies, FieldValue::Text(self.allergies));
        record.insert(Field::Diagnosis, FieldValue::Text(self.diagnosis));
        record.insert(Field::Treatment, FieldValue::Text(self.treatment));
    }
}

/// Billing and policy written by insurance callers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CoverageInput {
    pub billing: Billing,
    pub policy: Policy,
}

impl CoverageInput {
    /// Parses both sub-documents from their JSON text.
    pub fn parse(billing: &str, policy: &str) -> Result<Self, ContractError> {
        Ok(Self {
            billing: Billing::from_json(billing)?,
            policy: Policy::from_json(policy)?,
        })
    }

    pub fn into_record(self) -> Record {
        let mut record = Record::new();
        self.write_into(&mut record);
        record
    }

    pub fn write_into(self, record: &mut Record) {
        record.insert(Field::Billing, FieldValue::Billing(self.billing));
        record.insert(Field::Policy, FieldValue::Policy(self.policy));
    }
}
