//! Role-scoped read views and write-side field restriction.

use alloc::string::String;
use alloc::vec::Vec;
use soroban_sdk::contracttype;

use crate::errors::ContractError;
use crate::schema::{Field, Partition, Record};

/// Roles a caller can read as.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ViewerRole {
    Hospital = 1,
    Insurance = 2,
    Patient = 3,
}

/// Fields visible to clinical viewers.
pub const CLINICAL_VIEW: &[Field] = &[
    Field::Id,
    Field::Name,
    Field::Gender,
    Field::BloodType,
    Field::Allergies,
    Field::Diagnosis,
    Field::Treatment,
    Field::Timestamp,
];

/// Fields visible to insurance viewers.
pub const COVERAGE_VIEW: &[Field] = &[Field::Id, Field::Billing, Field::Policy];

impl ViewerRole {
    /// Fields this role may see, `None` meaning the whole record.
    pub fn visible_fields(&self) -> Option<&'static [Field]> {
        match self {
            ViewerRole::Hospital => Some(CLINICAL_VIEW),
            ViewerRole::Insurance => Some(COVERAGE_VIEW),
            ViewerRole::Patient => None,
        }
    }
}

/// A role together with the identity it reads on behalf of.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Viewer {
    Hospital,
    Insurance,
    /// A patient reading their own record.
    Patient(String),
}

impl Viewer {
    pub fn new(role: ViewerRole, caller_id: String) -> Self {
        match role {
            ViewerRole::Hospital => Viewer::Hospital,
            ViewerRole::Insurance => Viewer::Insurance,
            ViewerRole::Patient => Viewer::Patient(caller_id),
        }
    }

    pub fn role(&self) -> ViewerRole {
        match self {
            Viewer::Hospital => ViewerRole::Hospital,
            Viewer::Insurance => ViewerRole::Insurance,
            Viewer::Patient(_) => ViewerRole::Patient,
        }
    }
}

/// Produces the view of `record` that `viewer` is permitted to see.
pub fn project(record: &Record, viewer: &Viewer) -> Result<Record, ContractError> {
    if let Viewer::Patient(caller) = viewer {
        if !owns(record, caller) {
            return Err(ContractError::AccessDenied);
        }
    }
    Ok(match viewer.role().visible_fields() {
        Some(fields) => record.select(fields),
        None => record.clone(),
    })
}

/// Whether `viewer` has anything to read in `record`.
///
/// Insurance viewers only have access once billing has been recorded.
pub fn check_access(record: &Record, viewer: &Viewer) -> bool {
    match viewer {
        Viewer::Hospital => true,
        Viewer::Insurance => record.billing().is_some(),
        Viewer::Patient(caller) => owns(record, caller),
    }
}

fn owns(record: &Record, caller: &str) -> bool {
    !caller.is_empty() && record.id() == Some(caller)
}

/// Drops every field `partition` does not permit.
///
/// Returns the restricted record and the fields that were dropped.
pub fn restrict(record: Record, partition: Partition) -> (Record, Vec<Field>) {
    let dropped: Vec<Field> = record
        .fields()
        .map(|(field, _)| field)
        .filter(|field| !partition.permits(*field))
        .collect();
    if dropped.is_empty() {
        return (record, dropped);
    }
    (record.select(partition.allowed_fields()), dropped)
}
