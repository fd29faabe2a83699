#![no_std]
#![allow(clippy::too_many_arguments)]
//! Role-partitioned health record ledger.
//!
//! Records live in the world state under partition-scoped keys
//! (`hospital_<id>`, `insurance_<id>`, `unified_<id>`). Hospital callers write
//! clinical fields, insurance callers write billing and policy, and every read
//! goes through a role projection.
//!
//! The engine ([`store`], [`projection`], [`codec`], [`listing`]) only sees the
//! [`world_state::WorldState`] capability; [`HealthLedgerContract`] binds it to
//! Soroban storage through [`host::LedgerState`].

extern crate alloc;

pub mod codec;
pub mod errors;
pub mod events;
pub mod host;
pub mod listing;
pub mod projection;
pub mod schema;
pub mod seed;
pub mod store;
pub mod world_state;


use alloc::string::ToString;
use alloc::vec::Vec as StdVec;
use serde_json::{json, Value};
use soroban_sdk::{contract, contractimpl, contracttype, log, symbol_short, Env, String, Symbol};

pub use errors::{ContractError, ErrorCategory};
pub use listing::{Listed, ListedEntry};
pub use projection::{Viewer, ViewerRole};
pub use schema::{Billing, ClinicalInput, CoverageInput, Field, FieldValue, Partition, Policy, Record};
pub use store::{CombinedRecord, RecordStore, RecordView, Written};
pub use world_state::{MemoryState, WorldState};

use host::{arg, to_host_string, LedgerState, TTL_EXTEND_TO, TTL_THRESHOLD};

/// Storage keys for the contract
const INITIALIZED: Symbol = symbol_short!("INIT");

/// Clinical fields as submitted by hospital callers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClinicalFields {
    pub name: String,
    pub gender: String,
    pub blood_type: String,
    pub allergies: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl ClinicalFields {
    fn to_input(&self) -> Result<ClinicalInput, ContractError> {
        Ok(ClinicalInput {
            name: arg(&self.name)?,
            gender: arg(&self.gender)?,
            blood_type: arg(&self.blood_type)?,
            allergies: arg(&self.allergies)?,
            diagnosis: arg(&self.diagnosis)?,
            treatment: arg(&self.treatment)?,
        })
    }
}

fn coverage_input(billing: &String, policy: &String) -> Result<CoverageInput, ContractError> {
    CoverageInput::parse(&arg(billing)?, &arg(policy)?)
}

/// Runs an entry point body, logging the operation on failure.
fn guarded<T>(
    env: &Env,
    operation: &str,
    body: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    body().map_err(|err| {
        log!(
            env,
            "health ledger operation failed",
            Symbol::new(env, operation),
            err as u32
        );
        err
    })
}

fn log_dropped(env: &Env, written: &Written) {
    if !written.dropped.is_empty() {
        log!(
            env,
            "fields outside partition ignored",
            to_host_string(env, &written.key),
            written.dropped.len() as u32
        );
    }
}

fn create_record(
    env: &Env,
    partition: Partition,
    id: &String,
    fields: Record,
) -> Result<String, ContractError> {
    let id = arg(id)?;
    let mut state = LedgerState::new(env);
    let written = RecordStore::new(&mut state).create(partition, &id, fields)?;
    log_dropped(env, &written);
    events::publish_record_created(env, to_host_string(env, &written.key), partition);
    Ok(to_host_string(env, &codec::to_json_string(&written.record)))
}

fn update_record(
    env: &Env,
    partition: Partition,
    id: &String,
    fields: Record,
) -> Result<String, ContractError> {
    let id = arg(id)?;
    let mut state = LedgerState::new(env);
    let written = RecordStore::new(&mut state).update(partition, &id, fields)?;
    log_dropped(env, &written);
    events::publish_record_updated(env, to_host_string(env, &written.key), partition);
    Ok(to_host_string(env, &codec::to_json_string(&written.record)))
}

fn read_record(env: &Env, partition: Partition, id: &String) -> Result<Record, ContractError> {
    let id = arg(id)?;
    let state = LedgerState::new(env);
    RecordView::new(&state).read(partition, &id)
}

fn read_view(
    env: &Env,
    partition: Partition,
    id: &String,
    viewer: &Viewer,
) -> Result<String, ContractError> {
    let record = read_record(env, partition, id)?;
    let view = projection::project(&record, viewer)?;
    Ok(to_host_string(env, &codec::to_json_string(&view)))
}

fn viewer(role: ViewerRole, caller_id: &String) -> Result<Viewer, ContractError> {
    Ok(Viewer::new(role, arg(caller_id)?))
}

#[contract]
pub struct HealthLedgerContract;

#[contractimpl]
impl HealthLedgerContract {
    // ── Initialization ───────────────────────────────────────────────────────

    /// Write the seed records. Returns the number of records written.
    pub fn init_ledger(env: Env) -> Result<u32, ContractError> {
        guarded(&env, "init_ledger", || {
            if env.storage().instance().has(&INITIALIZED) {
                return Err(ContractError::AlreadyInitialized);
            }

            let mut state = LedgerState::new(&env);
            let written = seed::seed_ledger(&mut RecordStore::new(&mut state))?;

            env.storage().instance().set(&INITIALIZED, &true);
            env.storage()
                .instance()
                .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

            for entry in &written {
                events::publish_record_created(
                    &env,
                    to_host_string(&env, &entry.key),
                    entry.partition,
                );
            }
            let seeded = written.len() as u32;
            events::publish_initialized(&env, seeded);
            Ok(seeded)
        })
    }

    /// Check if the seed records have been written
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Hospital partition ───────────────────────────────────────────────────

    /// Create a hospital record holding clinical fields only
    pub fn create_hospital_record(
        env: Env,
        id: String,
        name: String,
        gender: String,
        blood_type: String,
        allergies: String,
        diagnosis: String,
        treatment: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "create_hospital_record", || {
            let clinical = ClinicalFields {
                name,
                gender,
                blood_type,
                allergies,
                diagnosis,
                treatment,
            }
            .to_input()?;
            create_record(&env, Partition::Hospital, &id, clinical.into_record())
        })
    }

    /// Read the clinical view of a hospital record
    pub fn read_hospital_record(env: Env, id: String) -> Result<String, ContractError> {
        guarded(&env, "read_hospital_record", || {
            read_view(&env, Partition::Hospital, &id, &Viewer::Hospital)
        })
    }

    /// Replace the clinical fields of a hospital record
    pub fn update_hospital_record(
        env: Env,
        id: String,
        name: String,
        gender: String,
        blood_type: String,
        allergies: String,
        diagnosis: String,
        treatment: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "update_hospital_record", || {
            let clinical = ClinicalFields {
                name,
                gender,
                blood_type,
                allergies,
                diagnosis,
                treatment,
            }
            .to_input()?;
            update_record(&env, Partition::Hospital, &id, clinical.into_record())
        })
    }

    // ── Insurance partition ──────────────────────────────────────────────────

    /// Create an insurance record from billing and policy JSON documents
    pub fn create_insurance_record(
        env: Env,
        id: String,
        billing: String,
        policy: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "create_insurance_record", || {
            let coverage = coverage_input(&billing, &policy)?;
            create_record(&env, Partition::Insurance, &id, coverage.into_record())
        })
    }

    /// Read the billing and policy view of an insurance record
    pub fn read_insurance_record(env: Env, id: String) -> Result<String, ContractError> {
        guarded(&env, "read_insurance_record", || {
            read_view(&env, Partition::Insurance, &id, &Viewer::Insurance)
        })
    }

    /// Replace billing and policy of an insurance record
    pub fn update_insurance_record(
        env: Env,
        id: String,
        billing: String,
        policy: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "update_insurance_record", || {
            let coverage = coverage_input(&billing, &policy)?;
            update_record(&env, Partition::Insurance, &id, coverage.into_record())
        })
    }

    // ── Unified partition ────────────────────────────────────────────────────

    /// Create a unified record carrying clinical and coverage fields
    pub fn create_unified_record(
        env: Env,
        id: String,
        clinical: ClinicalFields,
        billing: String,
        policy: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "create_unified_record", || {
            let mut fields = clinical.to_input()?.into_record();
            coverage_input(&billing, &policy)?.write_into(&mut fields);
            create_record(&env, Partition::Unified, &id, fields)
        })
    }

    /// Replace every mutable field of a unified record
    pub fn update_unified_record(
        env: Env,
        id: String,
        clinical: ClinicalFields,
        billing: String,
        policy: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "update_unified_record", || {
            let mut fields = clinical.to_input()?.into_record();
            coverage_input(&billing, &policy)?.write_into(&mut fields);
            update_record(&env, Partition::Unified, &id, fields)
        })
    }

    // ── Role-scoped reads ────────────────────────────────────────────────────

    /// Read any partition's record through the projection of `role`.
    /// Patients must pass their own identifier as `caller_id`.
    pub fn query_record(
        env: Env,
        partition: Partition,
        id: String,
        role: ViewerRole,
        caller_id: String,
    ) -> Result<String, ContractError> {
        guarded(&env, "query_record", || {
            read_view(&env, partition, &id, &viewer(role, &caller_id)?)
        })
    }

    /// Whether `role` has anything to read in the record
    pub fn check_access(
        env: Env,
        partition: Partition,
        id: String,
        role: ViewerRole,
        caller_id: String,
    ) -> Result<bool, ContractError> {
        guarded(&env, "check_access", || {
            let record = read_record(&env, partition, &id)?;
            Ok(projection::check_access(&record, &viewer(role, &caller_id)?))
        })
    }

    /// Read both the hospital and insurance records of a patient
    pub fn read_patient_record(env: Env, id: String) -> Result<String, ContractError> {
        guarded(&env, "read_patient_record", || {
            let id = arg(&id)?;
            let state = LedgerState::new(&env);
            let combined = RecordView::new(&state).read_combined(&id)?;
            let document = json!({
                "hospitalRecord": combined.hospital.as_ref().map(codec::to_value).unwrap_or(Value::Null),
                "insuranceRecord": combined.insurance.as_ref().map(codec::to_value).unwrap_or(Value::Null),
            });
            Ok(to_host_string(&env, &document.to_string()))
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Remove a record from its partition
    pub fn delete_record(env: Env, partition: Partition, id: String) -> Result<(), ContractError> {
        guarded(&env, "delete_record", || {
            let id = arg(&id)?;
            let mut state = LedgerState::new(&env);
            RecordStore::new(&mut state).delete(partition, &id)?;
            let key = schema::derive_key(partition, &id)?;
            events::publish_record_deleted(&env, to_host_string(&env, &key), partition);
            Ok(())
        })
    }

    /// Check whether a record exists in a partition
    pub fn record_exists(env: Env, partition: Partition, id: String) -> Result<bool, ContractError> {
        guarded(&env, "record_exists", || {
            let id = arg(&id)?;
            let state = LedgerState::new(&env);
            RecordView::new(&state).exists(partition, &id)
        })
    }

    /// List every stored value as `{"Key", "Record"}` objects.
    /// Values that do not decode are returned as raw text.
    pub fn get_all_records(env: Env) -> String {
        let state = LedgerState::new(&env);
        let entries: StdVec<ListedEntry> = RecordView::new(&state).list_all().collect();

        let raw = entries.iter().filter(|entry| entry.is_raw()).count();
        if raw > 0 {
            log!(&env, "undecodable values listed raw", raw as u32);
        }
        to_host_string(&env, &listing::to_json_array(&entries).to_string())
    }
}
