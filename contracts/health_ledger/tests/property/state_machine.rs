#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the record store.
//!
//! Random operation sequences run against a [`RecordStore`] over
//! [`MemoryState`] and against a plain map model of what each key should hold.
//!
//! Invariants tested:
//! - Create succeeds iff the key is absent; update and delete iff it is present
//! - Reads always return the last written record for the key
//! - Listing yields each live key exactly once
//! - Only updates carry a timestamp, and it is the state's transaction time

use std::collections::BTreeMap;

use health_ledger::schema::derive_key;
use health_ledger::{
    Billing, ClinicalInput, ContractError, CoverageInput, Field, Listed, MemoryState, Partition,
    Policy, Record, RecordStore,
};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

// ── Model ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Create {
        #[proptest(strategy = "0u8..3")]
        partition: u8,
        #[proptest(strategy = "0u8..4")]
        slot: u8,
        variant: u8,
    },
    Update {
        #[proptest(strategy = "0u8..3")]
        partition: u8,
        #[proptest(strategy = "0u8..4")]
        slot: u8,
        variant: u8,
    },
    Delete {
        #[proptest(strategy = "0u8..3")]
        partition: u8,
        #[proptest(strategy = "0u8..4")]
        slot: u8,
    },
    Tick(#[proptest(strategy = "1u64..1_000")] u64),
}

fn partition_from_u8(n: u8) -> Partition {
    Partition::ALL[n as usize % Partition::ALL.len()]
}

fn patient_id(slot: u8) -> String {
    format!("patient{slot}")
}

/// Input a caller of `partition` would submit.
fn input_for(partition: Partition, variant: u8) -> Record {
    let clinical = ClinicalInput {
        name: format!("Name {variant}"),
        gender: "Other".to_string(),
        blood_type: "B+".to_string(),
        allergies: "None".to_string(),
        diagnosis: format!("Diagnosis {variant}"),
        treatment: "Observation".to_string(),
    };
    let coverage = CoverageInput {
        billing: Billing::new(u64::from(variant) * 10, u64::from(variant), 0),
        policy: Policy::new("INS1", "Plan", "Carrier", "2030-01-01"),
    };
    match partition {
        Partition::Hospital => clinical.into_record(),
        Partition::Insurance => coverage.into_record(),
        Partition::Unified => {
            let mut record = clinical.into_record();
            coverage.write_into(&mut record);
            record
        }
    }
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_store_matches_model(ops in proptest::collection::vec(any::<Op>(), 1..40)) {
        let mut state = MemoryState::new();
        let mut model: BTreeMap<String, Record> = BTreeMap::new();
        let mut now = 0u64;

        for op in ops {
            match op {
                Op::Create { partition, slot, variant } => {
                    let partition = partition_from_u8(partition);
                    let id = patient_id(slot);
                    let key = derive_key(partition, &id).unwrap();
                    let result = RecordStore::new(&mut state).create(partition, &id, input_for(partition, variant));
                    if model.contains_key(&key) {
                        prop_assert_eq!(result, Err(ContractError::AlreadyExists));
                    } else {
                        let written = result.unwrap();
                        prop_assert_eq!(&written.key, &key);
                        prop_assert!(written.dropped.is_empty());
                        prop_assert_eq!(written.record.timestamp(), None);
                        model.insert(key, written.record);
                    }
                }
                Op::Update { partition, slot, variant } => {
                    let partition = partition_from_u8(partition);
                    let id = patient_id(slot);
                    let key = derive_key(partition, &id).unwrap();
                    let result = RecordStore::new(&mut state).update(partition, &id, input_for(partition, variant));
                    if model.contains_key(&key) {
                        let written = result.unwrap();
                        prop_assert_eq!(written.record.timestamp(), Some(now));
                        prop_assert_eq!(written.record.id(), Some(id.as_str()));
                        model.insert(key, written.record);
                    } else {
                        prop_assert_eq!(result, Err(ContractError::NotFound));
                    }
                }
                Op::Delete { partition, slot } => {
                    let partition = partition_from_u8(partition);
                    let id = patient_id(slot);
                    let key = derive_key(partition, &id).unwrap();
                    let result = RecordStore::new(&mut state).delete(partition, &id);
                    if model.remove(&key).is_some() {
                        prop_assert_eq!(result, Ok(()));
                    } else {
                        prop_assert_eq!(result, Err(ContractError::NotFound));
                    }
                }
                Op::Tick(by) => {
                    now += by;
                    state.set_timestamp(now);
                }
            }
        }

        let store = RecordStore::new(&mut state);
        for (key, expected) in &model {
            let (partition, id) = health_ledger::schema::parse_key(key).unwrap();
            prop_assert_eq!(&store.read(partition, id).unwrap(), expected);
            if partition == Partition::Unified {
                prop_assert_eq!(expected.text(Field::DocType), Some("healthRecord"));
            }
        }

        let mut listed: Vec<(String, Record)> = store
            .list_all()
            .map(|entry| match entry.value {
                Listed::Record(record) => (entry.key, record),
                Listed::Raw(raw) => panic!("unexpected raw value {raw}"),
            })
            .collect();
        // scan order is up to the backend
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        let expected: Vec<(String, Record)> = model.into_iter().collect();
        prop_assert_eq!(listed, expected);
    }

    /// Reading a patient's combined record tracks which partitions hold it.
    #[test]
    fn prop_combined_read_reflects_partitions(hospital in any::<bool>(), insurance in any::<bool>()) {
        let mut state = MemoryState::new();
        let mut store = RecordStore::new(&mut state);
        if hospital {
            store.create(Partition::Hospital, "p1", input_for(Partition::Hospital, 1)).unwrap();
        }
        if insurance {
            store.create(Partition::Insurance, "p1", input_for(Partition::Insurance, 1)).unwrap();
        }

        match store.read_combined("p1") {
            Ok(combined) => {
                prop_assert_eq!(combined.hospital.is_some(), hospital);
                prop_assert_eq!(combined.insurance.is_some(), insurance);
            }
            Err(e) => {
                prop_assert!(!hospital && !insurance);
                prop_assert_eq!(e, ContractError::NoRecordsFound);
            }
        }
    }
}
