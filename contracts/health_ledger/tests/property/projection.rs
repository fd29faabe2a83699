#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for role projection and partition restriction.
//!
//! Invariants tested:
//! - A projected view never holds a field outside the role's visible set
//! - A patient sees the whole record iff the caller identifier equals its ID
//! - Restriction keeps exactly the permitted fields and reports the rest
//! - Clinical fields and coverage never share a stakeholder view

use health_ledger::projection::{project, restrict};
use health_ledger::{ContractError, Field, FieldValue, Partition, Record, Viewer, ViewerRole};
use proptest::prelude::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn partition_from_u8(n: u8) -> Partition {
    Partition::ALL[n as usize % Partition::ALL.len()]
}

fn role_from_u8(n: u8) -> ViewerRole {
    match n % 3 {
        0 => ViewerRole::Hospital,
        1 => ViewerRole::Insurance,
        _ => ViewerRole::Patient,
    }
}

/// Record holding the fields selected by `mask`, each with a text or
/// timestamp value.
fn record_from_mask(id: &str, mask: u16) -> Record {
    let mut record = Record::new().with(Field::Id, FieldValue::text(id));
    for (bit, field) in Field::ALL.iter().enumerate() {
        if mask & (1 << bit) == 0 || *field == Field::Id {
            continue;
        }
        let value = match field {
            Field::Timestamp => FieldValue::Timestamp(bit as u64),
            Field::Billing => FieldValue::Billing(health_ledger::Billing::new(3, 1, 2)),
            Field::Policy => FieldValue::Policy(health_ledger::Policy::new("N", "P", "C", "V")),
            _ => FieldValue::text(field.name()),
        };
        record.insert(*field, value);
    }
    record
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    /// Hospital and insurance views only ever expose their visible fields.
    #[test]
    fn prop_view_is_subset_of_visible_fields(mask in any::<u16>(), role_idx in 0u8..2) {
        let record = record_from_mask("p1", mask);
        let role = role_from_u8(role_idx);
        let visible = role.visible_fields().unwrap();

        let view = project(&record, &Viewer::new(role, String::new())).unwrap();
        for (field, value) in view.fields() {
            prop_assert!(visible.contains(&field));
            prop_assert_eq!(Some(value), record.get(field));
        }
        for field in visible {
            prop_assert_eq!(view.contains(*field), record.contains(*field));
        }
    }

    /// Patients read everything of their own record and nothing of others'.
    #[test]
    fn prop_patient_sees_only_own_record(
        id in "[a-z0-9]{1,8}",
        caller in "[a-z0-9]{0,8}",
        mask in any::<u16>(),
    ) {
        let record = record_from_mask(&id, mask);
        let result = project(&record, &Viewer::new(ViewerRole::Patient, caller.clone()));
        if caller == id {
            prop_assert_eq!(result.unwrap(), record);
        } else {
            prop_assert_eq!(result, Err(ContractError::AccessDenied));
        }
    }

    /// Restriction is a partition-wide filter with a complete drop report.
    #[test]
    fn prop_restrict_partitions_fields(mask in any::<u16>(), partition_idx in any::<u8>()) {
        let partition = partition_from_u8(partition_idx);
        let record = record_from_mask("p1", mask);
        let (kept, dropped) = restrict(record.clone(), partition);

        prop_assert_eq!(kept.len() + dropped.len(), record.len());
        for (field, _) in kept.fields() {
            prop_assert!(partition.permits(field));
        }
        for field in &dropped {
            prop_assert!(!partition.permits(*field));
            prop_assert!(record.contains(*field));
        }
    }

    /// The insurance view never carries a clinical field, the hospital view
    /// never carries coverage.
    #[test]
    fn prop_views_separate_clinical_and_coverage(mask in any::<u16>()) {
        let record = record_from_mask("p1", mask);

        let insurer = project(&record, &Viewer::Insurance).unwrap();
        prop_assert!(insurer.fields().all(|(field, _)| !field.is_clinical()));

        let clinician = project(&record, &Viewer::Hospital).unwrap();
        for field in Field::CLINICAL {
            prop_assert_eq!(clinician.contains(field), record.contains(field));
        }
        prop_assert!(!clinician.contains(Field::Billing));
        prop_assert!(!clinician.contains(Field::Policy));
    }

    /// The role code carried across the contract boundary matches the viewer.
    #[test]
    fn prop_viewer_role_round_trips(role_idx in any::<u8>(), caller in "[a-z]{0,4}") {
        let role = role_from_u8(role_idx);
        prop_assert_eq!(Viewer::new(role, caller).role(), role);
    }
}
