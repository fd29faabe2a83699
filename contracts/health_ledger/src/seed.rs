use alloc::string::ToString;
use alloc::vec::Vec;

use crate::errors::ContractError;
use crate::schema::{Billing, ClinicalInput, CoverageInput, Partition, Policy, Record};
use crate::store::{RecordStore, Written};
use crate::world_state::WorldState;

pub const SEED_HOSPITAL_ID: &str = "hospitalPatient1";
pub const SEED_INSURANCE_ID: &str = "insurancePatient1";

/// The fixed records written when the ledger is seeded.
pub fn seed_records() -> [(Partition, &'static str, Record); 2] {
    let hospital = ClinicalInput {
        name: "John Doe".to_string(),
        gender: "Male".to_string(),
        blood_type: "O+".to_string(),
        allergies: "Peanuts".to_string(),
        diagnosis: "Hypertension".to_string(),
        treatment: "Medication A".to_string(),
    };
    let insurance = CoverageInput {
        billing: Billing::new(1500, 1500, 0),
        policy: Policy::new(
            "INS123456",
            "Health Protection Plan",
            "ABC Insurance Co.",
            "2025-12-31",
        ),
    };
    [
        (Partition::Hospital, SEED_HOSPITAL_ID, hospital.into_record()),
        (Partition::Insurance, SEED_INSURANCE_ID, insurance.into_record()),
    ]
}

/// Writes the seed records through the regular create path.
pub fn seed_ledger<S: WorldState + ?Sized>(
    store: &mut RecordStore<'_, S>,
) -> Result<Vec<Written>, ContractError> {
    seed_records()
        .into_iter()
        .map(|(partition, id, record)| store.create(partition, id, record))
        .collect()
}
