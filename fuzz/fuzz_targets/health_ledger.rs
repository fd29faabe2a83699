#![no_main]

use arbitrary::Arbitrary;
use health_ledger::{
    ClinicalFields, HealthLedgerContract, HealthLedgerContractClient, Partition, ViewerRole,
};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{Env, String};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    InitLedger,
    CreateHospital { slot: u8, diagnosis: std::string::String },
    CreateInsurance { slot: u8, billing: std::string::String, policy: std::string::String },
    CreateUnified { slot: u8, total: u64, paid: u64, due: u64 },
    UpdateHospital { slot: u8, diagnosis: std::string::String },
    UpdateInsurance { slot: u8, total: u64, paid: u64, due: u64 },
    Query { partition: u8, slot: u8, role: u8, caller: u8 },
    ReadPatient { slot: u8 },
    Delete { partition: u8, slot: u8 },
    ListAll,
}

fn partition(n: u8) -> Partition {
    Partition::ALL[n as usize % Partition::ALL.len()]
}

fn role(n: u8) -> ViewerRole {
    match n % 3 {
        0 => ViewerRole::Hospital,
        1 => ViewerRole::Insurance,
        _ => ViewerRole::Patient,
    }
}

const POLICY: &str = r#"{"PolicyNumber":"N1","PolicyName":"Plan","PolicyCompany":"Co","PolicyValidity":"2030-01-01"}"#;

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    let contract_id = env.register(HealthLedgerContract, ());
    let client = HealthLedgerContractClient::new(&env, &contract_id);

    let text = |value: &str| String::from_str(&env, value);
    // A small id space so operations collide on the same keys.
    let id = |slot: u8| text(&std::format!("p{}", slot % 4));
    let billing = |total: u64, paid: u64, due: u64| {
        text(&std::format!(r#"{{"Total":{total},"Paid":{paid},"Due":{due}}}"#))
    };
    let clinical = |diagnosis: &str| ClinicalFields {
        name: text("Fuzz"),
        gender: text("X"),
        blood_type: text("O-"),
        allergies: text("None"),
        diagnosis: text(diagnosis),
        treatment: text("None"),
    };

    // Errors are expected; only traps and panics are findings.
    for action in actions {
        match action {
            FuzzAction::InitLedger => {
                let _ = client.try_init_ledger();
            }
            FuzzAction::CreateHospital { slot, diagnosis } => {
                let c = clinical(&diagnosis);
                let _ = client.try_create_hospital_record(
                    &id(slot),
                    &c.name,
                    &c.gender,
                    &c.blood_type,
                    &c.allergies,
                    &c.diagnosis,
                    &c.treatment,
                );
            }
            FuzzAction::CreateInsurance { slot, billing, policy } => {
                let _ = client.try_create_insurance_record(&id(slot), &text(&billing), &text(&policy));
            }
            FuzzAction::CreateUnified { slot, total, paid, due } => {
                let _ = client.try_create_unified_record(
                    &id(slot),
                    &clinical("Fuzz"),
                    &billing(total, paid, due),
                    &text(POLICY),
                );
            }
            FuzzAction::UpdateHospital { slot, diagnosis } => {
                let c = clinical(&diagnosis);
                let _ = client.try_update_hospital_record(
                    &id(slot),
                    &c.name,
                    &c.gender,
                    &c.blood_type,
                    &c.allergies,
                    &c.diagnosis,
                    &c.treatment,
                );
            }
            FuzzAction::UpdateInsurance { slot, total, paid, due } => {
                let _ = client.try_update_insurance_record(
                    &id(slot),
                    &billing(total, paid, due),
                    &text(POLICY),
                );
            }
            FuzzAction::Query { partition: p, slot, role: r, caller } => {
                let _ = client.try_query_record(&partition(p), &id(slot), &role(r), &id(caller));
            }
            FuzzAction::ReadPatient { slot } => {
                let _ = client.try_read_patient_record(&id(slot));
            }
            FuzzAction::Delete { partition: p, slot } => {
                let _ = client.try_delete_record(&partition(p), &id(slot));
            }
            FuzzAction::ListAll => {
                let _ = client.try_get_all_records();
            }
        }
    }
});
