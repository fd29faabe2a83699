#![allow(dead_code)]
use health_ledger::host::to_std_string;
use health_ledger::{ClinicalFields, HealthLedgerContract, HealthLedgerContractClient};
use serde_json::Value;
use soroban_sdk::{Env, String};

pub const BILLING: &str = r#"{"Total":1500,"Paid":1500,"Due":0}"#;
pub const POLICY: &str = r#"{"PolicyNumber":"INS123456","PolicyName":"Health Protection Plan","PolicyCompany":"ABC Insurance Co.","PolicyValidity":"2025-12-31"}"#;

pub struct TestContext {
    pub env: Env,
    pub client: HealthLedgerContractClient<'static>,
}

impl TestContext {
    pub fn text(&self, value: &str) -> String {
        String::from_str(&self.env, value)
    }
}

/// Creates a Soroban environment and deploys an empty ledger.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    let contract_id = env.register(HealthLedgerContract, ());
    let client = HealthLedgerContractClient::new(&env, &contract_id);
    TestContext { env, client }
}

/// Parses a JSON document returned by the contract.
pub fn parse(value: &String) -> Value {
    serde_json::from_str(&to_std_string(value).unwrap()).unwrap()
}

pub fn billing_json(total: u64, paid: u64, due: u64) -> std::string::String {
    format!(r#"{{"Total":{total},"Paid":{paid},"Due":{due}}}"#)
}

pub fn clinical_fields(ctx: &TestContext, diagnosis: &str) -> ClinicalFields {
    ClinicalFields {
        name: ctx.text("Jane Smith"),
        gender: ctx.text("Female"),
        blood_type: ctx.text("A-"),
        allergies: ctx.text("None"),
        diagnosis: ctx.text(diagnosis),
        treatment: ctx.text("Rest"),
    }
}

/// Creates a hospital record with the given diagnosis and returns its JSON.
pub fn create_test_hospital_record(ctx: &TestContext, id: &str, diagnosis: &str) -> Value {
    let created = ctx.client.create_hospital_record(
        &ctx.text(id),
        &ctx.text("John Doe"),
        &ctx.text("Male"),
        &ctx.text("O+"),
        &ctx.text("Peanuts"),
        &ctx.text(diagnosis),
        &ctx.text("Medication A"),
    );
    parse(&created)
}

/// Creates an insurance record with the default policy and returns its JSON.
pub fn create_test_insurance_record(ctx: &TestContext, id: &str, billing: &str) -> Value {
    let created =
        ctx.client
            .create_insurance_record(&ctx.text(id), &ctx.text(billing), &ctx.text(POLICY));
    parse(&created)
}
