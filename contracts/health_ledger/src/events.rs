use soroban_sdk::{symbol_short, Env, String};

use crate::schema::Partition;

/// Event published when a record is written or removed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordEvent {
    pub key: String,
    pub partition: Partition,
    pub timestamp: u64,
}

/// Event published when the seed records are written.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerInitializedEvent {
    pub seeded: u32,
    pub timestamp: u64,
}

fn record_event(env: &Env, key: &String, partition: Partition) -> RecordEvent {
    RecordEvent {
        key: key.clone(),
        partition,
        timestamp: env.ledger().timestamp(),
    }
}

pub fn publish_initialized(env: &Env, seeded: u32) {
    let data = LedgerInitializedEvent {
        seeded,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((symbol_short!("LDG_INIT"),), data);
}

pub fn publish_record_created(env: &Env, key: String, partition: Partition) {
    let data = record_event(env, &key, partition);
    env.events().publish((symbol_short!("REC_NEW"), key), data);
}

pub fn publish_record_updated(env: &Env, key: String, partition: Partition) {
    let data = record_event(env, &key, partition);
    env.events().publish((symbol_short!("REC_UPD"), key), data);
}

pub fn publish_record_deleted(env: &Env, key: String, partition: Partition) {
    let data = record_event(env, &key, partition);
    env.events().publish((symbol_short!("REC_DEL"), key), data);
}
