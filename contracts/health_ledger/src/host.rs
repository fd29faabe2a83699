//! Soroban binding of the [`WorldState`] capability.
//!
//! Values live in persistent storage under `(REC, key)`. Soroban storage has no
//! range iteration, so every key also owns a slot: `(REC_SLOT, n) -> key` with
//! the back-reference `(REC_POS, key) -> n`, and the slot count under
//! `REC_CNT` in instance storage. Deletes swap the last slot into the freed
//! one, so writes touch a fixed number of entries however many keys exist.
//! Range scans walk the slots and filter by bounds; their order is slot order.

use alloc::boxed::Box;
use alloc::string::{String as StdString, ToString};
use alloc::vec;
use alloc::vec::Vec as StdVec;
use soroban_sdk::{symbol_short, Bytes, Env, String, Symbol};

use crate::errors::ContractError;
use crate::world_state::{StateIter, WorldState};

const RECORD: Symbol = symbol_short!("REC");
const RECORD_SLOT: Symbol = symbol_short!("REC_SLOT");
const RECORD_POS: Symbol = symbol_short!("REC_POS");
const RECORD_COUNT: Symbol = symbol_short!("REC_CNT");

/// TTL constants for persistent storage (in ledgers)
pub const TTL_THRESHOLD: u32 = 17_280; // ~1 day
pub const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

pub struct LedgerState<'a> {
    env: &'a Env,
}

impl<'a> LedgerState<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    fn storage_key(&self, key: &str) -> (Symbol, String) {
        (RECORD, String::from_str(self.env, key))
    }

    /// Number of keys holding a slot.
    pub fn key_count(&self) -> u32 {
        self.env
            .storage()
            .instance()
            .get(&RECORD_COUNT)
            .unwrap_or(0)
    }

    fn set_key_count(&self, count: u32) {
        let storage = self.env.storage().instance();
        storage.set(&RECORD_COUNT, &count);
        storage.extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    fn assign_slot(&self, slot: u32, key: &String) {
        let storage = self.env.storage().persistent();
        let slot_key = (RECORD_SLOT, slot);
        let pos_key = (RECORD_POS, key.clone());
        storage.set(&slot_key, key);
        storage.set(&pos_key, &slot);
        storage.extend_ttl(&slot_key, TTL_THRESHOLD, TTL_EXTEND_TO);
        storage.extend_ttl(&pos_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    fn release_slot(&self, key: &String) {
        let storage = self.env.storage().persistent();
        let pos_key = (RECORD_POS, key.clone());
        let slot: Option<u32> = storage.get(&pos_key);
        let Some(slot) = slot else {
            return;
        };
        storage.remove(&pos_key);

        let last = self.key_count().saturating_sub(1);
        if slot != last {
            let moved: Option<String> = storage.get(&(RECORD_SLOT, last));
            if let Some(moved) = moved {
                self.assign_slot(slot, &moved);
            }
        }
        storage.remove(&(RECORD_SLOT, last));
        self.set_key_count(last);
    }
}

impl WorldState for LedgerState<'_> {
    fn get_state(&self, key: &str) -> Option<StdVec<u8>> {
        let bytes: Bytes = self.env.storage().persistent().get(&self.storage_key(key))?;
        Some(bytes_to_vec(&bytes))
    }

    fn put_state(&mut self, key: &str, value: &[u8]) {
        let storage_key = self.storage_key(key);
        let storage = self.env.storage().persistent();
        storage.set(&storage_key, &Bytes::from_slice(self.env, value));
        storage.extend_ttl(&storage_key, TTL_THRESHOLD, TTL_EXTEND_TO);

        if !storage.has(&(RECORD_POS, storage_key.1.clone())) {
            let count = self.key_count();
            self.assign_slot(count, &storage_key.1);
            self.set_key_count(count.saturating_add(1));
        }
    }

    fn delete_state(&mut self, key: &str) {
        let storage_key = self.storage_key(key);
        self.env.storage().persistent().remove(&storage_key);
        self.release_slot(&storage_key.1);
    }

    fn state_by_range(&self, start: &str, end: &str) -> StateIter<'_> {
        let env = self.env;
        let start = start.to_string();
        let end = end.to_string();
        Box::new((0..self.key_count()).filter_map(move |slot| {
            let host_key: String = env.storage().persistent().get(&(RECORD_SLOT, slot))?;
            let key = to_std_string(&host_key)?;
            if key < start || (!end.is_empty() && key >= end) {
                return None;
            }
            let bytes: Bytes = env.storage().persistent().get(&(RECORD, host_key))?;
            Some((key, bytes_to_vec(&bytes)))
        }))
    }

    fn tx_timestamp(&self) -> u64 {
        self.env.ledger().timestamp()
    }
}

/// Copies a host string into an owned Rust string.
pub fn to_std_string(value: &String) -> Option<StdString> {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    StdString::from_utf8(buf).ok()
}

/// Reads a text argument; non UTF-8 input is rejected.
pub fn arg(value: &String) -> Result<StdString, ContractError> {
    to_std_string(value).ok_or(ContractError::InvalidArgument)
}

pub fn to_host_string(env: &Env, value: &str) -> String {
    String::from_str(env, value)
}

fn bytes_to_vec(bytes: &Bytes) -> StdVec<u8> {
    let mut buf = vec![0u8; bytes.len() as usize];
    bytes.copy_into_slice(&mut buf);
    buf
}
