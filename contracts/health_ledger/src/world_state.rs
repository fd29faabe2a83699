//! The key-value capability the record engine runs against.
//!
//! The engine never touches host storage directly. Every operation receives a
//! [`WorldState`], so the same code runs on the Soroban host
//! ([`crate::host::LedgerState`]) and against [`MemoryState`] in tests and
//! off-chain tooling.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::Bound;

/// Single-pass iterator over `(key, value)` pairs of a range scan.
pub type StateIter<'a> = Box<dyn Iterator<Item = (String, Vec<u8>)> + 'a>;

pub trait WorldState {
    /// Value stored at `key`, if any.
    fn get_state(&self, key: &str) -> Option<Vec<u8>>;

    fn put_state(&mut self, key: &str, value: &[u8]);

    fn delete_state(&mut self, key: &str);

    /// Entries with `start <= key < end`. An empty bound is unbounded.
    fn state_by_range(&self, start: &str, end: &str) -> StateIter<'_>;

    /// Timestamp of the executing transaction, in seconds.
    fn tx_timestamp(&self) -> u64;
}

/// In-memory world state.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    entries: BTreeMap<String, Vec<u8>>,
    timestamp: u64,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(timestamp: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WorldState for MemoryState {
    fn get_state(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put_state(&mut self, key: &str, value: &[u8]) {
        self.entries.insert(key.to_string(), value.to_vec());
    }

    fn delete_state(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn state_by_range(&self, start: &str, end: &str) -> StateIter<'_> {
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        if !end.is_empty() && start >= end {
            return Box::new(core::iter::empty());
        }
        Box::new(
            self.entries
                .range::<str, _>((Bound::Included(start), upper))
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }

    fn tx_timestamp(&self) -> u64 {
        self.timestamp
    }
}
