#![no_main]

use health_ledger::codec::{decode, encode};
use libfuzzer_sys::fuzz_target;

// Anything that decodes must re-encode to a fixed point.
fuzz_target!(|data: &[u8]| {
    if let Ok(record) = decode(data) {
        let bytes = encode(&record);
        let again = decode(&bytes).expect("canonical encoding must decode");
        assert_eq!(again, record);
        assert_eq!(encode(&again), bytes);
    }
});
