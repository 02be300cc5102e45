//! Fuzz target for receipt validation.
//!
//! Tests that arbitrary JSON documents validate or reject without
//! panicking. The validator is the only gate between analyzer output
//! (or a decoded link payload) and the rest of the app.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = tab_receipt::validate(&value);
    }
});
