//! Fuzz target for share-token decoding.
//!
//! Tests that `decode` handles arbitrary token text without panicking:
//! hostile links must collapse to an error, never crash.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Every failure stage maps to LinkError::Invalid
    let _ = tab_link::decode(data);
});
