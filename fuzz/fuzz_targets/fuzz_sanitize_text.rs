//! Fuzz target for untrusted text sanitization.
//!
//! Checks the documented contract on arbitrary input: bounded length,
//! no surrounding whitespace, and idempotence.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tab_sanitize::{sanitize_text, MAX_TEXT_LEN};

fuzz_target!(|data: &str| {
    let clean = sanitize_text(data);
    assert!(clean.chars().count() <= MAX_TEXT_LEN);
    assert_eq!(clean, clean.trim());
    assert_eq!(sanitize_text(&clean), clean);
});
