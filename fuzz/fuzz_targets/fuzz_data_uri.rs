//! Fuzz target for data-URI image parsing.
//!
//! Tests that `ImagePayload::from_data_uri` handles arbitrary text
//! without panicking; malformed URIs must come back as errors.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tab_core::vision::ImagePayload;

fuzz_target!(|data: &str| {
    let _ = ImagePayload::from_data_uri(data);
});
