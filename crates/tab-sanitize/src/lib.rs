//! Sanitization engine for untrusted receipt data.
//!
//! Everything that enters tabsplit from outside — vision-model output and
//! decoded share links — is attacker-influenced. This crate provides the
//! single, reusable normalization layer the validator applies to every
//! field before it is allowed into a trusted `Receipt`:
//!
//! - **Text fields**: HTML/XML tag stripping, whitespace trimming, and a
//!   hard length bound, applied in a fixed order that is idempotent.
//! - **Numeric fields**: coercion to a finite `f64` with field-specific
//!   defaults, clamped to be non-negative.
//!
//! Sanitization never fails. Irreparable input degrades to a safe default
//! instead of producing an error; rejecting whole documents is the
//! validator's job, not this crate's.
//!
//! # Example
//!
//! ```
//! use tab_sanitize::{sanitize_text, sanitize_money};
//!
//! assert_eq!(sanitize_text("  <b>Pad Thai</b>  "), "Pad Thai");
//! assert_eq!(sanitize_money(Some(&serde_json::json!("12.50"))), 12.5);
//! assert_eq!(sanitize_money(Some(&serde_json::json!(-3))), 0.0);
//! ```

pub mod number;
pub mod text;

pub use number::{coerce_number, sanitize_money, sanitize_quantity};
pub use text::{sanitize_text, MAX_TEXT_LEN};
