//! tabsplit Core Library
//!
//! This library provides the application layer of tabsplit:
//! - Exit codes for CLI operations
//! - Structured logging setup
//! - Output rendering for the supported formats
//! - The session state machine driving a capture-and-claim flow
//! - The vision boundary that turns receipt photos into validated data
//!
//! The binary entry point is in `main.rs`. Validation, share links, and
//! split math live in `tab-receipt`, `tab-link`, and `tab-split`.

pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod session;
pub mod vision;
