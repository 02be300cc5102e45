//! Error types for receipt validation.

use thiserror::Error;

/// Result type alias for receipt operations.
pub type Result<T> = std::result::Result<T, ReceiptError>;

/// Errors produced by the integrity validator.
///
/// The validator has exactly one failure mode: the input lacks the
/// minimum structure a receipt needs. Everything else is repaired
/// in place with field defaults rather than rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    /// Input is missing the structural prerequisites of a receipt.
    #[error("structurally invalid receipt: {reason}")]
    StructurallyInvalid { reason: String },
}

impl ReceiptError {
    /// Stable error code for machine parsing.
    ///
    /// Codes 10-19 are reserved for receipt validation errors.
    pub fn code(&self) -> u32 {
        match self {
            ReceiptError::StructurallyInvalid { .. } => 10,
        }
    }

    /// Short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            ReceiptError::StructurallyInvalid { .. } => "Invalid Receipt Data",
        }
    }

    /// Human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            ReceiptError::StructurallyInvalid { .. } => {
                "The data is not a recognizable receipt. Retake the photo or re-request the shared link."
            }
        }
    }
}
