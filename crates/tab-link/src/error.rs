//! Error types for share-link encoding and decoding.

use thiserror::Error;

/// Result type alias for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur while encoding or decoding a share link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The token failed transport decoding, JSON parsing, or receipt
    /// validation. Deliberately uniform: callers must not learn which
    /// stage failed, they fall back to a fresh start either way. The
    /// stage is logged at debug level for diagnosis.
    #[error("the shared link is invalid or has been tampered with")]
    Invalid,

    /// The receipt could not be serialized for transport. Not reachable
    /// for receipts produced by the validator; kept so encoding never
    /// panics.
    #[error("failed to encode receipt for sharing: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl LinkError {
    /// Stable error code for machine parsing.
    ///
    /// Codes 20-29 are reserved for share-link errors.
    pub fn code(&self) -> u32 {
        match self {
            LinkError::Invalid => 20,
            LinkError::Serialize(_) => 21,
        }
    }

    /// Short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            LinkError::Invalid => "Invalid Share Link",
            LinkError::Serialize(_) => "Share Link Encoding Failed",
        }
    }

    /// Human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            LinkError::Invalid => {
                "Ask the sender to copy the link again. Partial pastes and edited links cannot be recovered."
            }
            LinkError::Serialize(_) => "This is an internal error. Re-run the analysis to rebuild the receipt.",
        }
    }
}
