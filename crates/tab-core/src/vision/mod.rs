//! Vision boundary: turning a captured receipt photo into a trusted
//! [`Receipt`].
//!
//! The analyzer is an untrusted collaborator. Whatever it replies with
//! is parsed as plain JSON and pushed through [`tab_receipt::validate`];
//! nothing the model produces reaches the rest of the system without
//! passing that gate.

mod client;
mod image;

pub use client::{extraction_prompt, GeminiClient, VisionConfig, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
pub use image::{mime_for_path, ImagePayload, FALLBACK_MIME};

use tab_receipt::{Language, Receipt, ReceiptError};
use thiserror::Error;

/// Shorthand result type for vision operations.
pub type Result<T> = std::result::Result<T, VisionError>;

/// Failures between pressing the shutter and holding a validated receipt.
///
/// Every variant maps to the same user-facing outcome (the analysis did
/// not produce a usable receipt); the split exists for diagnostics and
/// retry heuristics, not for branching business logic.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Transport-level failure, including timeouts.
    #[error("vision request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("vision service returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The service answered 2xx but carried no analysis text.
    #[error("vision service returned no analysis text")]
    Empty,

    /// The analysis text is not JSON, even after unfencing.
    #[error("analysis reply is not receipt JSON: {reason}")]
    Unparsable { reason: String },

    /// The analysis parsed as JSON but failed receipt validation.
    #[error("analysis reply failed receipt validation: {0}")]
    InvalidReceipt(#[from] ReceiptError),

    /// The capture payload itself is unusable (malformed data URI).
    #[error("unusable capture payload: {reason}")]
    Image { reason: String },
}

impl VisionError {
    /// Stable numeric code for machine consumers.
    pub fn code(&self) -> u32 {
        match self {
            VisionError::Http(_) => 30,
            VisionError::Server { .. } => 31,
            VisionError::Empty => 32,
            VisionError::Unparsable { .. } => 33,
            VisionError::InvalidReceipt(_) => 34,
            VisionError::Image { .. } => 35,
        }
    }

    /// Short headline suitable for a UI banner.
    pub fn headline(&self) -> &'static str {
        match self {
            VisionError::Http(_) => "Vision Request Failed",
            VisionError::Server { .. } => "Vision Service Error",
            VisionError::Empty => "Empty Analysis",
            VisionError::Unparsable { .. } => "Malformed Analysis",
            VisionError::InvalidReceipt(_) => "Unusable Receipt From Analyzer",
            VisionError::Image { .. } => "Unusable Image",
        }
    }

    /// One-line suggested next step.
    pub fn remediation(&self) -> &'static str {
        match self {
            VisionError::Http(_) => "Check network connectivity and the API base URL, then retry.",
            VisionError::Server { .. } => {
                "Retry later; if the status persists, verify the API key and model name."
            }
            VisionError::Empty | VisionError::InvalidReceipt(_) => {
                "Retake the photo with the whole receipt in frame and retry."
            }
            VisionError::Unparsable { .. } => "Retry the analysis; replies occasionally degrade.",
            VisionError::Image { .. } => {
                "Provide a base64 data URI or a jpeg/png/webp/heic image file."
            }
        }
    }
}

/// The seam between capture and everything downstream.
///
/// The CLI talks to [`GeminiClient`]; tests and embedders substitute
/// their own implementation.
pub trait ReceiptAnalyzer {
    /// Extract a validated receipt from one captured image, translating
    /// item descriptions into `language`.
    fn analyze(&self, image: &ImagePayload, language: Language) -> Result<Receipt>;
}
