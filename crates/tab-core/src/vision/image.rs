//! Capture payloads: base64 image data plus its MIME type.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;

use super::{Result, VisionError};

/// MIME type assumed when the capture side does not say.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// One captured receipt image, ready for transmission.
///
/// `data` is always bare base64; the `data:<mime>;base64,` prefix the
/// capture collaborator sends is stripped at construction and never
/// travels upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    /// Parse a `data:<mime>;base64,<payload>` URI from the capture side.
    ///
    /// Non-base64 data URIs and undecodable payloads are rejected. An
    /// empty media type falls back to [`FALLBACK_MIME`].
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| VisionError::Image {
                reason: "missing data: scheme".into(),
            })?;
        let (meta, payload) = rest.split_once(',').ok_or_else(|| VisionError::Image {
            reason: "missing payload separator".into(),
        })?;
        let mime = meta.strip_suffix(";base64").ok_or_else(|| VisionError::Image {
            reason: "only base64 data URIs are supported".into(),
        })?;
        if payload.is_empty() || STANDARD.decode(payload).is_err() {
            return Err(VisionError::Image {
                reason: "payload is not valid base64".into(),
            });
        }

        Ok(ImagePayload {
            mime_type: if mime.is_empty() {
                FALLBACK_MIME.to_string()
            } else {
                mime.to_string()
            },
            data: payload.to_string(),
        })
    }

    /// Encode raw image bytes read from a file.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        ImagePayload {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Bare base64, prefix-free.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Guess an image MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => FALLBACK_MIME,
    }
}
