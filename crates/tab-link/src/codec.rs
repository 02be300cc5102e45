//! Receipt-to-token encoding and the reverse, validating decode.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use tab_receipt::{validate, Receipt};
use tracing::debug;

use crate::error::{LinkError, Result};

/// A receipt encoded for transport in a URL fragment.
///
/// Unpadded URL-safe base64 over the receipt's compact JSON form. The
/// token carries no secrets and no signature: the link is a convenience
/// transport, not a security boundary. Whatever comes back out of a
/// token is re-validated before anything trusts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareToken(String);

impl ShareToken {
    /// The token text, safe to place in a URL fragment verbatim.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, yielding the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ShareToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode a validated receipt into a share token.
///
/// The receipt's serialized form is already the minimal projection:
/// selections are local-only state and absent optional fields are
/// omitted, so nothing transient leaks into the token.
pub fn encode(receipt: &Receipt) -> Result<ShareToken> {
    let json = serde_json::to_string(receipt)?;
    let token = ShareToken(URL_SAFE_NO_PAD.encode(json.as_bytes()));
    debug!(bytes = json.len(), token_len = token.as_str().len(), "receipt encoded");
    Ok(token)
}

/// Decode a share token back into a trusted receipt.
///
/// Reverses the transport encoding, parses the JSON payload, and runs
/// the result through [`tab_receipt::validate`] unconditionally. Every
/// failure collapses to [`LinkError::Invalid`]; the failing stage is
/// visible only in debug logs.
pub fn decode(token: &str) -> Result<Receipt> {
    let token = token.trim();
    if token.is_empty() {
        debug!("share token is empty");
        return Err(LinkError::Invalid);
    }

    let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|err| {
        debug!(%err, "share token failed transport decoding");
        LinkError::Invalid
    })?;

    let raw: Value = serde_json::from_slice(&bytes).map_err(|err| {
        debug!(%err, "share token payload is not JSON");
        LinkError::Invalid
    })?;

    validate(&raw).map_err(|err| {
        debug!(%err, "share token payload failed validation");
        LinkError::Invalid
    })
}
