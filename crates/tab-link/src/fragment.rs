//! URL fragment handling for share links.
//!
//! The token always travels in the fragment (after `#`), never in the
//! query or path: fragments are not sent to servers, so the receipt
//! stays strictly between the two parties.

use crate::codec::ShareToken;

/// Extract the share token from pasted input.
///
/// Accepts a full URL, a bare `#token`, or a naked token: the content
/// after the first `#` when one is present, otherwise the whole trimmed
/// input. Returns `None` when nothing remains, so an empty paste never
/// reaches the decoder.
pub fn fragment_of(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    let fragment = match trimmed.split_once('#') {
        Some((_, fragment)) => fragment,
        None => trimmed,
    };
    (!fragment.is_empty()).then_some(fragment)
}

/// Build a shareable URL carrying the token in the fragment.
pub fn share_url(base: &str, token: &ShareToken) -> String {
    format!("{}#{}", base.trim_end_matches('#'), token)
}
