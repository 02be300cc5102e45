//! Text sanitization for untrusted string fields.
//!
//! Receipt strings end up in rendered UI and in share links, so markup is
//! stripped outright rather than escaped: a receipt has no legitimate use
//! for tags, and removal keeps the result stable under repeated passes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length, in characters, of any sanitized text field.
pub const MAX_TEXT_LEN: usize = 255;

// Anything from '<' to the next '>' counts as a tag. A global pass is
// enough: any '<' that survives has no '>' after it, so a second pass
// finds nothing new.
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Sanitize one untrusted text field.
///
/// Applies, in order:
/// 1. Strip every `<...>` tag-shaped substring.
/// 2. Trim leading and trailing whitespace.
/// 3. Truncate to at most [`MAX_TEXT_LEN`] characters.
/// 4. Trim trailing whitespace exposed by the truncation.
///
/// The result is idempotent: `sanitize_text(sanitize_text(s))` equals
/// `sanitize_text(s)` for every `s`. Never fails; unusable input comes
/// out as an empty string, and callers substitute their field default.
pub fn sanitize_text(raw: &str) -> String {
    let stripped = RE_TAG.replace_all(raw, "");
    let trimmed = stripped.trim();
    if trimmed.chars().count() <= MAX_TEXT_LEN {
        return trimmed.to_string();
    }
    let truncated: String = trimmed.chars().take(MAX_TEXT_LEN).collect();
    truncated.trim_end().to_string()
}
