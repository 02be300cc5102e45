//! Numeric coercion for untrusted receipt fields.
//!
//! Upstream analyzers emit prices and quantities as JSON numbers or as
//! strings ("12.50", " 3 "), and occasionally as garbage. These helpers
//! collapse all of that into a finite, non-negative `f64`, substituting
//! a field-appropriate default instead of failing.

use serde_json::Value;

/// Default applied to a money field whose value cannot be coerced.
pub const DEFAULT_MONEY: f64 = 0.0;

/// Default applied to a quantity field whose value cannot be coerced.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Coerce a JSON value into a finite `f64`, if possible.
///
/// Numbers pass through; strings are trimmed and parsed. Everything
/// else, along with NaN and the infinities, yields `None` so the caller
/// can substitute its default.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Sanitize a money field: missing or unusable becomes `0.0`, and
/// negatives clamp to `0.0`.
pub fn sanitize_money(value: Option<&Value>) -> f64 {
    clamp_non_negative(value.and_then(coerce_number).unwrap_or(DEFAULT_MONEY))
}

/// Sanitize a quantity field: missing or unusable becomes `1.0`, and
/// negatives clamp to `0.0`.
///
/// The defaults differ on purpose. A missing price must not invent
/// money, but a listed item with no count almost always means one.
pub fn sanitize_quantity(value: Option<&Value>) -> f64 {
    clamp_non_negative(value.and_then(coerce_number).unwrap_or(DEFAULT_QUANTITY))
}

// Not f64::max: the sign of max(-0.0, 0.0) is unspecified, and a
// negative zero would render as "-0.00".
fn clamp_non_negative(n: f64) -> f64 {
    if n > 0.0 {
        n
    } else {
        0.0
    }
}
