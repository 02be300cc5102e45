//! Integrity validation of untrusted receipt data.
//!
//! Both ingestion paths funnel through [`validate`]: JSON returned by
//! the vision analyzer and payloads decoded from share links. Nothing
//! outside this module constructs a [`Receipt`] from raw input.
//!
//! The posture is repair-over-reject. Analyzer output is frequently
//! partial or garbled, and a false rejection costs the user a retake,
//! so only the structural prerequisites can fail validation. Every
//! other irregularity is normalized to a bounded default.

use serde_json::Value;
use tab_sanitize::{sanitize_money, sanitize_quantity, sanitize_text};

use crate::error::{ReceiptError, Result};
use crate::model::{Receipt, ReceiptItem};

/// Description used when an item has none worth showing.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Currency used when the receipt declares none.
pub const DEFAULT_CURRENCY: &str = "$";

/// Validate untrusted structured data into a trusted [`Receipt`].
///
/// Rejects with [`ReceiptError::StructurallyInvalid`] only when the
/// input is not an object, `restaurantName` is not a string, or `items`
/// is not an array. Everything else is sanitized: strings are stripped
/// of markup and bounded, numbers are coerced to finite non-negative
/// values with field defaults, and items missing an id get a synthetic
/// `shared-<index>` id that stays stable across re-encodes.
///
/// Totals are deliberately not reconciled against the item sum.
/// Receipts carry discounts, service charges, and rounding, so a
/// mismatch is normal and rejecting on it would refuse real bills.
pub fn validate(raw: &Value) -> Result<Receipt> {
    let obj = raw
        .as_object()
        .ok_or_else(|| structurally_invalid("not a JSON object"))?;

    let restaurant_name = obj
        .get("restaurantName")
        .and_then(Value::as_str)
        .ok_or_else(|| structurally_invalid("restaurantName is missing or not a string"))?;

    let raw_items = obj
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| structurally_invalid("items is missing or not an array"))?;

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, raw_item)| validate_item(raw_item, index))
        .collect();

    Ok(Receipt {
        restaurant_name: sanitize_text(restaurant_name),
        date: sanitize_text(string_field(obj, "date")),
        currency: non_empty_or(sanitize_text(string_field(obj, "currency")), DEFAULT_CURRENCY),
        items,
        subtotal: sanitize_money(obj.get("subtotal")),
        tax: sanitize_money(obj.get("tax")),
        tip: sanitize_money(obj.get("tip")),
        total: sanitize_money(obj.get("total")),
    })
}

/// Normalize one raw item. Never fails: a non-object element degrades
/// to an all-defaults item rather than failing the document.
fn validate_item(raw: &Value, index: usize) -> ReceiptItem {
    let obj = raw.as_object();

    let id = obj
        .and_then(|o| o.get("id"))
        .and_then(Value::as_str)
        .map(sanitize_text)
        .unwrap_or_default();
    let id = if id.is_empty() {
        format!("shared-{index}")
    } else {
        id
    };

    let description = obj
        .and_then(|o| o.get("description"))
        .and_then(Value::as_str)
        .map(sanitize_text)
        .unwrap_or_default();

    let original_description = obj
        .and_then(|o| o.get("originalDescription"))
        .and_then(Value::as_str)
        .map(sanitize_text)
        .filter(|s| !s.is_empty());

    ReceiptItem {
        id,
        quantity: sanitize_quantity(obj.and_then(|o| o.get("quantity"))),
        description: non_empty_or(description, UNKNOWN_ITEM),
        price: sanitize_money(obj.and_then(|o| o.get("price"))),
        original_description,
    }
}

fn string_field<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn structurally_invalid(reason: &str) -> ReceiptError {
    ReceiptError::StructurallyInvalid {
        reason: reason.to_string(),
    }
}
