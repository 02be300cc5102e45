//! Core data model: receipts, line items, and claim selections.
//!
//! `Receipt` and `ReceiptItem` are the trusted in-memory forms produced
//! by the validator; they serialize with camelCase keys because the same
//! shape travels to and from the vision service and inside share links.
//! `Selection` is purely local state and is never transmitted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One extracted line item of a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    /// Unique within the receipt, stable across edits.
    pub id: String,

    /// Item count. Informational; `price` is already the full line price.
    pub quantity: f64,

    /// Sanitized display text, at most 255 characters.
    pub description: String,

    /// Total line price, not unit price. Finite and non-negative.
    pub price: f64,

    /// Pre-translation text, when the analyzer translated the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_description: Option<String>,
}

/// A validated, trusted bill.
///
/// Instances come from [`crate::validate`] only; every string has been
/// sanitized and every number is finite and non-negative. The stored
/// totals are independent fields: receipts legitimately carry rounding,
/// discounts, and service charges, so nothing here is required to
/// reconcile with the item sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub restaurant_name: String,

    /// Free-form date text as printed on the receipt.
    pub date: String,

    /// Currency symbol or code, defaulting to "$".
    pub currency: String,

    /// Line items in display order. Order is preserved through
    /// serialization and share links.
    pub items: Vec<ReceiptItem>,

    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
    pub total: f64,
}

/// One party's claim state for a single item.
///
/// Local state only. A selection referencing an id that is missing from
/// the receipt is tolerated and contributes nothing to allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Whether the current party claims this item.
    pub is_selected: bool,

    /// How many claimants the item's price is divided among. Values
    /// below 1 are treated as 1 wherever the count is used.
    pub split_count: u32,
}

impl Selection {
    /// A fresh claim on an item: selected, not split.
    pub fn claimed() -> Self {
        Selection {
            is_selected: true,
            split_count: 1,
        }
    }

    /// Flip whether the item is claimed, keeping the split count.
    pub fn toggle(&mut self) {
        self.is_selected = !self.is_selected;
    }

    /// Set the split count, clamping to at least 1.
    pub fn set_split_count(&mut self, count: u32) {
        self.split_count = count.max(1);
    }

    /// The split count with the >= 1 clamp applied.
    pub fn effective_split(&self) -> u32 {
        self.split_count.max(1)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            is_selected: false,
            split_count: 1,
        }
    }
}

/// Claim state over a whole receipt, keyed by item id.
///
/// A `BTreeMap` keeps iteration order deterministic, which keeps
/// allocation output and rendered summaries stable between runs.
pub type SelectionMap = BTreeMap<String, Selection>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_claimed_defaults() {
        let sel = Selection::claimed();
        assert!(sel.is_selected);
        assert_eq!(sel.split_count, 1);
    }

    #[test]
    fn test_selection_split_clamps_to_one() {
        let mut sel = Selection::claimed();
        sel.set_split_count(0);
        assert_eq!(sel.split_count, 1);
        sel.set_split_count(4);
        assert_eq!(sel.split_count, 4);
    }

    #[test]
    fn test_effective_split_guards_raw_zero() {
        // Fields are public, so a zero can be written directly. The
        // accessor still reports 1.
        let sel = Selection {
            is_selected: true,
            split_count: 0,
        };
        assert_eq!(sel.effective_split(), 1);
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = ReceiptItem {
            id: "a".into(),
            quantity: 1.0,
            description: "Pad Thai".into(),
            price: 12.5,
            original_description: Some("ผัดไทย".into()),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("originalDescription").is_some());
        assert!(json.get("original_description").is_none());
    }

    #[test]
    fn test_item_omits_absent_original_description() {
        let item = ReceiptItem {
            id: "a".into(),
            quantity: 1.0,
            description: "Pad Thai".into(),
            price: 12.5,
            original_description: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("originalDescription"));
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = Receipt {
            restaurant_name: "Thai Palace".into(),
            date: "2024-06-01".into(),
            currency: "$".into(),
            items: vec![],
            subtotal: 0.0,
            tax: 0.0,
            tip: 0.0,
            total: 0.0,
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("restaurantName").is_some());
    }
}
