//! Proportional cost allocation for claimed receipt items.
//!
//! Given a receipt and one party's selections, [`allocate`] computes
//! that party's share of subtotal, tax, tip, and total. Tax and tip are
//! not itemized per line; they are spread in proportion to the party's
//! share of the subtotal. Most receipts apply a flat tax and tip rate
//! across the bill, so the proportional spread matches the exact
//! per-item computation in the common case and costs far less
//! bookkeeping in the rest.
//!
//! Everything here is pure: no I/O, no state, deterministic output for
//! a given receipt and selection map.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tab_receipt::{Selection, SelectionMap};
//! use tab_split::allocate;
//!
//! let receipt = tab_receipt::validate(&json!({
//!     "restaurantName": "Thai Palace",
//!     "items": [
//!         {"id": "a", "description": "Pad Thai", "price": 20},
//!         {"id": "b", "description": "Rolls", "price": 10}
//!     ],
//!     "subtotal": 30, "tax": 3, "tip": 6, "total": 39
//! }))
//! .unwrap();
//!
//! // Claim item "a", split two ways.
//! let mut selections = SelectionMap::new();
//! let mut claim = Selection::claimed();
//! claim.set_split_count(2);
//! selections.insert("a".into(), claim);
//!
//! let share = allocate(&receipt, &selections);
//! assert!((share.subtotal - 10.0).abs() < 1e-9);
//! assert!((share.total - 13.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tab_receipt::{Receipt, SelectionMap};

/// One party's computed share of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Sum of claimed item prices, each divided by its split count.
    pub subtotal: f64,

    /// Proportional share of the receipt's tax.
    pub tax: f64,

    /// Proportional share of the receipt's tip.
    pub tip: f64,

    /// `subtotal + tax + tip`.
    pub total: f64,
}

impl Allocation {
    /// The empty share: nothing claimed, nothing owed.
    pub const ZERO: Allocation = Allocation {
        subtotal: 0.0,
        tax: 0.0,
        tip: 0.0,
        total: 0.0,
    };
}

/// Sum of all item line prices.
///
/// Used as the allocation denominator when the receipt's extracted
/// subtotal is absent or zero.
pub fn items_total(receipt: &Receipt) -> f64 {
    receipt.items.iter().map(|item| item.price).sum()
}

/// Compute the claiming party's proportional share of the bill.
///
/// 1. The claimed subtotal sums `price / split_count` over selected
///    items. Selections pointing at ids the receipt no longer contains
///    contribute zero; the selection map may be stale after a re-decode
///    and must not be able to inflate or crash the result.
/// 2. The denominator is the receipt's subtotal when positive, else
///    [`items_total`]. Receipts with neither yield a zero ratio rather
///    than dividing by zero.
/// 3. Tax and tip scale by `claimed / denominator`; the total is the
///    sum of the three parts.
pub fn allocate(receipt: &Receipt, selections: &SelectionMap) -> Allocation {
    // Folded from +0.0 rather than `.sum()`: newer toolchains sum empty
    // float iterators to -0.0, and a negative zero would render as
    // "$-0.00" when nothing is claimed.
    let claimed_subtotal: f64 = selections
        .iter()
        .filter(|(_, selection)| selection.is_selected)
        .filter_map(|(item_id, selection)| {
            receipt
                .items
                .iter()
                .find(|item| &item.id == item_id)
                .map(|item| item.price / f64::from(selection.effective_split()))
        })
        .fold(0.0, |acc, share| acc + share);

    let receipt_subtotal = if receipt.subtotal > 0.0 {
        receipt.subtotal
    } else {
        items_total(receipt)
    };

    let ratio = if receipt_subtotal > 0.0 {
        claimed_subtotal / receipt_subtotal
    } else {
        0.0
    };

    let tax = receipt.tax * ratio;
    let tip = receipt.tip * ratio;

    Allocation {
        subtotal: claimed_subtotal,
        tax,
        tip,
        total: claimed_subtotal + tax + tip,
    }
}
