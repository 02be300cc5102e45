//! Command output rendering.
//!
//! stdout carries exactly one payload per invocation, in the format the
//! caller asked for; everything else goes to stderr as logs. JSON
//! payloads ride in a small envelope (schema version, run id, timestamp)
//! so automation can correlate output with logs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;
use tab_receipt::{Receipt, ReceiptItem, SelectionMap};
use tab_split::Allocation;

/// Envelope schema identifier for JSON output.
pub const SCHEMA_VERSION: &str = "tabsplit/v1";

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default for machine consumption)
    #[default]
    Json,

    /// Human-readable Markdown
    Md,

    /// One-line summary for quick checks and shell pipelines
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Md => write!(f, "md"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Wrap a command payload in the standard JSON envelope.
pub fn wrap(run_id: &str, key: &str, payload: Value) -> Value {
    let mut map = serde_json::Map::new();
    map.insert("schemaVersion".into(), SCHEMA_VERSION.into());
    map.insert("runId".into(), run_id.into());
    map.insert(
        "generatedAt".into(),
        chrono::Utc::now().to_rfc3339().into(),
    );
    map.insert(key.into(), payload);
    Value::Object(map)
}

/// Format an amount with its currency marker, two decimals.
pub fn money(currency: &str, amount: f64) -> String {
    format!("{}{:.2}", currency, amount)
}

/// Per-item shares for the currently claimed items.
///
/// Selections pointing at ids missing from the receipt are dropped, the
/// same way the allocation engine ignores them.
pub fn claimed_shares<'a>(
    receipt: &'a Receipt,
    selections: &SelectionMap,
) -> Vec<(&'a ReceiptItem, u32, f64)> {
    selections
        .iter()
        .filter(|(_, selection)| selection.is_selected)
        .filter_map(|(id, selection)| {
            receipt
                .items
                .iter()
                .find(|item| item.id == *id)
                .map(|item| {
                    let split = selection.effective_split();
                    (item, split, item.price / f64::from(split))
                })
        })
        .collect()
}

pub fn render_receipt_md(receipt: &Receipt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", receipt.restaurant_name);
    if !receipt.date.is_empty() {
        let _ = writeln!(out, "{}", receipt.date);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<14} {:>5} {:>12}  ITEM", "ID", "QTY", "PRICE");
    for item in &receipt.items {
        let _ = writeln!(
            out,
            "{:<14} {:>5} {:>12}  {}",
            item.id,
            item.quantity,
            money(&receipt.currency, item.price),
            item.description
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Subtotal: {}", money(&receipt.currency, receipt.subtotal));
    let _ = writeln!(out, "Tax:      {}", money(&receipt.currency, receipt.tax));
    let _ = writeln!(out, "Tip:      {}", money(&receipt.currency, receipt.tip));
    let _ = writeln!(out, "Total:    {}", money(&receipt.currency, receipt.total));
    out
}

pub fn render_receipt_summary(receipt: &Receipt) -> String {
    format!(
        "{}: {} items, total {}",
        receipt.restaurant_name,
        receipt.items.len(),
        money(&receipt.currency, receipt.total)
    )
}

pub fn render_allocation_md(
    receipt: &Receipt,
    selections: &SelectionMap,
    share: &Allocation,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Your Share of {}", receipt.restaurant_name);
    let _ = writeln!(out);
    let claimed = claimed_shares(receipt, selections);
    if claimed.is_empty() {
        let _ = writeln!(out, "No items claimed.");
    } else {
        let _ = writeln!(out, "{:<14} {:>6} {:>12}  ITEM", "ID", "SPLIT", "SHARE");
        for (item, split, amount) in claimed {
            let _ = writeln!(
                out,
                "{:<14} {:>6} {:>12}  {}",
                item.id,
                split,
                money(&receipt.currency, amount),
                item.description
            );
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Subtotal: {}", money(&receipt.currency, share.subtotal));
    let _ = writeln!(out, "Tax:      {}", money(&receipt.currency, share.tax));
    let _ = writeln!(out, "Tip:      {}", money(&receipt.currency, share.tip));
    let _ = writeln!(out, "Total:    {}", money(&receipt.currency, share.total));
    out
}

pub fn render_allocation_summary(receipt: &Receipt, share: &Allocation) -> String {
    format!(
        "your share: {} (subtotal {} + tax {} + tip {})",
        money(&receipt.currency, share.total),
        money(&receipt.currency, share.subtotal),
        money(&receipt.currency, share.tax),
        money(&receipt.currency, share.tip)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tab_receipt::Selection;

    fn receipt() -> Receipt {
        Receipt {
            restaurant_name: "Bill Cafe".into(),
            date: "2024-06-01".into(),
            currency: "$".into(),
            items: vec![
                ReceiptItem {
                    id: "a".into(),
                    quantity: 1.0,
                    description: "Steak".into(),
                    price: 20.0,
                    original_description: None,
                },
                ReceiptItem {
                    id: "b".into(),
                    quantity: 2.0,
                    description: "Soup".into(),
                    price: 10.0,
                    original_description: None,
                },
            ],
            subtotal: 30.0,
            tax: 3.0,
            tip: 6.0,
            total: 39.0,
        }
    }

    #[test]
    fn test_money_two_decimals() {
        assert_eq!(money("$", 13.0), "$13.00");
        assert_eq!(money("€", 0.5), "€0.50");
        assert_eq!(money("$", 19.999), "$20.00");
    }

    #[test]
    fn test_wrap_envelope_shape() {
        let wrapped = wrap("run-abc", "receipt", serde_json::json!({"x": 1}));
        assert_eq!(wrapped["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(wrapped["runId"], "run-abc");
        assert!(wrapped["generatedAt"].is_string());
        assert_eq!(wrapped["receipt"]["x"], 1);
    }

    #[test]
    fn test_receipt_md_lists_items_and_totals() {
        let md = render_receipt_md(&receipt());
        assert!(md.starts_with("# Bill Cafe"));
        assert!(md.contains("Steak"));
        assert!(md.contains("$20.00"));
        assert!(md.contains("Total:    $39.00"));
    }

    #[test]
    fn test_receipt_summary_is_one_line() {
        let line = render_receipt_summary(&receipt());
        assert_eq!(line, "Bill Cafe: 2 items, total $39.00");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_claimed_shares_divides_and_drops_stale() {
        let mut selections = SelectionMap::new();
        let mut half = Selection::claimed();
        half.set_split_count(2);
        selections.insert("a".into(), half);
        selections.insert("ghost".into(), Selection::claimed());
        let mut off = Selection::claimed();
        off.toggle();
        selections.insert("b".into(), off);

        let receipt = receipt();
        let shares = claimed_shares(&receipt, &selections);
        assert_eq!(shares.len(), 1);
        let (item, split, amount) = shares[0];
        assert_eq!(item.id, "a");
        assert_eq!(split, 2);
        assert!((amount - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_md_shows_breakdown() {
        let mut selections = SelectionMap::new();
        let mut sel = Selection::claimed();
        sel.set_split_count(2);
        selections.insert("a".into(), sel);
        let share = tab_split::allocate(&receipt(), &selections);

        let md = render_allocation_md(&receipt(), &selections, &share);
        assert!(md.contains("Your Share of Bill Cafe"));
        assert!(md.contains("$10.00"));
        assert!(md.contains("Total:    $13.00"));
    }

    #[test]
    fn test_allocation_md_with_nothing_claimed() {
        let selections = SelectionMap::new();
        let share = tab_split::allocate(&receipt(), &selections);
        let md = render_allocation_md(&receipt(), &selections, &share);
        assert!(md.contains("No items claimed."));
        assert!(md.contains("Total:    $0.00"));
    }

    #[test]
    fn test_allocation_summary_line() {
        let mut selections = SelectionMap::new();
        let mut sel = Selection::claimed();
        sel.set_split_count(2);
        selections.insert("a".into(), sel);
        let share = tab_split::allocate(&receipt(), &selections);
        assert_eq!(
            render_allocation_summary(&receipt(), &share),
            "your share: $13.00 (subtotal $10.00 + tax $1.00 + tip $2.00)"
        );
    }
}
