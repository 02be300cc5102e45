//! Receipt data model and integrity validation for tabsplit.
//!
//! This crate owns the trust boundary of the whole system: every piece
//! of structured receipt data, whether it came from the vision analyzer
//! or out of a shared link, passes through [`validate`] before anything
//! else touches it. A [`Receipt`] in hand means every string has been
//! sanitized and bounded and every number is finite and non-negative.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tab_receipt::validate;
//!
//! let raw = json!({
//!     "restaurantName": "<b>Thai Palace</b>",
//!     "items": [
//!         {"description": "Pad Thai", "price": "12.50"}
//!     ],
//!     "subtotal": 12.5, "tax": 1.0, "tip": 2.0, "total": 15.5
//! });
//!
//! let receipt = validate(&raw).unwrap();
//! assert_eq!(receipt.restaurant_name, "Thai Palace");
//! assert_eq!(receipt.items[0].price, 12.5);
//! ```

pub mod error;
pub mod language;
pub mod model;
pub mod validate;

pub use error::{ReceiptError, Result};
pub use language::Language;
pub use model::{Receipt, ReceiptItem, Selection, SelectionMap};
pub use validate::{validate, DEFAULT_CURRENCY, UNKNOWN_ITEM};
