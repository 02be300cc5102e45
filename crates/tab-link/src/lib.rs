//! Share-link codec for tabsplit receipts.
//!
//! Receipts travel between parties as a compact token embedded in a URL
//! fragment; there is no server and no live channel. Encoding projects
//! the receipt to compact JSON and applies unpadded URL-safe base64.
//! Decoding reverses the transport and hands the payload to the
//! validator before anything trusts it, so a decoded receipt carries
//! the same guarantees as one fresh from analysis.
//!
//! All decode failures collapse to [`LinkError::Invalid`]. The caller
//! falls back to a fresh start regardless of which stage failed, and a
//! uniform error keeps parsing internals out of user-facing surfaces.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tab_link::{decode, encode, fragment_of, share_url};
//!
//! let receipt = tab_receipt::validate(&json!({
//!     "restaurantName": "Thai Palace",
//!     "items": [{"id": "a", "description": "Pad Thai", "price": 12.5}],
//!     "subtotal": 12.5, "tax": 1.0, "tip": 2.0, "total": 15.5
//! }))
//! .unwrap();
//!
//! let token = encode(&receipt).unwrap();
//! let url = share_url("https://tab.example/", &token);
//!
//! let pasted = fragment_of(&url).unwrap();
//! assert_eq!(decode(pasted).unwrap(), receipt);
//! ```

pub mod codec;
pub mod error;
pub mod fragment;

pub use codec::{decode, encode, ShareToken};
pub use error::{LinkError, Result};
pub use fragment::{fragment_of, share_url};
