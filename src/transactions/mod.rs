//! Transaction presentation logic.
//!
//! # Data Flow
//! ```text
//! API transaction document
//!     → overview.rs (display time, coinbase breakdown)
//!     → confidence.rs (percentages, scaled bar width)
//!     → http::pages (HTML)
//!
//! Submitted raw transaction
//!     → form.rs (validate hex + coin)
//!     → blockcypher::client (push / decode)
//! ```

pub mod confidence;
pub mod form;
pub mod overview;

pub use confidence::{scale_confidence, ConfidencePoll};
pub use form::{RawTxForm, RawTxInput, ValidRawTx};
pub use overview::TransactionOverview;
