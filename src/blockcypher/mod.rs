//! Hosted blockchain API integration subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration + environment (base URL, API token)
//!     → coin.rs (symbol → chain path)
//!     → client.rs (HTTP calls with timeouts)
//!     → types.rs (typed responses, error mapping)
//! ```
//!
//! # Security Constraints
//! - The secret API token is never logged or rendered
//! - All API calls have configurable timeouts
//! - API failures surface as user-facing messages, never panics

pub mod client;
pub mod coin;
pub mod types;

pub use client::BlockCypherClient;
pub use coin::{CoinSymbol, UnknownCoin};
pub use types::{
    BlockCypherConfig, BlockCypherError, BlockCypherResult, PushOutcome, TransactionDetails,
    TxHash, TxInput, TxOutput,
};
