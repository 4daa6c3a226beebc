//! API payload types and error definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export BlockCypherConfig from config module to avoid duplication
pub use crate::config::schema::BlockCypherConfig;

/// Errors that can occur while talking to the hosted API.
#[derive(Debug, Error)]
pub enum BlockCypherError {
    /// The hash is not 64 hex characters.
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),

    /// The API answered with an `error` document (e.g. unknown transaction).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with a non-success status we cannot interpret.
    #[error("API returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Result type for API operations.
pub type BlockCypherResult<T> = Result<T, BlockCypherError>;

/// A validated transaction hash (64 hex characters, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub const LEN: usize = 64;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = BlockCypherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == Self::LEN && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(BlockCypherError::InvalidHash(s.to_string()))
        }
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn unconfirmed_height() -> i64 {
    -1
}

/// Transaction as returned by `GET /txs/{hash}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub hash: String,
    #[serde(default = "unconfirmed_height")]
    pub block_height: i64,
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Sum of output values in satoshis.
    pub total: u64,
    pub fees: u64,
    #[serde(default)]
    pub size: u64,
    pub received: DateTime<Utc>,
    #[serde(default)]
    pub confirmed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confirmations: u64,
    /// Probability in [0,1] that an unconfirmed transaction gets mined.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub double_spend: bool,
    #[serde(default)]
    pub receive_count: Option<u64>,
    #[serde(default)]
    pub relayed_by: Option<String>,
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    #[serde(default)]
    pub hex: Option<String>,
}

impl TransactionDetails {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed.is_some() && self.block_height >= 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxInput {
    /// Absent for coinbase inputs.
    #[serde(default)]
    pub prev_hash: Option<String>,
    #[serde(default)]
    pub output_index: i64,
    #[serde(default)]
    pub output_value: u64,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub script_type: Option<String>,
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: u64,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub script_type: Option<String>,
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
    #[serde(default)]
    pub spent_by: Option<String>,
    #[serde(default)]
    pub data_string: Option<String>,
}

/// Outcome of a broadcast attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The API accepted the transaction.
    Broadcast { hash: TxHash },
    /// The API refused it; one message per reported problem.
    Rejected(Vec<String>),
}

/// Collect `errors[].error` and a top-level `error` from an API document.
pub fn error_messages(body: &Value) -> Vec<String> {
    let mut messages: Vec<String> = body
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("error").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(error) = body.get("error").and_then(Value::as_str) {
        messages.push(error.to_string());
    }

    messages
}

impl PushOutcome {
    /// Interpret a `/txs/push` response document.
    pub fn from_response(body: &Value) -> BlockCypherResult<Self> {
        let errors = error_messages(body);
        if !errors.is_empty() {
            return Ok(PushOutcome::Rejected(errors));
        }

        let hash = body
            .pointer("/tx/hash")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockCypherError::Decode("push response carries no tx hash".to_string()))?;
        let hash = hash.parse::<TxHash>().map_err(|_| {
            BlockCypherError::Decode(format!("push response carries a malformed tx hash: {:?}", hash))
        })?;
        Ok(PushOutcome::Broadcast { hash })
    }
}
