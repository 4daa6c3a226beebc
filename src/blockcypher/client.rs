//! Hosted blockchain API client with timeout and error handling.
//!
//! # Responsibilities
//! - Fetch transaction details
//! - Broadcast and decode raw transactions
//! - Map API error documents and transport failures to `BlockCypherError`
//! - Record per-call metrics

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::blockcypher::coin::CoinSymbol;
use crate::blockcypher::types::{
    error_messages, BlockCypherConfig, BlockCypherError, BlockCypherResult, PushOutcome,
    TransactionDetails, TxHash,
};
use crate::observability::metrics;

/// Longest upstream body excerpt kept in an error message.
const MAX_ERROR_EXCERPT: usize = 200;

/// Client for the hosted blockchain-data API.
#[derive(Clone)]
pub struct BlockCypherClient {
    http: reqwest::Client,
    config: BlockCypherConfig,
}

impl BlockCypherClient {
    /// Create a new client. Every request is bounded by `timeout_secs`.
    pub fn new(config: BlockCypherConfig) -> BlockCypherResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tx-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            authenticated = config.api_key.is_some(),
            "Blockchain API client initialized"
        );

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockCypherConfig {
        &self.config
    }

    /// Public API URL of a transaction, shown to users.
    pub fn transaction_url(&self, coin: CoinSymbol, tx_hash: &TxHash) -> String {
        self.endpoint(coin, &format!("txs/{}", tx_hash))
    }

    /// Fetch a transaction with up to `limit` inputs and outputs.
    pub async fn get_transaction_details(
        &self,
        coin: CoinSymbol,
        tx_hash: &TxHash,
        limit: u32,
        include_hex: bool,
    ) -> BlockCypherResult<TransactionDetails> {
        let start = Instant::now();
        let url = self.transaction_url(coin, tx_hash);
        let mut query = vec![
            ("limit", limit.to_string()),
            ("includeHex", include_hex.to_string()),
        ];
        self.append_token(&mut query);

        let result = self.fetch_transaction(&url, &query).await;

        metrics::record_api_call("get_transaction_details", coin, &result, start);
        if let Err(e) = &result {
            tracing::debug!(coin = %coin, tx_hash = %tx_hash, error = %e, "Transaction lookup failed");
        }
        result
    }

    /// Broadcast a hex-encoded raw transaction.
    pub async fn push_tx(&self, coin: CoinSymbol, tx_hex: &str) -> BlockCypherResult<PushOutcome> {
        let start = Instant::now();
        let result = self.broadcast(coin, tx_hex).await;

        metrics::record_api_call("push_tx", coin, &result, start);
        match &result {
            Ok(PushOutcome::Broadcast { hash }) => {
                tracing::info!(coin = %coin, tx_hash = %hash, "Transaction broadcast");
            }
            Ok(PushOutcome::Rejected(errors)) => {
                tracing::info!(coin = %coin, error_count = errors.len(), "Transaction rejected by API");
            }
            Err(e) => tracing::warn!(coin = %coin, error = %e, "Broadcast request failed"),
        }
        result
    }

    /// Decode a hex-encoded raw transaction.
    ///
    /// The API's document is returned as-is, including error documents.
    pub async fn decode_tx(&self, coin: CoinSymbol, tx_hex: &str) -> BlockCypherResult<Value> {
        let start = Instant::now();
        let result = self
            .post_raw_tx(coin, "txs/decode", tx_hex)
            .await
            .map(|(_, body)| body);

        metrics::record_api_call("decode_tx", coin, &result, start);
        result
    }

    async fn fetch_transaction(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> BlockCypherResult<TransactionDetails> {
        let response = self.http.get(url).query(query).send().await?;
        let (status, body) = read_json(response).await?;

        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(if status == StatusCode::NOT_FOUND || status.is_success() {
                BlockCypherError::NotFound(message.to_string())
            } else {
                BlockCypherError::Upstream {
                    status: status.as_u16(),
                    message: message.to_string(),
                }
            });
        }
        if !status.is_success() {
            return Err(BlockCypherError::Upstream {
                status: status.as_u16(),
                message: excerpt(&body.to_string()),
            });
        }

        serde_json::from_value(body).map_err(|e| BlockCypherError::Decode(e.to_string()))
    }

    async fn broadcast(&self, coin: CoinSymbol, tx_hex: &str) -> BlockCypherResult<PushOutcome> {
        let (status, body) = self.post_raw_tx(coin, "txs/push", tx_hex).await?;
        if !status.is_success() && error_messages(&body).is_empty() {
            return Err(BlockCypherError::Upstream {
                status: status.as_u16(),
                message: excerpt(&body.to_string()),
            });
        }
        PushOutcome::from_response(&body)
    }

    async fn post_raw_tx(
        &self,
        coin: CoinSymbol,
        path: &str,
        tx_hex: &str,
    ) -> BlockCypherResult<(StatusCode, Value)> {
        let url = self.endpoint(coin, path);
        let mut query = Vec::new();
        self.append_token(&mut query);

        let response = self
            .http
            .post(&url)
            .query(&query)
            .json(&json!({ "tx": tx_hex }))
            .send()
            .await?;
        read_json(response).await
    }

    fn endpoint(&self, coin: CoinSymbol, path: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            coin.api_path(),
            path
        )
    }

    fn append_token(&self, query: &mut Vec<(&'static str, String)>) {
        if let Some(key) = &self.config.api_key {
            query.push(("token", key.clone()));
        }
    }
}

impl std::fmt::Debug for BlockCypherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockCypherClient")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .field("authenticated", &self.config.api_key.is_some())
            .finish()
    }
}

/// Read a response body as JSON, keeping the status for interpretation.
async fn read_json(response: reqwest::Response) -> BlockCypherResult<(StatusCode, Value)> {
    let status = response.status();
    let bytes = response.bytes().await?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(body) => Ok((status, body)),
        Err(_) if !status.is_success() => Err(BlockCypherError::Upstream {
            status: status.as_u16(),
            message: excerpt(&String::from_utf8_lossy(&bytes)),
        }),
        Err(e) => Err(BlockCypherError::Decode(e.to_string())),
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(MAX_ERROR_EXCERPT).collect()
}
