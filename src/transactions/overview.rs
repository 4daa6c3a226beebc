//! Transaction overview view model.
//!
//! Turns an API transaction document into everything the overview page
//! shows: display time, coinbase breakdown, confidence percentages.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::blockcypher::{CoinSymbol, TransactionDetails, TxHash, TxInput, TxOutput};
use crate::transactions::confidence;

/// Received and confirmed times closer than this are shown as received.
pub const DISPLAY_TIME_WINDOW_MINUTES: i64 = 20;

/// Request-scoped context for the transaction overview page.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionOverview {
    pub coin_symbol: CoinSymbol,
    pub tx_hash: TxHash,
    pub api_url: String,
    pub is_coinbase_tx: bool,
    pub coinbase_msg: Option<String>,
    pub received_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub time_to_use: DateTime<Utc>,
    pub total_satoshis: u64,
    pub total_satoshis_coinbase: Option<u64>,
    pub fee_in_satoshis: u64,
    /// Block reward portion of a coinbase; may be negative on odd chains.
    pub fee_in_satoshis_coinbase: Option<i64>,
    pub confidence_pct: Option<f64>,
    pub confidence_pct_scaled: Option<f64>,
    /// Browser-safe API token for live updates.
    pub public_key: Option<String>,
    pub transaction: TransactionDetails,
}

impl TransactionOverview {
    pub fn build(
        coin_symbol: CoinSymbol,
        tx_hash: TxHash,
        transaction: TransactionDetails,
        api_url: String,
        public_key: Option<String>,
    ) -> Self {
        let reported = confidence::reported(transaction.confidence);
        let confidence_pct = reported.map(confidence::confidence_pct);
        let confidence_pct_scaled = reported.map(|c| confidence::scale_confidence(Some(c)));

        let time_to_use = select_display_time(transaction.received, transaction.confirmed);

        let coinbase = transaction.inputs.first().filter(|input| is_coinbase_input(input));
        let (total_satoshis_coinbase, fee_in_satoshis_coinbase, coinbase_msg) = match coinbase {
            Some(input) => (
                Some(input.output_value),
                Some(transaction.total as i64 - input.output_value as i64),
                input.script.as_deref().and_then(decode_coinbase_message),
            ),
            None => (None, None, None),
        };

        Self {
            coin_symbol,
            tx_hash,
            api_url,
            is_coinbase_tx: coinbase.is_some(),
            coinbase_msg,
            received_at: transaction.received,
            confirmed_at: transaction.confirmed,
            time_to_use,
            total_satoshis: transaction.total,
            total_satoshis_coinbase,
            fee_in_satoshis: transaction.fees,
            fee_in_satoshis_coinbase,
            confidence_pct,
            confidence_pct_scaled,
            public_key,
            transaction,
        }
    }

    pub fn inputs(&self) -> &[TxInput] {
        &self.transaction.inputs
    }

    pub fn outputs(&self) -> &[TxOutput] {
        &self.transaction.outputs
    }

    /// Unconfirmed transactions get live confidence updates.
    pub fn should_poll(&self) -> bool {
        !self.transaction.is_confirmed()
    }
}

/// Pick the timestamp shown as "the" transaction time.
///
/// Nodes can see a transaction long before it is mined; when the gap is
/// small the first-seen time is more precise, otherwise the block time is.
pub fn select_display_time(
    received: DateTime<Utc>,
    confirmed: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    match confirmed {
        Some(confirmed) => {
            let gap_secs = (received - confirmed).num_seconds().abs();
            if gap_secs < DISPLAY_TIME_WINDOW_MINUTES * 60 {
                received
            } else {
                confirmed
            }
        }
        None => received,
    }
}

fn is_coinbase_input(input: &TxInput) -> bool {
    input.prev_hash.is_none()
}

/// Render a coinbase script as text, dropping control characters.
pub fn decode_coinbase_message(script: &str) -> Option<String> {
    let bytes = hex::decode(script).ok()?;
    let text: String = String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HASH: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    fn tx(value: serde_json::Value) -> TransactionDetails {
        serde_json::from_value(value).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn build(details: TransactionDetails) -> TransactionOverview {
        TransactionOverview::build(
            CoinSymbol::Btc,
            HASH.parse().unwrap(),
            details,
            "https://api.example/tx".to_string(),
            None,
        )
    }

    #[test]
    fn test_display_time_prefers_received_when_close() {
        let received = at("2015-01-01T00:00:00Z");
        let confirmed = at("2015-01-01T00:10:00Z");
        assert_eq!(select_display_time(received, Some(confirmed)), received);
    }

    #[test]
    fn test_display_time_uses_confirmed_when_far_apart() {
        let received = at("2015-01-01T00:00:00Z");
        let confirmed = at("2015-01-01T00:20:00Z");
        assert_eq!(select_display_time(received, Some(confirmed)), confirmed);

        // Received after confirmed happens when the API saw the block first
        let late_received = at("2015-01-03T00:00:00Z");
        assert_eq!(select_display_time(late_received, Some(received)), received);
    }

    #[test]
    fn test_display_time_unconfirmed() {
        let received = at("2015-01-01T00:00:00Z");
        assert_eq!(select_display_time(received, None), received);
    }

    #[test]
    fn test_coinbase_breakdown() {
        let overview = build(tx(json!({
            "hash": HASH,
            "total": 2_501_000_000u64,
            "fees": 0,
            "received": "2015-01-01T00:00:00Z",
            "confirmed": "2015-01-01T00:00:00Z",
            "block_height": 100,
            "inputs": [{
                "output_index": -1,
                "output_value": 2_500_000_000u64,
                "script": hex::encode("/Mined by test/\n")
            }],
            "outputs": [{"value": 2_501_000_000u64}]
        })));

        assert!(overview.is_coinbase_tx);
        assert_eq!(overview.total_satoshis_coinbase, Some(2_500_000_000));
        assert_eq!(overview.fee_in_satoshis_coinbase, Some(1_000_000));
        assert_eq!(overview.coinbase_msg.as_deref(), Some("/Mined by test/"));
        assert!(!overview.should_poll());
    }

    #[test]
    fn test_regular_transaction_with_confidence() {
        let overview = build(tx(json!({
            "hash": HASH,
            "total": 1000,
            "fees": 10,
            "received": "2015-01-01T00:00:00Z",
            "confidence": 0.5,
            "inputs": [{"prev_hash": HASH, "output_index": 0, "output_value": 1010}],
            "outputs": [{"value": 1000}]
        })));

        assert!(!overview.is_coinbase_tx);
        assert!(overview.coinbase_msg.is_none());
        assert_eq!(overview.confidence_pct, Some(50.0));
        let scaled = overview.confidence_pct_scaled.unwrap();
        assert!((scaled - 0.09765625).abs() < 1e-9);
        assert!(overview.should_poll());
        assert_eq!(overview.inputs().len(), 1);
        assert_eq!(overview.outputs().len(), 1);
    }

    #[test]
    fn test_zero_confidence_has_no_percentages() {
        let overview = build(tx(json!({
            "hash": HASH,
            "total": 1,
            "fees": 0,
            "received": "2015-01-01T00:00:00Z",
            "confidence": 0.0,
            "inputs": [],
            "outputs": []
        })));

        assert!(overview.confidence_pct.is_none());
        assert!(overview.confidence_pct_scaled.is_none());
        assert!(!overview.is_coinbase_tx);
    }

    #[test]
    fn test_coinbase_message_with_invalid_hex() {
        assert_eq!(decode_coinbase_message("zz"), None);
        assert_eq!(decode_coinbase_message("48690a").as_deref(), Some("Hi"));
    }
}
