//! Path builders for the explorer's routes.

use crate::blockcypher::CoinSymbol;

pub fn home_path() -> &'static str {
    "/"
}

pub fn coin_overview_path(coin: CoinSymbol) -> String {
    format!("/{}/", coin)
}

pub fn transaction_path(coin: CoinSymbol, tx_hash: &str) -> String {
    format!("/{}/tx/{}/", coin, tx_hash)
}

pub fn poll_confidence_path(coin: CoinSymbol, tx_hash: &str) -> String {
    format!("/{}/tx-confidence/{}/", coin, tx_hash)
}

pub fn push_tx_path(coin: CoinSymbol) -> String {
    format!("/{}/pushtx/", coin)
}

pub fn decode_tx_path(coin: CoinSymbol) -> String {
    format!("/{}/decodetx/", coin)
}
