//! Supported coins and their API chain paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A coin the hosted API serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoinSymbol {
    #[default]
    Btc,
    BtcTestnet,
    Ltc,
    Doge,
    Dash,
    Bcy,
}

impl CoinSymbol {
    pub const ALL: [CoinSymbol; 6] = [
        CoinSymbol::Btc,
        CoinSymbol::BtcTestnet,
        CoinSymbol::Ltc,
        CoinSymbol::Doge,
        CoinSymbol::Dash,
        CoinSymbol::Bcy,
    ];

    /// Symbol as used in URLs and forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinSymbol::Btc => "btc",
            CoinSymbol::BtcTestnet => "btc-testnet",
            CoinSymbol::Ltc => "ltc",
            CoinSymbol::Doge => "doge",
            CoinSymbol::Dash => "dash",
            CoinSymbol::Bcy => "bcy",
        }
    }

    /// `{coin}/{network}` segment of the API path.
    pub fn api_path(&self) -> &'static str {
        match self {
            CoinSymbol::Btc => "btc/main",
            CoinSymbol::BtcTestnet => "btc/test3",
            CoinSymbol::Ltc => "ltc/main",
            CoinSymbol::Doge => "doge/main",
            CoinSymbol::Dash => "dash/main",
            CoinSymbol::Bcy => "bcy/test",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CoinSymbol::Btc => "Bitcoin",
            CoinSymbol::BtcTestnet => "Bitcoin Testnet",
            CoinSymbol::Ltc => "Litecoin",
            CoinSymbol::Doge => "Dogecoin",
            CoinSymbol::Dash => "Dash",
            CoinSymbol::Bcy => "BlockCypher Testnet",
        }
    }

    /// Ticker shown next to amounts.
    pub fn currency_abbrev(&self) -> &'static str {
        match self {
            CoinSymbol::Btc => "BTC",
            CoinSymbol::BtcTestnet => "tBTC",
            CoinSymbol::Ltc => "LTC",
            CoinSymbol::Doge => "DOGE",
            CoinSymbol::Dash => "DASH",
            CoinSymbol::Bcy => "BCY",
        }
    }
}

impl fmt::Display for CoinSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for symbols the API does not serve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported coin symbol '{0}'")]
pub struct UnknownCoin(pub String);

impl FromStr for CoinSymbol {
    type Err = UnknownCoin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CoinSymbol::ALL
            .into_iter()
            .find(|coin| coin.as_str() == normalized)
            .ok_or_else(|| UnknownCoin(s.to_string()))
    }
}

impl TryFrom<String> for CoinSymbol {
    type Error = UnknownCoin;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoinSymbol> for String {
    fn from(coin: CoinSymbol) -> Self {
        coin.as_str().to_string()
    }
}
