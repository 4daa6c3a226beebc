//! Raw transaction form: hex payload plus coin symbol.

use serde::{Deserialize, Serialize};

use crate::blockcypher::CoinSymbol;

/// Raw submitted fields; missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTxInput {
    #[serde(default)]
    pub tx_hex: String,
    #[serde(default)]
    pub coin_symbol: String,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub tx_hex: Vec<String>,
    pub coin_symbol: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.tx_hex.is_empty() && self.coin_symbol.is_empty()
    }
}

/// Form state as rendered: current values and any errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawTxForm {
    pub tx_hex: String,
    pub coin_symbol: String,
    pub errors: FormErrors,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRawTx {
    pub tx_hex: String,
    pub coin_symbol: CoinSymbol,
}

impl ValidRawTx {
    /// Form pre-filled with the accepted values, for re-rendering.
    pub fn to_form(&self) -> RawTxForm {
        RawTxForm {
            tx_hex: self.tx_hex.clone(),
            coin_symbol: self.coin_symbol.to_string(),
            errors: FormErrors::default(),
        }
    }
}

impl RawTxForm {
    /// Unbound form for a GET, optionally pre-seeded with a hex payload.
    pub fn initial(coin_symbol: CoinSymbol, tx_hex: Option<String>) -> Self {
        Self {
            tx_hex: tx_hex.unwrap_or_default(),
            coin_symbol: coin_symbol.to_string(),
            errors: FormErrors::default(),
        }
    }

    /// Validate submitted data. On failure the returned form carries the
    /// submitted values and the errors to show.
    pub fn bind(input: RawTxInput) -> Result<ValidRawTx, RawTxForm> {
        let mut errors = FormErrors::default();

        let tx_hex = input.tx_hex.trim().to_string();
        if tx_hex.is_empty() {
            errors.tx_hex.push("This field is required.".to_string());
        } else if let Err(e) = hex::decode(&tx_hex) {
            errors.tx_hex.push(format!("Invalid hex-encoded transaction: {}", e));
        }

        let coin_symbol = match input.coin_symbol.trim() {
            "" => {
                errors.coin_symbol.push("This field is required.".to_string());
                None
            }
            raw => match raw.parse::<CoinSymbol>() {
                Ok(coin) => Some(coin),
                Err(e) => {
                    errors.coin_symbol.push(format!("Select a valid choice: {}", e));
                    None
                }
            },
        };

        match coin_symbol {
            Some(coin_symbol) if errors.is_empty() => Ok(ValidRawTx { tx_hex, coin_symbol }),
            _ => Err(RawTxForm {
                tx_hex,
                coin_symbol: input.coin_symbol,
                errors,
            }),
        }
    }
}
