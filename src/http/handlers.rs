//! Route handlers.
//!
//! Handlers only shape requests and responses: every blockchain answer
//! comes from the hosted API client in `AppState`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockcypher::{BlockCypherError, CoinSymbol, PushOutcome, TxHash};
use crate::http::flash::Flash;
use crate::http::pages;
use crate::http::request::RequestId;
use crate::http::response::WebError;
use crate::http::server::AppState;
use crate::http::urls;
use crate::transactions::{ConfidencePoll, RawTxForm, RawTxInput, TransactionOverview};

/// Inputs and outputs fetched when polling; only the header matters.
const POLL_INPUT_LIMIT: u32 = 1;

/// `?t=<hex>` pre-seeds the raw transaction forms.
#[derive(Debug, Default, Deserialize)]
pub struct PreseedQuery {
    pub t: Option<String>,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

fn not_found_page(flash: Flash) -> Response {
    flash.render(StatusCode::NOT_FOUND, pages::not_found)
}

pub async fn home(flash: Flash) -> Response {
    flash.render(StatusCode::OK, pages::home)
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn not_found(flash: Flash) -> Response {
    not_found_page(flash)
}

pub async fn coin_overview(Path(coin_symbol): Path<String>, flash: Flash) -> Response {
    match coin_symbol.parse::<CoinSymbol>() {
        Ok(coin) => flash.render(StatusCode::OK, |messages| pages::coin_overview(coin, messages)),
        Err(_) => not_found_page(flash),
    }
}

pub async fn transaction_overview(
    State(state): State<AppState>,
    Path((coin_symbol, tx_hash)): Path<(String, String)>,
    request_id: RequestId,
    mut flash: Flash,
) -> Response {
    let Ok(coin) = coin_symbol.parse::<CoinSymbol>() else {
        return not_found_page(flash);
    };

    let hash = match tx_hash.parse::<TxHash>() {
        Ok(hash) => hash,
        Err(_) => {
            flash.warning("Invalid Transaction Hash");
            return flash.redirect(&urls::coin_overview_path(coin));
        }
    };

    let limit = state.config.blockcypher.overview_input_limit;
    match state.client.get_transaction_details(coin, &hash, limit, true).await {
        Ok(details) => {
            let overview = TransactionOverview::build(
                coin,
                hash.clone(),
                details,
                state.client.transaction_url(coin, &hash),
                state.config.blockcypher.public_key.clone(),
            );
            flash.render(StatusCode::OK, |messages| {
                pages::transaction_overview(&overview, messages)
            })
        }
        Err(BlockCypherError::NotFound(_)) => {
            flash.warning(format!("No transaction found with the hash {}", hash));
            flash.redirect(urls::home_path())
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                coin = %coin,
                tx_hash = %hash,
                error = %e,
                "Transaction lookup failed"
            );
            flash.warning("The blockchain API is unavailable right now. Please try again shortly.");
            flash.redirect(&urls::coin_overview_path(coin))
        }
    }
}

pub async fn poll_confidence(
    State(state): State<AppState>,
    Path((coin_symbol, tx_hash)): Path<(String, String)>,
) -> Result<Json<ConfidencePoll>, WebError> {
    let coin = coin_symbol
        .parse::<CoinSymbol>()
        .map_err(|e| WebError::UnknownCoin(e.to_string()))?;
    let hash = tx_hash.parse::<TxHash>()?;

    let details = state
        .client
        .get_transaction_details(coin, &hash, POLL_INPUT_LIMIT, false)
        .await?;

    Ok(Json(ConfidencePoll::from_details(&details)))
}

pub async fn pushtx_forwarding() -> Redirect {
    Redirect::to(&urls::push_tx_path(CoinSymbol::default()))
}

pub async fn decodetx_forwarding() -> Redirect {
    Redirect::to(&urls::decode_tx_path(CoinSymbol::default()))
}

pub async fn push_tx_form(
    Path(coin_symbol): Path<String>,
    Query(query): Query<PreseedQuery>,
    flash: Flash,
) -> Response {
    let Ok(coin) = coin_symbol.parse::<CoinSymbol>() else {
        return not_found_page(flash);
    };
    let form = RawTxForm::initial(coin, query.t);
    flash.render(StatusCode::OK, |messages| pages::push_tx(coin, &form, messages))
}

pub async fn push_tx_submit(
    State(state): State<AppState>,
    Path(coin_symbol): Path<String>,
    request_id: RequestId,
    mut flash: Flash,
    Form(input): Form<RawTxInput>,
) -> Response {
    let Ok(coin) = coin_symbol.parse::<CoinSymbol>() else {
        return not_found_page(flash);
    };

    let valid = match RawTxForm::bind(input) {
        Ok(valid) => valid,
        Err(form) => {
            return flash.render(StatusCode::BAD_REQUEST, |messages| {
                pages::push_tx(coin, &form, messages)
            });
        }
    };

    match state.client.push_tx(valid.coin_symbol, &valid.tx_hex).await {
        Ok(PushOutcome::Broadcast { hash }) => {
            flash.success("Transaction Successfully Broadcast");
            flash.redirect(&urls::transaction_path(valid.coin_symbol, hash.as_str()))
        }
        Ok(PushOutcome::Rejected(errors)) => {
            flash.error("Transaction not broadcast for the following errors");
            for error in errors {
                flash.info(error);
            }
            let form = valid.to_form();
            flash.render(StatusCode::OK, |messages| pages::push_tx(coin, &form, messages))
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, coin = %valid.coin_symbol, error = %e, "Broadcast failed");
            flash.error("The blockchain API is unavailable right now. Transaction not broadcast.");
            let form = valid.to_form();
            flash.render(StatusCode::BAD_GATEWAY, |messages| pages::push_tx(coin, &form, messages))
        }
    }
}

pub async fn decode_tx_form(
    Path(coin_symbol): Path<String>,
    Query(query): Query<PreseedQuery>,
    flash: Flash,
) -> Response {
    let Ok(coin) = coin_symbol.parse::<CoinSymbol>() else {
        return not_found_page(flash);
    };
    let form = RawTxForm::initial(coin, query.t);
    flash.render(StatusCode::OK, |messages| pages::decode_tx(coin, &form, "", messages))
}

pub async fn decode_tx_submit(
    State(state): State<AppState>,
    Path(coin_symbol): Path<String>,
    request_id: RequestId,
    mut flash: Flash,
    Form(input): Form<RawTxInput>,
) -> Response {
    let Ok(coin) = coin_symbol.parse::<CoinSymbol>() else {
        return not_found_page(flash);
    };

    let valid = match RawTxForm::bind(input) {
        Ok(valid) => valid,
        Err(form) => {
            return flash.render(StatusCode::BAD_REQUEST, |messages| {
                pages::decode_tx(coin, &form, "", messages)
            });
        }
    };

    let form = valid.to_form();
    match state.client.decode_tx(valid.coin_symbol, &valid.tx_hex).await {
        Ok(decoded) => {
            let tx_json = pretty_json(&decoded);
            flash.render(StatusCode::OK, |messages| {
                pages::decode_tx(coin, &form, &tx_json, messages)
            })
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, coin = %valid.coin_symbol, error = %e, "Decode failed");
            flash.error("The blockchain API is unavailable right now. Please try again shortly.");
            flash.render(StatusCode::BAD_GATEWAY, |messages| {
                pages::decode_tx(coin, &form, "", messages)
            })
        }
    }
}

/// Pretty-print with a four-space indent.
fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}
