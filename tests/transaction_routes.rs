//! Route-level tests against a mocked hosted API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use httpmock::prelude::*;
use serde_json::json;

use tx_explorer::http::Level;

mod common;
use common::HASH;

/// Nothing listens on the discard port, so every API call fails to connect.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn unconfirmed_tx() -> serde_json::Value {
    json!({
        "hash": HASH,
        "block_height": -1,
        "total": 9_000,
        "fees": 1_000,
        "size": 226,
        "received": "2015-06-01T12:00:00Z",
        "confirmations": 0,
        "confidence": 0.9,
        "double_spend": false,
        "receive_count": 77,
        "relayed_by": "54.149.116.54:8333",
        "inputs": [{
            "prev_hash": "a".repeat(64),
            "output_index": 1,
            "output_value": 10_000,
            "script_type": "pay-to-pubkey-hash",
            "addresses": ["1Ez69SnzzmePmZX3WpEzMKTrcBF2gpNQ55"]
        }],
        "outputs": [{
            "value": 9_000,
            "script_type": "pay-to-pubkey-hash",
            "addresses": ["<script>alert(1)</script>"]
        }],
        "hex": "0100"
    })
}

#[tokio::test]
async fn test_invalid_hash_redirects_with_warning() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, "/btc/tx/not-a-hash/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/btc/");
    let messages = common::flash_messages(&response);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, Level::Warning);
    assert_eq!(messages[0].text, "Invalid Transaction Hash");
}

#[tokio::test]
async fn test_missing_transaction_redirects_home() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/btc/main/txs/{}", HASH));
            then.status(404).json_body(json!({"error": "Transaction not found."}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, &format!("/btc/tx/{}/", HASH)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/");
    let messages = common::flash_messages(&response);
    assert_eq!(messages[0].text, format!("No transaction found with the hash {}", HASH));
}

#[tokio::test]
async fn test_api_outage_redirects_to_coin_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/ltc/main/txs/{}", HASH));
            then.status(500).body("oops");
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, &format!("/ltc/tx/{}/", HASH)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), "/ltc/");
    assert_eq!(common::flash_messages(&response)[0].level, Level::Warning);
}

#[tokio::test]
async fn test_transaction_overview_renders() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/btc/main/txs/{}", HASH))
                .query_param("limit", "500")
                .query_param("includeHex", "true");
            then.status(200).json_body(unconfirmed_tx());
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, &format!("/btc/tx/{}/", HASH)).await;

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let html = common::body_text(response).await;
    assert!(html.contains(HASH));
    assert!(html.contains("90.00%"));
    assert!(html.contains("0.00009000 BTC"));
    assert!(html.contains(&format!("/btc/tx-confidence/{}/", HASH)));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("public-token"));
    assert!(html.contains("<td>54.149.116.54:8333</td>"));
}

#[tokio::test]
async fn test_unknown_coin_is_not_found() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router.clone(), &format!("/eth/tx/{}/", HASH)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::get(router, "/eth/pushtx/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_poll_confidence_json() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/btc/main/txs/{}", HASH))
                .query_param("limit", "1");
            then.status(200).json_body(unconfirmed_tx());
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, &format!("/btc/tx-confidence/{}/", HASH)).await;

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["confidence"], 0.9);
    assert_eq!(body["confidence_pct"], 90.0);
    assert_eq!(body["double_spend_detected"], false);
    assert_eq!(body["receive_cnt"], 77);
    let scaled = body["confidence_pct_scaled"].as_f64().unwrap();
    assert!((scaled - 34.867844).abs() < 1e-4);
}

#[tokio::test]
async fn test_poll_confidence_errors_are_json() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/btc/main/txs/{}", HASH));
            then.status(404).json_body(json!({"error": "Transaction not found."}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::get(router.clone(), "/btc/tx-confidence/xyz/").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_HASH");

    let response = common::get(router, &format!("/btc/tx-confidence/{}/", HASH)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forwarding_routes_use_btc() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router.clone(), "/pushtx/").await;
    assert!(response.status().is_redirection());
    assert_eq!(common::location(&response), "/btc/pushtx/");

    let response = common::get(router, "/decodetx/").await;
    assert!(response.status().is_redirection());
    assert_eq!(common::location(&response), "/btc/decodetx/");
}

#[tokio::test]
async fn test_push_form_preseeds_hex() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, "/doge/pushtx/?t=deadbeef").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_text(response).await;
    assert!(html.contains(">deadbeef</textarea>"));
    assert!(html.contains(r#"<option value="doge" selected>"#));
}

#[tokio::test]
async fn test_successful_broadcast_redirects_to_overview() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/btc/test3/txs/push")
                .json_body(json!({"tx": "0100abcd"}));
            then.status(201).json_body(json!({"tx": {"hash": HASH}}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::post_form(
        router,
        "/btc/pushtx/",
        "tx_hex=0100abcd&coin_symbol=btc-testnet",
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), format!("/btc-testnet/tx/{}/", HASH));
    let messages = common::flash_messages(&response);
    assert_eq!(messages[0].level, Level::Success);
    assert_eq!(messages[0].text, "Transaction Successfully Broadcast");
}

#[tokio::test]
async fn test_rejected_broadcast_lists_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/btc/main/txs/push");
            then.status(400).json_body(json!({
                "errors": [{"error": "Unable to find transaction input"}, {"error": "Bad signature"}]
            }));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::post_form(router, "/btc/pushtx/", "tx_hex=0100&coin_symbol=btc").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_text(response).await;
    assert!(html.contains(r#"alert-error">Transaction not broadcast for the following errors"#));
    assert!(html.contains(r#"alert-info">Unable to find transaction input"#));
    assert!(html.contains(r#"alert-info">Bad signature"#));
    assert!(html.contains(">0100</textarea>"));
}

#[tokio::test]
async fn test_invalid_form_is_not_sent_to_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/btc/main/txs/push");
            then.status(201).json_body(json!({"tx": {"hash": HASH}}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::post_form(router, "/btc/pushtx/", "tx_hex=xyz&coin_symbol=btc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.hits_async().await, 0);
    let html = common::body_text(response).await;
    assert!(html.contains("field-error"));
}

#[tokio::test]
async fn test_decode_renders_indented_json() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/ltc/main/txs/decode")
                .json_body(json!({"tx": "0100"}));
            then.status(200).json_body(json!({"hash": HASH, "ver": 1}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::post_form(router, "/ltc/decodetx/", "tx_hex=0100&coin_symbol=ltc").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_text(response).await;
    assert!(html.contains(&format!("{{\n    &quot;hash&quot;: &quot;{}&quot;,\n    &quot;ver&quot;: 1\n}}", HASH)));
}

#[tokio::test]
async fn test_home_consumes_flash_cookie() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, "flash=warning=Invalid+Transaction+Hash")
        .body(Body::empty())
        .unwrap();
    let response = common::send(router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("flash=;"));
    assert!(cookie.contains("Max-Age=0"));
    let html = common::body_text(response).await;
    assert!(html.contains(r#"alert-warning">Invalid Transaction Hash"#));
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, "/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_poll_unknown_coin_is_json_not_found() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, &format!("/eth/tx-confidence/{}/", HASH)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_COIN");
}

#[tokio::test]
async fn test_poll_api_failure_is_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/dash/main/txs/{}", HASH));
            then.status(500).body("oops");
        })
        .await;

    let response = common::get(
        common::test_router(server.base_url()),
        &format!("/dash/tx-confidence/{}/", HASH),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    let response = common::get(
        common::test_router(UNREACHABLE_API.to_string()),
        &format!("/dash/tx-confidence/{}/", HASH),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = serde_json::from_str(&common::body_text(response).await).unwrap();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_decode_form_preseeds_hex() {
    let server = MockServer::start_async().await;
    let router = common::test_router(server.base_url());

    let response = common::get(router, "/btc-testnet/decodetx/?t=cafe01").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_text(response).await;
    assert!(html.contains(">cafe01</textarea>"));
    assert!(html.contains(r#"<option value="btc-testnet" selected>"#));
    assert!(!html.contains("tx-json"));
}

#[tokio::test]
async fn test_invalid_decode_form_is_not_sent_to_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/btc/main/txs/decode");
            then.status(200).json_body(json!({"hash": HASH}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::post_form(router, "/btc/decodetx/", "tx_hex=zz&coin_symbol=btc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.hits_async().await, 0);
    let html = common::body_text(response).await;
    assert!(html.contains("field-error"));
    assert!(html.contains(">zz</textarea>"));
}

#[tokio::test]
async fn test_decode_api_unreachable_rerenders_form() {
    let router = common::test_router(UNREACHABLE_API.to_string());

    let response = common::post_form(router, "/ltc/decodetx/", "tx_hex=0100&coin_symbol=ltc").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = common::body_text(response).await;
    assert!(html.contains(r#"alert-error">The blockchain API is unavailable right now."#));
    assert!(html.contains(">0100</textarea>"));
    assert!(!html.contains("tx-json"));
}

#[tokio::test]
async fn test_broadcast_with_malformed_hash_is_not_followed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/btc/main/txs/push");
            then.status(201).json_body(json!({"tx": {"hash": "ab\ncd"}}));
        })
        .await;
    let router = common::test_router(server.base_url());

    let response = common::post_form(router, "/btc/pushtx/", "tx_hex=0100&coin_symbol=btc").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(!response.headers().contains_key(header::LOCATION));
    let html = common::body_text(response).await;
    assert!(html.contains("Transaction not broadcast."));
    assert!(html.contains(">0100</textarea>"));
}
