//! Shared utilities for route-level integration tests.

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response},
    Router,
};
use tower::ServiceExt;

use tx_explorer::config::ExplorerConfig;
use tx_explorer::http::{build_router, AppState, Flash, Message};

pub const HASH: &str = "f854aebae95150b379cc1187d848d58225f3c4157fe992bcd166f58bd5063449";

/// Router wired to a mock API at `api_base`.
pub fn test_router(api_base: String) -> Router {
    let mut config = ExplorerConfig::default();
    config.blockcypher.base_url = api_base;
    config.blockcypher.api_key = None;
    config.blockcypher.public_key = Some("public-token".to_string());
    config.blockcypher.timeout_secs = 5;
    build_router(AppState::new(config).unwrap())
}

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(router: Router, uri: &str, form: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(router, request).await
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Decode the flash messages a response sets for the next request.
pub fn flash_messages(response: &Response<Body>) -> Vec<Message> {
    let Some(cookie) = response.headers().get(header::SET_COOKIE) else {
        return Vec::new();
    };
    let pair = cookie.to_str().unwrap().split(';').next().unwrap().to_string();
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, pair.parse().unwrap());
    Flash::from_headers(&headers).messages().to_vec()
}
