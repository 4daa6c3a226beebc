//! One-shot user messages carried across redirects.
//!
//! Messages live in a `flash` cookie as form-urlencoded `level=text` pairs.
//! A rendered page consumes them and clears the cookie; a redirect carries
//! every pending message forward.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use url::form_urlencoded;

pub const FLASH_COOKIE: &str = "flash";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Level::Success),
            "info" => Some(Level::Info),
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

/// Pending messages for the current request.
#[derive(Debug, Default)]
pub struct Flash {
    messages: Vec<Message>,
    from_cookie: bool,
}

impl Flash {
    /// Read pending messages from the request's cookies.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookie = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .map(|(_, value)| value);

        let Some(value) = cookie else {
            return Self::default();
        };

        let messages = form_urlencoded::parse(value.as_bytes())
            .filter_map(|(level, text)| {
                Level::parse(&level).map(|level| Message {
                    level,
                    text: text.into_owned(),
                })
            })
            .collect();

        Self {
            messages,
            from_cookie: true,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>) {
        self.messages.push(Message {
            level,
            text: text.into(),
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Level::Success, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Level::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    /// Redirect, carrying all pending messages to the next page.
    pub fn redirect(self, to: &str) -> Response {
        let mut response = Redirect::to(to).into_response();
        if !self.messages.is_empty() {
            set_cookie(&mut response, &format!("{}={}; {}", FLASH_COOKIE, self.encode(), COOKIE_ATTRIBUTES));
        } else if self.from_cookie {
            set_cookie(&mut response, &clear_cookie());
        }
        response
    }

    /// Render a page that displays (and thereby consumes) the messages.
    pub fn render(self, status: StatusCode, page: impl FnOnce(&[Message]) -> String) -> Response {
        let mut response = (status, Html(page(&self.messages))).into_response();
        if self.from_cookie {
            set_cookie(&mut response, &clear_cookie());
        }
        response
    }

    fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for message in &self.messages {
            serializer.append_pair(message.level.as_str(), &message.text);
        }
        serializer.finish()
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flash::from_headers(&parts.headers))
    }
}

fn clear_cookie() -> String {
    format!("{}=; Max-Age=0; {}", FLASH_COOKIE, COOKIE_ATTRIBUTES)
}

fn set_cookie(response: &mut Response, value: &str) {
    // Encoded values are cookie-safe ASCII, so this only fails on a bug
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Dropping unencodable flash cookie"),
    }
}
