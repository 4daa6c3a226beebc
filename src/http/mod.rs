//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → handlers.rs (validate path/form, call the hosted API)
//!     → pages.rs (HTML) / response.rs (JSON errors)
//!     → flash.rs (messages across redirects)
//!     → Send to client
//! ```

pub mod flash;
pub mod handlers;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;
pub mod urls;

pub use flash::{Flash, Level, Message};
pub use request::{RequestId, X_REQUEST_ID};
pub use response::WebError;
pub use server::{build_router, AppState, HttpServer};
