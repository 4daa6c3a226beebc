//! Web front end for a hosted blockchain-data API.

pub mod blockcypher;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod transactions;

pub use config::ExplorerConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownSignal};
