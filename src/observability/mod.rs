//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the API client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows from the HTTP layer into every handler log line
//! - Metrics are cheap (no-op until a recorder is installed)

pub mod logging;
pub mod metrics;
