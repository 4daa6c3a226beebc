//! Confidence display scaling.
//!
//! The API reports confidence as a probability in [0,1]. Values like 0.95
//! render as an almost full progress bar, so the bar uses `c^10` instead.

use serde::Serialize;

use crate::blockcypher::TransactionDetails;

/// Exponent applied before scaling to a percentage.
pub const SCALING_EXPONENT: i32 = 10;

/// Ceiling for the polled percentage; 100% is reserved for confirmed.
pub const MAX_POLL_PCT: f64 = 99.99;

/// Treat a missing or zero confidence as "not reported".
pub fn reported(confidence: Option<f64>) -> Option<f64> {
    confidence.filter(|c| *c > 0.0)
}

/// Scale a probability to a bar width in [0,100].
///
/// `None` and NaN map to 0; values outside [0,1] are clamped.
pub fn scale_confidence(confidence: Option<f64>) -> f64 {
    let Some(c) = confidence else {
        return 0.0;
    };
    if c.is_nan() {
        return 0.0;
    }
    c.clamp(0.0, 1.0).powi(SCALING_EXPONENT) * 100.0
}

/// Plain percentage for the overview page.
pub fn confidence_pct(confidence: f64) -> f64 {
    confidence * 100.0
}

/// Percentage rounded to two decimals and capped below 100.
pub fn poll_confidence_pct(confidence: f64) -> f64 {
    let pct = (confidence * 100.0 * 100.0).round() / 100.0;
    pct.min(MAX_POLL_PCT)
}

/// JSON document served to the overview page while it polls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidencePoll {
    pub confidence: Option<f64>,
    pub confidence_pct: Option<f64>,
    pub confidence_pct_scaled: f64,
    pub double_spend_detected: bool,
    pub receive_cnt: Option<u64>,
}

impl ConfidencePoll {
    pub fn from_details(details: &TransactionDetails) -> Self {
        Self {
            confidence: details.confidence,
            confidence_pct: reported(details.confidence).map(poll_confidence_pct),
            confidence_pct_scaled: scale_confidence(details.confidence),
            double_spend_detected: details.double_spend,
            receive_cnt: details.receive_count,
        }
    }
}
