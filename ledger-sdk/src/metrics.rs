//! Prometheus metrics for the SDK
//!
//! # Metrics
//!
//! - `ledger_sdk_requests_total` - Requests by method and outcome
//! - `ledger_sdk_request_duration_seconds` - End-to-end request latency, retries included
//! - `ledger_sdk_retries_total` - Retried attempts by method and reason
//! - `ledger_sdk_resubmissions_total` - Transactions resubmitted after congestion
//! - `ledger_sdk_node_unhealthy_total` - Times a node was parked

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter, CounterVec, HistogramVec,
    IntCounter,
};

lazy_static! {
    /// Total requests executed
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "ledger_sdk_requests_total",
        "Total requests executed",
        &["method", "outcome"]
    )
    .unwrap();

    /// Request duration
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "ledger_sdk_request_duration_seconds",
        "Request duration in seconds, retries included",
        &["method"]
    )
    .unwrap();

    /// Retried attempts
    pub static ref RETRIES_TOTAL: CounterVec = register_counter_vec!(
        "ledger_sdk_retries_total",
        "Attempts retried after a transient failure",
        &["method", "reason"]
    )
    .unwrap();

    /// Congestion resubmissions
    pub static ref RESUBMISSIONS_TOTAL: IntCounter = register_int_counter!(
        "ledger_sdk_resubmissions_total",
        "Transactions resubmitted under a new id after congestion"
    )
    .unwrap();

    /// Node parking events
    pub static ref NODE_UNHEALTHY_TOTAL: CounterVec = register_counter_vec!(
        "ledger_sdk_node_unhealthy_total",
        "Times a node was marked unhealthy",
        &["node"]
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let before = RETRIES_TOTAL.with_label_values(&["Test/method", "busy"]).get();
        RETRIES_TOTAL.with_label_values(&["Test/method", "busy"]).inc();
        let after = RETRIES_TOTAL.with_label_values(&["Test/method", "busy"]).get();
        assert_eq!(after, before + 1.0);
    }
}
