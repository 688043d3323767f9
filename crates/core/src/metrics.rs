//! Prometheus metrics for core components.
//!
//! Covers the two external collaborators: search backend calls and cloud
//! API calls. HTTP server metrics live in the server crate.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Searches executed against the search backend.
pub static SEARCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("magnetcloud_searches_total", "Total searches executed").unwrap()
});

/// Search failures by kind.
pub static SEARCH_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magnetcloud_search_errors_total", "Total search failures"),
        &["kind"], // "http", "parse", "network"
    )
    .unwrap()
});

/// Cloud API calls by operation.
pub static CLOUD_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magnetcloud_cloud_calls_total", "Total cloud API calls"),
        &["operation"],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_ERRORS_TOTAL.clone()),
        Box::new(CLOUD_CALLS_TOTAL.clone()),
    ]
}
