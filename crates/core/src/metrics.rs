//! Prometheus metrics for the matching engine.
//!
//! This module provides metrics for:
//! - Reconciliation outcomes per album
//! - Tracker API calls
//! - Response cache effectiveness

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// =============================================================================
// Reconciliation
// =============================================================================

/// Reconciliation outcomes by result.
pub static RECONCILE_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "redmatch_reconcile_outcomes_total",
            "Total reconciliation attempts by outcome",
        ),
        // "matched", "no_artist", "discography_failed", "no_match", "incomplete_identity"
        &["outcome"],
    )
    .unwrap()
});

/// Best candidate score per reconciliation.
pub static MATCH_SCORE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "redmatch_match_score",
            "Distribution of best candidate scores",
        )
        .buckets(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.75, 0.8, 0.9, 0.95, 1.0]),
        &["source"], // "search", "history", "discography"
    )
    .unwrap()
});

// =============================================================================
// Tracker API
// =============================================================================

/// Tracker API calls by endpoint and result.
pub static REMOTE_CALLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("redmatch_remote_calls_total", "Total tracker API calls"),
        &["endpoint", "result"], // result: "ok", "rate_limited", "error"
    )
    .unwrap()
});

/// Response cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("redmatch_cache_lookups_total", "Total response cache lookups"),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(RECONCILE_OUTCOMES.clone()),
        Box::new(MATCH_SCORE.clone()),
        Box::new(REMOTE_CALLS.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
    ]
}

/// Register all core metrics with `registry`.
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    for metric in all_metrics() {
        registry.register(metric)?;
    }
    Ok(())
}
