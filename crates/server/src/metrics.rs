//! Prometheus metrics for observability.
//!
//! Counters for the three conversion surfaces (downloads, excerpts, merges)
//! plus gauges collected at scrape time (tracked jobs, live workspaces).

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Download jobs submitted.
pub static DOWNLOADS_SUBMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waveforge_downloads_submitted_total",
        "Total download jobs submitted since startup",
    )
    .unwrap()
});

/// Download results retrieved by callers (successful or failed terminal).
pub static DOWNLOAD_RESULTS_RETRIEVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waveforge_download_results_retrieved_total",
        "Total download results retrieved (and evicted) since startup",
    )
    .unwrap()
});

/// Synchronous conversion operations by kind and outcome.
pub static SYNC_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "waveforge_sync_operations_total",
            "Synchronous conversion operations",
        ),
        &["operation", "outcome"],
    )
    .unwrap()
});

/// Jobs currently tracked by the registry (collected at scrape time).
pub static JOBS_TRACKED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "waveforge_jobs_tracked",
        "Number of jobs currently tracked by the registry",
    )
    .unwrap()
});

/// Live scratch workspaces (collected at scrape time).
pub static WORKSPACES_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "waveforge_workspaces_active",
        "Number of allocated scratch workspaces",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(DOWNLOADS_SUBMITTED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(DOWNLOAD_RESULTS_RETRIEVED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(SYNC_OPERATIONS_TOTAL.clone()))
        .unwrap();
    registry.register(Box::new(JOBS_TRACKED.clone())).unwrap();
    registry
        .register(Box::new(WORKSPACES_ACTIVE.clone()))
        .unwrap();
}

/// Renders the registry in the Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
