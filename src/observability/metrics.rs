//! Metrics for the enrichment and aggregation phases.
//!
//! Recording is always safe: without an installed recorder the `metrics`
//! macros are no-ops, so library callers and tests need no setup.

use std::fmt;
use std::net::SocketAddr;

use tracing::{info, warn};

use crate::constants::METRICS_ADDR_ENV;

/// All metric names used by the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    EnrichBatchesSuccess,
    EnrichBatchesError,
    EnrichBatchesUnauthorized,
    EnrichBatchDuration,
    EnrichItemsReturned,
    AggregateRuns,
    AggregateEventsCounted,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::EnrichBatchesSuccess => "wrapped_enrich_batches_success_total",
            MetricName::EnrichBatchesError => "wrapped_enrich_batches_error_total",
            MetricName::EnrichBatchesUnauthorized => "wrapped_enrich_batches_unauthorized_total",
            MetricName::EnrichBatchDuration => "wrapped_enrich_batch_duration_seconds",
            MetricName::EnrichItemsReturned => "wrapped_enrich_items_returned_total",
            MetricName::AggregateRuns => "wrapped_aggregate_runs_total",
            MetricName::AggregateEventsCounted => "wrapped_aggregate_events_counted_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus exporter when `WRAPPED_METRICS_ADDR` is set.
///
/// Returns whether an exporter is now listening.
pub fn init() -> bool {
    let Ok(addr_str) = std::env::var(METRICS_ADDR_ENV) else {
        return false;
    };
    let addr = match addr_str.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics addr '{}': {}", addr_str, e);
            return false;
        }
    };

    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => {
            info!("Prometheus exporter listening at http://{}/metrics", addr);
            true
        }
        Err(e) => {
            warn!("Failed to install Prometheus exporter: {}", e);
            false
        }
    }
}

pub mod enrich {
    use super::MetricName;

    pub fn batch_succeeded(duration_secs: f64, items: usize) {
        ::metrics::counter!(MetricName::EnrichBatchesSuccess.as_str()).increment(1);
        ::metrics::counter!(MetricName::EnrichItemsReturned.as_str()).increment(items as u64);
        ::metrics::histogram!(MetricName::EnrichBatchDuration.as_str()).record(duration_secs);
    }

    pub fn batch_failed(unauthorized: bool) {
        ::metrics::counter!(MetricName::EnrichBatchesError.as_str()).increment(1);
        if unauthorized {
            ::metrics::counter!(MetricName::EnrichBatchesUnauthorized.as_str()).increment(1);
        }
    }
}

pub mod aggregate {
    use super::MetricName;

    pub fn events_counted(count: u64) {
        ::metrics::counter!(MetricName::AggregateRuns.as_str()).increment(1);
        ::metrics::counter!(MetricName::AggregateEventsCounted.as_str()).increment(count);
    }
}
