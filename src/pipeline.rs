use chrono::Datelike;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::app::aggregate::aggregate;
use crate::app::enrich_use_case::{EnrichUseCase, FallbackPolicy};
use crate::app::ports::VideoMetadataPort;
use crate::constants::MAX_IDS_PER_BATCH;
use crate::presenter::EnrichmentStatus;
use crate::types::{Summary, WatchEvent, YearFilter};

/// Enrichment settings for one run
#[derive(Clone, Copy)]
pub struct EnrichmentOptions<'a> {
    pub port: &'a dyn VideoMetadataPort,
    pub policy: FallbackPolicy,
    pub batch_size: usize,
}

impl<'a> EnrichmentOptions<'a> {
    pub fn new(port: &'a dyn VideoMetadataPort) -> Self {
        Self {
            port,
            policy: FallbackPolicy::default(),
            batch_size: MAX_IDS_PER_BATCH,
        }
    }
}

/// Result of a complete analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub enrichment: EnrichmentStatus,
}

pub struct Pipeline;

impl Pipeline {
    /// Analyze `events` for `year_filter`, enriching first when `enrichment` is given.
    ///
    /// Only events inside the year filter are looked up. All state lives in
    /// the arguments and the returned value.
    #[instrument(skip(events, enrichment), fields(events = events.len(), year = %year_filter))]
    pub async fn run(
        events: &[WatchEvent],
        year_filter: YearFilter,
        enrichment: Option<EnrichmentOptions<'_>>,
    ) -> AnalysisResult {
        let started = Instant::now();
        info!("🚀 Analyzing {} history entries", events.len());

        let Some(options) = enrichment else {
            let summary = aggregate(events, year_filter, None);
            info!("✅ Analysis finished without enrichment in {:?}", started.elapsed());
            return AnalysisResult {
                summary,
                enrichment: EnrichmentStatus::NotRequested,
            };
        };

        let in_range: Vec<WatchEvent> = events
            .iter()
            .filter(|e| e.timestamp().is_some_and(|ts| year_filter.matches(ts.year())))
            .cloned()
            .collect();

        let report = EnrichUseCase::new(options.port)
            .with_policy(options.policy)
            .with_batch_size(options.batch_size)
            .run(&in_range)
            .await;
        let status = EnrichmentStatus::from_report(&report);
        if let EnrichmentStatus::Failed { message, .. } = &status {
            warn!("Enrichment unavailable, watch time will be estimated: {}", message);
        }

        let summary = aggregate(&in_range, year_filter, report.map.as_ref());
        info!("✅ Analysis finished in {:?}", started.elapsed());

        AnalysisResult {
            summary,
            enrichment: status,
        }
    }
}
