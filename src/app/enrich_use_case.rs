use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::app::ports::{LookupError, VideoMetadataPort};
use crate::codec;
use crate::constants::MAX_IDS_PER_BATCH;
use crate::observability::metrics;
use crate::types::{EnrichmentMap, EnrichmentRecord, VideoId, WatchEvent};

/// Decides when a failed batch discards everything fetched so far.
///
/// A failure before `min_successful_batches` batches have succeeded is total
/// (`map` is `None`); any later failure keeps the partial map. The default of
/// one means only a first-batch failure is total; zero is treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub min_successful_batches: usize,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            min_successful_batches: 1,
        }
    }
}

/// Outcome of one enrichment run
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    /// `None` means enrichment is unavailable and callers must estimate
    pub map: Option<EnrichmentMap>,
    pub batches_total: usize,
    pub batches_succeeded: usize,
    /// The failure that stopped the run, if any
    pub failure: Option<LookupError>,
}

impl EnrichmentReport {
    pub fn is_partial(&self) -> bool {
        self.map.is_some() && self.batches_succeeded < self.batches_total
    }
}

/// Use case for joining watch events against remote video metadata
pub struct EnrichUseCase<'a> {
    port: &'a dyn VideoMetadataPort,
    policy: FallbackPolicy,
    batch_size: usize,
}

impl<'a> EnrichUseCase<'a> {
    pub fn new(port: &'a dyn VideoMetadataPort) -> Self {
        Self {
            port,
            policy: FallbackPolicy::default(),
            batch_size: MAX_IDS_PER_BATCH,
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Batch size is clamped to `1..=MAX_IDS_PER_BATCH`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_IDS_PER_BATCH);
        self
    }

    /// Look up every resolvable video id in `events`, one batch at a time.
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub async fn run(&self, events: &[WatchEvent]) -> EnrichmentReport {
        let ids = resolvable_ids(events);
        if ids.is_empty() {
            debug!("No resolvable video ids; nothing to enrich");
            return EnrichmentReport {
                map: Some(EnrichmentMap::new()),
                ..Default::default()
            };
        }

        let batches: Vec<&[VideoId]> = ids.chunks(self.batch_size).collect();
        let batches_total = batches.len();
        info!(
            "📡 Enriching {} video ids in {} batches",
            ids.len(),
            batches_total
        );

        let mut map = EnrichmentMap::new();
        let mut batches_succeeded = 0;

        for (index, batch) in batches.into_iter().enumerate() {
            let started = Instant::now();
            match self.port.lookup(batch).await {
                Ok(items) => {
                    metrics::enrich::batch_succeeded(started.elapsed().as_secs_f64(), items.len());
                    debug!(
                        "Batch {}/{} returned {} of {} ids",
                        index + 1,
                        batches_total,
                        items.len(),
                        batch.len()
                    );
                    for item in items {
                        map.insert(
                            item.id,
                            EnrichmentRecord {
                                duration_seconds: codec::parse_duration(&item.duration),
                                category_id: item.category_id,
                            },
                        );
                    }
                    batches_succeeded += 1;
                }
                Err(err) => {
                    metrics::enrich::batch_failed(err.is_unauthorized());
                    let total =
                        batches_succeeded < self.policy.min_successful_batches.max(1);
                    warn!(
                        "Batch {}/{} failed ({}); {}",
                        index + 1,
                        batches_total,
                        err,
                        if total {
                            "falling back to estimates"
                        } else {
                            "keeping partial results"
                        }
                    );
                    return EnrichmentReport {
                        map: if total { None } else { Some(map) },
                        batches_total,
                        batches_succeeded,
                        failure: Some(err),
                    };
                }
            }
        }

        info!("✅ Enriched {} videos", map.len());
        EnrichmentReport {
            map: Some(map),
            batches_total,
            batches_succeeded,
            failure: None,
        }
    }
}

/// Enrich `events` with the default policy and batch size.
///
/// Returns `None` when the lookup is unavailable as a whole, and an empty map
/// when there was nothing to look up.
pub async fn enrich(events: &[WatchEvent], port: &dyn VideoMetadataPort) -> Option<EnrichmentMap> {
    EnrichUseCase::new(port).run(events).await.map
}

/// Video ids in first-seen order, without duplicates
fn resolvable_ids(events: &[WatchEvent]) -> Vec<VideoId> {
    let mut seen = HashSet::new();
    events
        .iter()
        .filter_map(WatchEvent::video_id)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
