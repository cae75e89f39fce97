use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::codec;
use crate::constants::{DEFAULT_DAY_SPAN, TOP_CATEGORIES_LIMIT, TOP_CHANNELS_LIMIT, UNKNOWN};
use crate::observability::metrics;
use crate::types::{EnrichmentMap, RankedEntry, Summary, WatchEvent, YearFilter};

const SECONDS_PER_DAY: i64 = 86_400;

/// Counts names while remembering the order they were first seen in
#[derive(Default)]
struct Tally {
    entries: Vec<RankedEntry>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(RankedEntry {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest counts first; equal counts keep first-seen order
    fn top(self, limit: usize) -> Vec<RankedEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        entries
    }
}

/// Fold watch events into a [`Summary`] in a single pass.
///
/// Events without a parsable timestamp, or outside `year_filter`, are
/// ignored entirely. When `enrichment` is present, events whose video id is
/// in the map contribute their exact duration and category.
pub fn aggregate(
    events: &[WatchEvent],
    year_filter: YearFilter,
    enrichment: Option<&EnrichmentMap>,
) -> Summary {
    let mut total_videos: u64 = 0;
    let mut titles: HashSet<&str> = HashSet::new();
    let mut channels = Tally::default();
    let mut categories = Tally::default();
    let mut months = [0u64; 12];
    let mut watch_seconds: Option<u64> = None;
    let mut earliest: Option<DateTime<Utc>> = None;
    let mut latest: Option<DateTime<Utc>> = None;

    for event in events {
        let Some(timestamp) = event.timestamp() else {
            continue;
        };
        if !year_filter.matches(timestamp.year()) {
            continue;
        }

        total_videos += 1;
        earliest = Some(earliest.map_or(timestamp, |e| e.min(timestamp)));
        latest = Some(latest.map_or(timestamp, |l| l.max(timestamp)));

        let title = event.title();
        if title != UNKNOWN {
            titles.insert(title);
        }

        if let Some(channel) = event.channel() {
            channels.add(channel);
        }

        months[timestamp.month0() as usize] += 1;

        if let Some(record) = enrichment
            .zip(event.video_id())
            .and_then(|(map, id)| map.get(&id))
        {
            let so_far = watch_seconds.unwrap_or(0);
            watch_seconds = Some(so_far.saturating_add(record.duration_seconds));
            categories.add(codec::category_label(&record.category_id));
        }
    }

    let day_span = match (earliest, latest) {
        (Some(first), Some(last)) if last > first => {
            let millis = (last - first).num_milliseconds();
            let day_millis = SECONDS_PER_DAY * 1000;
            // ceil for positive spans
            ((millis + day_millis - 1) / day_millis).max(1)
        }
        _ => DEFAULT_DAY_SPAN,
    };

    debug!(
        total_videos,
        matched_durations = watch_seconds.is_some(),
        day_span,
        "Aggregated watch history"
    );
    metrics::aggregate::events_counted(total_videos);

    Summary {
        total_videos,
        unique_videos: titles.len() as u64,
        top_channels: channels.top(TOP_CHANNELS_LIMIT),
        monthly: Summary::month_table(months),
        top_categories: if categories.is_empty() {
            None
        } else {
            Some(categories.top(TOP_CATEGORIES_LIMIT))
        },
        total_watch_seconds: watch_seconds,
        day_span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnrichmentRecord, Subtitle, VideoId};

    fn event(time: &str, title: &str, channel: &str, id: &str) -> WatchEvent {
        WatchEvent {
            time: Some(time.to_string()),
            title: Some(title.to_string()),
            title_url: Some(format!("https://www.youtube.com/watch?v={id}")),
            subtitles: vec![Subtitle {
                name: Some(channel.to_string()),
                url: None,
            }],
        }
    }

    fn record(seconds: u64, category: &str) -> EnrichmentRecord {
        EnrichmentRecord {
            duration_seconds: seconds,
            category_id: category.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[], YearFilter::All, None);
        assert_eq!(summary.total_videos, 0);
        assert_eq!(summary.unique_videos, 0);
        assert!(summary.top_channels.is_empty());
        assert_eq!(summary.monthly.len(), 12);
        assert!(summary.monthly.iter().all(|m| m.count == 0));
        assert_eq!(summary.top_categories, None);
        assert_eq!(summary.total_watch_seconds, None);
        assert_eq!(summary.day_span, DEFAULT_DAY_SPAN);
    }

    #[test]
    fn test_events_without_time_are_dropped() {
        let events = vec![
            event("2024-01-05T10:00:00Z", "A", "Chan", "a"),
            WatchEvent {
                title: Some("No time".into()),
                ..Default::default()
            },
            WatchEvent {
                time: Some("not a date".into()),
                ..Default::default()
            },
        ];
        let summary = aggregate(&events, YearFilter::All, None);
        assert_eq!(summary.total_videos, 1);
    }

    #[test]
    fn test_year_filter() {
        let events = vec![
            event("2023-03-01T00:00:00Z", "A", "X", "a"),
            event("2024-03-01T00:00:00Z", "B", "X", "b"),
            event("2024-07-01T00:00:00Z", "C", "Y", "c"),
        ];
        assert_eq!(aggregate(&events, YearFilter::Year(2024), None).total_videos, 2);
        assert_eq!(aggregate(&events, YearFilter::Year(2023), None).total_videos, 1);
        assert_eq!(aggregate(&events, YearFilter::Year(2022), None).total_videos, 0);
        assert_eq!(aggregate(&events, YearFilter::All, None).total_videos, 3);
    }

    #[test]
    fn test_unique_titles_ignore_unknown() {
        let mut untitled = event("2024-01-01T00:00:00Z", "x", "X", "u");
        untitled.title = None;
        let events = vec![
            event("2024-01-02T00:00:00Z", "Same", "X", "a"),
            event("2024-01-03T00:00:00Z", "Same", "X", "a"),
            event("2024-01-04T00:00:00Z", "Other", "X", "b"),
            untitled,
        ];
        let summary = aggregate(&events, YearFilter::All, None);
        assert_eq!(summary.total_videos, 4);
        assert_eq!(summary.unique_videos, 2);
    }

    #[test]
    fn test_top_channels_ranking_and_ties() {
        let mut events = Vec::new();
        // "B" seen before "C"; both end with two views
        for (i, ch) in ["A", "B", "C", "A", "C", "B", "A"].iter().enumerate() {
            events.push(event(&format!("2024-02-{:02}T00:00:00Z", i + 1), "t", ch, "v"));
        }
        let summary = aggregate(&events, YearFilter::All, None);
        let ranked: Vec<(&str, u64)> = summary
            .top_channels
            .iter()
            .map(|e| (e.name.as_str(), e.count))
            .collect();
        assert_eq!(ranked, vec![("A", 3), ("B", 2), ("C", 2)]);
    }

    #[test]
    fn test_top_channels_capped() {
        let events: Vec<WatchEvent> = (0..15)
            .map(|i| event("2024-02-01T00:00:00Z", "t", &format!("ch{i}"), "v"))
            .collect();
        let summary = aggregate(&events, YearFilter::All, None);
        assert_eq!(summary.top_channels.len(), TOP_CHANNELS_LIMIT);
        assert_eq!(summary.top_channels[0].name, "ch0");
    }

    #[test]
    fn test_events_without_subtitles_have_no_channel() {
        let events = vec![WatchEvent {
            time: Some("2024-02-01T00:00:00Z".into()),
            ..Default::default()
        }];
        let summary = aggregate(&events, YearFilter::All, None);
        assert_eq!(summary.total_videos, 1);
        assert!(summary.top_channels.is_empty());
    }

    #[test]
    fn test_monthly_table() {
        let events = vec![
            event("2024-01-15T00:00:00Z", "a", "X", "a"),
            event("2024-01-20T00:00:00Z", "b", "X", "b"),
            event("2024-12-31T23:00:00Z", "c", "X", "c"),
        ];
        let summary = aggregate(&events, YearFilter::All, None);
        assert_eq!(summary.monthly[0].month, "January");
        assert_eq!(summary.monthly[11].month, "December");
        assert_eq!(summary.month_count("January"), Some(2));
        assert_eq!(summary.month_count("June"), Some(0));
        assert_eq!(summary.month_count("December"), Some(1));
    }

    #[test]
    fn test_day_span() {
        let single = vec![event("2024-01-01T00:00:00Z", "a", "X", "a")];
        assert_eq!(aggregate(&single, YearFilter::All, None).day_span, DEFAULT_DAY_SPAN);

        let same_instant = vec![
            event("2024-01-01T00:00:00Z", "a", "X", "a"),
            event("2024-01-01T00:00:00Z", "b", "X", "b"),
        ];
        assert_eq!(aggregate(&same_instant, YearFilter::All, None).day_span, DEFAULT_DAY_SPAN);

        let one_hour = vec![
            event("2024-01-01T00:00:00Z", "a", "X", "a"),
            event("2024-01-01T01:00:00Z", "b", "X", "b"),
        ];
        assert_eq!(aggregate(&one_hour, YearFilter::All, None).day_span, 1);

        let ten_and_a_bit = vec![
            event("2024-01-11T00:00:01Z", "b", "X", "b"),
            event("2024-01-01T00:00:00Z", "a", "X", "a"),
        ];
        assert_eq!(aggregate(&ten_and_a_bit, YearFilter::All, None).day_span, 11);
    }

    #[test]
    fn test_enrichment_absent_means_no_exact_data() {
        let events = vec![event("2024-01-01T00:00:00Z", "a", "X", "a")];
        let summary = aggregate(&events, YearFilter::All, None);
        assert_eq!(summary.total_watch_seconds, None);
        assert_eq!(summary.top_categories, None);

        // successful enrichment that matched nothing
        let mut map = EnrichmentMap::new();
        map.insert(VideoId::new("zzz"), record(100, "10"));
        let summary = aggregate(&events, YearFilter::All, Some(&map));
        assert_eq!(summary.total_watch_seconds, None);
        assert_eq!(summary.top_categories, None);
    }

    #[test]
    fn test_enrichment_sums_matched_durations() {
        let events = vec![
            event("2024-01-01T00:00:00Z", "a", "X", "a"),
            event("2024-01-02T00:00:00Z", "a again", "X", "a"),
            event("2024-01-03T00:00:00Z", "b", "X", "b"),
            event("2024-01-04T00:00:00Z", "unmatched", "X", "c"),
            event("2023-01-04T00:00:00Z", "other year", "X", "b"),
        ];
        let mut map = EnrichmentMap::new();
        map.insert(VideoId::new("a"), record(600, "10"));
        map.insert(VideoId::new("b"), record(45, "999"));

        let summary = aggregate(&events, YearFilter::Year(2024), Some(&map));

        assert_eq!(summary.total_watch_seconds, Some(1245));
        let categories = summary.top_categories.unwrap();
        assert_eq!(
            categories,
            vec![
                RankedEntry { name: "Music".into(), count: 2 },
                RankedEntry { name: "Other".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_zero_length_match_is_still_exact() {
        let events = vec![event("2024-01-01T00:00:00Z", "live", "X", "live")];
        let mut map = EnrichmentMap::new();
        map.insert(VideoId::new("live"), record(0, "24"));
        let summary = aggregate(&events, YearFilter::All, Some(&map));
        assert_eq!(summary.total_watch_seconds, Some(0));
    }

    #[test]
    fn test_top_categories_capped() {
        let codes = ["1", "2", "10", "15", "17", "19", "20", "22", "23", "24"];
        let mut map = EnrichmentMap::new();
        let events: Vec<WatchEvent> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| {
                let id = format!("v{i}");
                map.insert(VideoId::new(id.as_str()), record(60, code));
                event("2024-01-01T00:00:00Z", &id, "X", &id)
            })
            .collect();
        let summary = aggregate(&events, YearFilter::All, Some(&map));
        assert_eq!(summary.top_categories.unwrap().len(), TOP_CATEGORIES_LIMIT);
    }
}
