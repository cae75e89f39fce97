use crate::codec;
use crate::constants::{MONTHS, UNKNOWN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One entry of a `subtitles` list in the exported history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subtitle {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// A single viewing record as it appears in `watch-history.json`.
///
/// Every field is optional in the export; accessors apply the defaults the
/// aggregator relies on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchEvent {
    pub time: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "titleUrl")]
    pub title_url: Option<String>,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

impl WatchEvent {
    /// Parsed timestamp, or `None` when `time` is missing or unparsable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time.as_deref().and_then(codec::parse_timestamp)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN)
    }

    /// Name of the first subtitle entry. `None` when the event has no subtitles
    /// at all; `Some("Unknown")` when the first entry has no name.
    pub fn channel(&self) -> Option<&str> {
        self.subtitles
            .first()
            .map(|s| s.name.as_deref().unwrap_or(UNKNOWN))
    }

    pub fn video_id(&self) -> Option<VideoId> {
        self.title_url.as_deref().and_then(codec::extract_video_id)
    }
}

/// Opaque video identifier taken from the `v` query parameter of a permalink
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exact metadata for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub duration_seconds: u64,
    pub category_id: String,
}

/// Best-effort lookup results; ids the service did not return are absent
pub type EnrichmentMap = HashMap<VideoId, EnrichmentRecord>;

/// Restricts aggregation to one calendar year, or to nothing at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YearFilter {
    All,
    Year(i32),
}

impl YearFilter {
    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(y) => *y == year,
        }
    }
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        s.parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| format!("expected a year or \"all\", got '{s}'"))
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str("all"),
            YearFilter::Year(y) => write!(f, "{y}"),
        }
    }
}

/// A name with its tally, as used by the ranked channel and category lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: u64,
}

/// Aggregate statistics over the year-filtered events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_videos: u64,
    pub unique_videos: u64,
    pub top_channels: Vec<RankedEntry>,
    /// Always twelve entries, January first
    pub monthly: [MonthCount; 12],
    /// `None` unless enrichment produced at least one category
    pub top_categories: Option<Vec<RankedEntry>>,
    /// `None` unless at least one counted event matched enrichment data
    pub total_watch_seconds: Option<u64>,
    pub day_span: i64,
}

impl Summary {
    pub fn month_count(&self, month: &str) -> Option<u64> {
        self.monthly
            .iter()
            .find(|m| m.month == month)
            .map(|m| m.count)
    }

    pub(crate) fn month_table(counts: [u64; 12]) -> [MonthCount; 12] {
        std::array::from_fn(|i| MonthCount {
            month: MONTHS[i],
            count: counts[i],
        })
    }
}
