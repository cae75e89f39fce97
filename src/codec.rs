//! Identifier, duration and timestamp parsing.
//!
//! Every function here fails softly: malformed input yields `None` or zero,
//! never an error.

use crate::constants::{CATEGORY_LABELS, OTHER_CATEGORY};
use crate::types::VideoId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]v=([^&#]+)").expect("video id pattern is valid"));

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("duration pattern is valid")
});

/// Extract the `v` query parameter from a watch permalink.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| VideoId::new(m.as_str()))
}

/// Decode `PT[nH][nM][nS]` into seconds. Missing components count as zero.
pub fn parse_duration(notation: &str) -> u64 {
    let Some(captures) = DURATION_RE.captures(notation.trim()) else {
        return 0;
    };

    let mut total: u64 = 0;
    for (index, unit) in [(1, 3600u64), (2, 60), (3, 1)] {
        if let Some(m) = captures.get(index) {
            let Some(part) = m
                .as_str()
                .parse::<u64>()
                .ok()
                .and_then(|n| n.checked_mul(unit))
            else {
                return 0;
            };
            total = total.saturating_add(part);
        }
    }
    total
}

/// Parse an export timestamp into UTC.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (assumed UTC) or a bare
/// date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn category_label(code: &str) -> &'static str {
    CATEGORY_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(OTHER_CATEGORY)
}
