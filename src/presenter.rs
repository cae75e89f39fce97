//! The shape handed to whatever renders the year in review.
//!
//! Everything a front end needs is computed here; rendering only formats
//! numbers. [`render_text`] is the terminal rendering used by the CLI.

use serde::Serialize;
use std::fmt;

use crate::app::enrich_use_case::EnrichmentReport;
use crate::constants::AVERAGE_VIDEO_MINUTES;
use crate::types::{MonthCount, RankedEntry, Summary, YearFilter};

/// Where the watch-time figure came from and how far enrichment got
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// No credential was supplied
    NotRequested,
    Complete,
    Partial {
        batches_succeeded: usize,
        batches_total: usize,
    },
    /// The lookup was unusable; `message` is the service's own text
    Failed { message: String, unauthorized: bool },
}

impl EnrichmentStatus {
    pub fn from_report(report: &EnrichmentReport) -> Self {
        match (&report.map, &report.failure) {
            (None, Some(err)) => EnrichmentStatus::Failed {
                message: err.message().to_string(),
                unauthorized: err.is_unauthorized(),
            },
            (None, None) => EnrichmentStatus::Failed {
                message: "Enrichment unavailable".to_string(),
                unauthorized: false,
            },
            (Some(_), _) if report.is_partial() => EnrichmentStatus::Partial {
                batches_succeeded: report.batches_succeeded,
                batches_total: report.batches_total,
            },
            (Some(_), _) => EnrichmentStatus::Complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchTime {
    pub minutes: f64,
    /// True when `minutes` comes from matched durations rather than the estimate
    pub exact: bool,
    pub display: String,
}

impl WatchTime {
    pub fn from_summary(summary: &Summary) -> Self {
        let (minutes, exact) = match summary.total_watch_seconds {
            Some(seconds) => (seconds as f64 / 60.0, true),
            None => (estimate_watch_minutes(summary.total_videos), false),
        };
        Self {
            minutes,
            exact,
            display: format_watch_time(minutes),
        }
    }
}

/// Everything the year-in-review view shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedReport {
    pub title: String,
    pub year: YearFilter,
    pub total_videos: u64,
    pub unique_videos: u64,
    pub watch_time: WatchTime,
    pub avg_per_day: f64,
    pub day_span: i64,
    pub top_channels: Vec<RankedEntry>,
    pub monthly: Vec<MonthCount>,
    pub top_categories: Option<Vec<RankedEntry>>,
    pub enrichment: EnrichmentStatus,
}

impl WrappedReport {
    pub fn build(summary: &Summary, year: YearFilter, enrichment: EnrichmentStatus) -> Self {
        let title = match year {
            YearFilter::All => "YOUR YOUTUBE WRAPPED - ALL TIME".to_string(),
            YearFilter::Year(y) => format!("YOUR YOUTUBE WRAPPED {y}"),
        };
        let per_day = summary.total_videos as f64 / summary.day_span.max(1) as f64;
        let avg_per_day = (per_day * 10.0).round() / 10.0;

        Self {
            title,
            year,
            total_videos: summary.total_videos,
            unique_videos: summary.unique_videos,
            watch_time: WatchTime::from_summary(summary),
            avg_per_day,
            day_span: summary.day_span,
            top_channels: summary.top_channels.clone(),
            monthly: summary.monthly.to_vec(),
            top_categories: summary.top_categories.clone(),
            enrichment,
        }
    }
}

pub fn estimate_watch_minutes(total_videos: u64) -> f64 {
    total_videos as f64 * AVERAGE_VIDEO_MINUTES
}

/// Coarsest non-zero unit: `"2d 5h"`, `"7h"` or `"42m"`
pub fn format_watch_time(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    let hours = (minutes / 60.0).floor() as u64;
    let days = hours / 24;
    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{}m", minutes.floor() as u64)
    }
}

/// Thousands separators for counts, e.g. `12,345`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn month_bar(count: u64) -> String {
    let width = if count > 10 { count / 10 } else { 1 };
    "█".repeat(width as usize)
}

fn write_ranked(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    entries: &[RankedEntry],
) -> fmt::Result {
    writeln!(f, "{heading}")?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(f, "   {}. {}: {} videos", i + 1, entry.name, entry.count)?;
    }
    writeln!(f)
}

impl fmt::Display for WrappedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);

        writeln!(f, "\n{rule}")?;
        writeln!(f, "{:^60}", format!("🎬 {} 🎬", self.title))?;
        writeln!(f, "{rule}\n")?;

        writeln!(f, "📺 Total Videos Watched: {}", group_thousands(self.total_videos))?;
        writeln!(f, "🎯 Unique Videos: {}", group_thousands(self.unique_videos))?;
        writeln!(
            f,
            "⏱️  {} Watch Time: {} ({} minutes total)",
            if self.watch_time.exact { "Exact" } else { "Estimated" },
            self.watch_time.display,
            group_thousands(self.watch_time.minutes.round() as u64)
        )?;
        writeln!(f, "📈 Average Per Day: {:.1}\n", self.avg_per_day)?;

        if !self.top_channels.is_empty() {
            write_ranked(f, "🏆 Your Top Channels:", &self.top_channels)?;
        }

        if self.monthly.iter().any(|m| m.count > 0) {
            writeln!(f, "📅 Monthly Breakdown:")?;
            for month in self.monthly.iter().filter(|m| m.count > 0) {
                let bar = month_bar(month.count);
                writeln!(f, "   {:12}: {} ({})", month.month, bar, month.count)?;
            }
            writeln!(f)?;
        }

        if let Some(categories) = &self.top_categories {
            write_ranked(f, "🗂️  Top Categories:", categories)?;
        }

        match &self.enrichment {
            EnrichmentStatus::Failed {
                message,
                unauthorized,
            } => {
                writeln!(f, "⚠️  Exact watch time unavailable: {message}")?;
                if *unauthorized {
                    writeln!(
                        f,
                        "   Check that the API key is valid and the YouTube Data API \
                         is enabled for it."
                    )?;
                }
            }
            EnrichmentStatus::Partial {
                batches_succeeded,
                batches_total,
            } => {
                writeln!(
                    f,
                    "ℹ️  Metadata fetched for {batches_succeeded} of {batches_total} batches; \
                     watch time covers those videos only."
                )?;
            }
            EnrichmentStatus::NotRequested | EnrichmentStatus::Complete => {}
        }

        writeln!(f, "{rule}")
    }
}

pub fn render_text(report: &WrappedReport) -> String {
    report.to_string()
}
