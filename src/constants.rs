//! Fixed tables and limits shared across the analysis pipeline.

/// Sentinel used for a missing title or channel name
pub const UNKNOWN: &str = "Unknown";

/// Label for category codes missing from [`CATEGORY_LABELS`]
pub const OTHER_CATEGORY: &str = "Other";

/// The lookup service rejects requests with more ids than this
pub const MAX_IDS_PER_BATCH: usize = 50;

pub const TOP_CHANNELS_LIMIT: usize = 10;
pub const TOP_CATEGORIES_LIMIT: usize = 8;

/// Day span reported when the filtered events do not cover two distinct instants
pub const DEFAULT_DAY_SPAN: i64 = 365;

/// Average video length used to estimate watch time when no exact data exists
pub const AVERAGE_VIDEO_MINUTES: f64 = 11.7;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Environment variable holding the lookup credential
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Environment variable enabling the Prometheus exporter
pub const METRICS_ADDR_ENV: &str = "WRAPPED_METRICS_ADDR";

/// Calendar months in canonical order; index 0 is January
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Video category codes as reported by the metadata API
pub const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("1", "Film & Animation"),
    ("2", "Autos & Vehicles"),
    ("10", "Music"),
    ("15", "Pets & Animals"),
    ("17", "Sports"),
    ("18", "Short Movies"),
    ("19", "Travel & Events"),
    ("20", "Gaming"),
    ("21", "Videoblogging"),
    ("22", "People & Blogs"),
    ("23", "Comedy"),
    ("24", "Entertainment"),
    ("25", "News & Politics"),
    ("26", "Howto & Style"),
    ("27", "Education"),
    ("28", "Science & Technology"),
    ("29", "Nonprofits & Activism"),
    ("30", "Movies"),
    ("31", "Anime/Animation"),
    ("32", "Action/Adventure"),
    ("33", "Classics"),
    ("34", "Comedy"),
    ("35", "Documentary"),
    ("36", "Drama"),
    ("37", "Family"),
    ("38", "Foreign"),
    ("39", "Horror"),
    ("40", "Sci-Fi/Fantasy"),
    ("41", "Thriller"),
    ("42", "Shorts"),
    ("43", "Shows"),
    ("44", "Trailers"),
];
