use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Datelike;
use tracing::{info, instrument};

use crate::error::Result;
use crate::types::WatchEvent;

/// Read a Takeout `watch-history.json` export.
///
/// The file must be a JSON array; fields not modelled by [`WatchEvent`] are ignored.
#[instrument]
pub fn load_watch_history(path: &Path) -> Result<Vec<WatchEvent>> {
    let content = fs::read_to_string(path)?;
    let events: Vec<WatchEvent> = serde_json::from_str(&content)?;
    info!("Loaded {} entries from {}", events.len(), path.display());
    Ok(events)
}

/// Years present in the history with their event counts, newest first
pub fn available_years(events: &[WatchEvent]) -> Vec<(i32, usize)> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for ts in events.iter().filter_map(WatchEvent::timestamp) {
        *years.entry(ts.year()).or_default() += 1;
    }
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WrappedError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_takeout_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"header": "YouTube", "title": "Watched A",
                  "titleUrl": "https://www.youtube.com/watch?v=a1",
                  "subtitles": [{{"name": "Chan", "url": "https://www.youtube.com/channel/c"}}],
                  "time": "2024-02-01T10:00:00.000Z", "products": ["YouTube"],
                  "activityControls": ["YouTube watch history"]}},
                {{"header": "YouTube", "title": "Visited YouTube Music",
                  "time": "2023-02-01T10:00:00Z"}}
            ]"#
        )
        .unwrap();

        let events = load_watch_history(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].channel(), Some("Chan"));
        assert!(events[1].subtitles.is_empty());
    }

    #[test]
    fn test_load_rejects_non_array() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "not a list"}}"#).unwrap();
        assert!(matches!(
            load_watch_history(file.path()),
            Err(WrappedError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_watch_history(Path::new("/no/such/watch-history.json")),
            Err(WrappedError::Io(_))
        ));
    }

    #[test]
    fn test_available_years() {
        let times = [
            "2023-01-01T00:00:00Z",
            "2024-05-01T00:00:00Z",
            "2024-06-01T00:00:00Z",
        ];
        let events: Vec<WatchEvent> = times
            .iter()
            .map(|t| WatchEvent {
                time: Some(t.to_string()),
                ..Default::default()
            })
            .chain(std::iter::once(WatchEvent::default()))
            .collect();
        assert_eq!(available_years(&events), vec![(2024, 2), (2023, 1)]);
    }
}
