use std::path::Path;
use humansize::{format_size, DECIMAL};

/// Format elapsed wall-clock time for logging, e.g. `0h 12m 5s`
pub fn format_duration(d: std::time::Duration) -> String {
    let d = chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::zero());
    let hours = d.num_hours();
    let minutes = d.num_minutes() % 60;
    let seconds = d.num_seconds() % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Human readable size of a file, if it exists
pub fn file_size(path: &Path) -> Option<(u64, String)> {
    let bytes = std::fs::metadata(path).ok()?.len();
    Some((bytes, format_size(bytes, DECIMAL)))
}
