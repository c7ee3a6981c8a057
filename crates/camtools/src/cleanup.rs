use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use walkdir::WalkDir;
use log::{info, warn};

/// WAV files under a root that already have an MP3 sibling
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub converted: Vec<PathBuf>,
    pub removed: usize,
}

/// Default location of self-made recordings, `~/Music/SelfMade`
pub fn default_cleanup_root() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join("Music").join("SelfMade"))
}

/// Path of the MP3 that a WAV converts to
pub fn mp3_sibling(wav: &Path) -> PathBuf {
    wav.with_extension("mp3")
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Walk `root` and collect WAV files whose MP3 sibling exists, sorted by path
pub fn find_converted_wavs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Cleanup root does not exist: {}", root.display());
    }

    info!("Looking for WAV files already converted to MP3 under {}", root.display());

    let mut converted = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Error reading directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_wav(path) {
            continue;
        }

        let candidate = mp3_sibling(path);
        if candidate.is_file() {
            info!("Found {} (converted to {})", path.display(), candidate.display());
            converted.push(path.to_path_buf());
        }
    }

    converted.sort();
    Ok(converted)
}

/// Report converted WAV files under `root`, removing them when `delete` is set
pub fn clean_converted_wavs(root: &Path, delete: bool) -> Result<CleanupReport> {
    let converted = find_converted_wavs(root)?;
    let mut removed = 0;

    if delete {
        for wav in &converted {
            std::fs::remove_file(wav)
                .with_context(|| format!("Failed to remove {}", wav.display()))?;
            info!("Removed {}", wav.display());
            removed += 1;
        }
    } else if !converted.is_empty() {
        info!("Dry run: {} file(s) would be removed, pass --delete to remove them", converted.len());
    }

    Ok(CleanupReport { converted, removed })
}
