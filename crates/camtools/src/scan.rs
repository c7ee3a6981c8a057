use std::path::{Path, PathBuf};
use anyhow::{bail, Result};
use walkdir::WalkDir;
use log::{debug, info, warn};

use crate::quality::OUTPUT_TAG;

/// A media file found in a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Path as handed to ffmpeg (working directory joined with the name)
    pub path: PathBuf,
    /// Bare filename, also the sort key
    pub name: String,
}

impl MediaFile {
    /// Filename with its extension removed
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) if pos > 0 => &self.name[..pos],
            _ => &self.name,
        }
    }
}

/// List regular files directly inside `dir` whose name ends with one of
/// `suffixes` (case-sensitive), sorted by filename.
///
/// Ordering is plain string order. Camcorders zero-pad their numbering so this
/// matches recording order; names that are not consistently padded will be
/// mis-ordered.
pub fn discover(dir: &Path, suffixes: &[String]) -> Result<Vec<MediaFile>> {
    if !dir.is_dir() {
        bail!("Working directory does not exist: {}", dir.display());
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);
    for entry in walker.into_iter() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Error reading directory entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = match entry.file_name().to_str() {
            Some(n) => n.to_string(),
            None => {
                warn!("Skipping non UTF-8 filename: {}", entry.path().display());
                continue;
            }
        };

        if suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            debug!("Found media file: {}", name);
            found.push(MediaFile {
                path: entry.path().to_path_buf(),
                name,
            });
        }
    }

    order_by_name(&mut found);
    info!("Found {} file(s) ending in {:?} in {}", found.len(), suffixes, dir.display());
    Ok(found)
}

/// Discover camcorder segments in `dir`, leaving out files written by an
/// earlier merge (their names carry the quality tag) so a re-run never reads
/// its own output.
pub fn discover_segments(dir: &Path, extension: &str) -> Result<Vec<MediaFile>> {
    let mut files = discover(dir, &suffix_for(extension))?;
    files.retain(|f| {
        let is_output = f.name.contains(OUTPUT_TAG);
        if is_output {
            debug!("Ignoring earlier merge output: {}", f.name);
        }
        !is_output
    });
    Ok(files)
}

/// Drop files whose path would be split by the concat protocol's `|` separator
pub fn concat_safe(files: Vec<MediaFile>) -> Vec<MediaFile> {
    files
        .into_iter()
        .filter(|f| {
            let unsafe_name = f.path.to_string_lossy().contains('|');
            if unsafe_name {
                warn!("Skipping {}: '|' cannot be used in a concat input", f.path.display());
            }
            !unsafe_name
        })
        .collect()
}

/// Sort files lexicographically by filename
pub fn order_by_name(files: &mut [MediaFile]) {
    files.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Suffix list for a single extension, e.g. `MTS` -> `[".MTS"]`
pub fn suffix_for(extension: &str) -> Vec<String> {
    vec![format!(".{}", extension)]
}
