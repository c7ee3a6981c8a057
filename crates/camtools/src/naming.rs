use std::path::{Path, PathBuf};

use crate::config::ToolConfig;
use crate::error::MediaError;
use crate::quality::{QualityLevel, QualityProfile};

/// Intermediate and final files written by one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Stream-copied concatenation, in the segment container
    pub intermediate: PathBuf,
    /// Transcoded delivery file
    pub delivery: PathBuf,
}

/// Strip an optional delivery extension from a caller-supplied base name.
///
/// `trip` and `trip.mp4` both give `trip`; `trip.avi` is rejected.
pub fn output_root(base_name: &str, delivery_extension: &str) -> Result<String, MediaError> {
    match Path::new(base_name).extension().and_then(|e| e.to_str()) {
        None => Ok(base_name.to_string()),
        Some(ext) if ext == delivery_extension => {
            Ok(base_name[..base_name.len() - ext.len() - 1].to_string())
        }
        Some(_) => Err(MediaError::InvalidOutputName {
            name: base_name.to_string(),
            expected: delivery_extension.to_string(),
        }),
    }
}

impl OutputNames {
    /// Derive both output paths inside `dir` from the base name and quality level
    pub fn derive(
        dir: &Path,
        base_name: &str,
        level: QualityLevel,
        profile: &QualityProfile,
        cfg: &ToolConfig,
    ) -> Result<Self, MediaError> {
        let root = output_root(base_name, &cfg.delivery_extension)?;
        let stem = format!("{}{}", root, profile.file_tag(level));

        Ok(OutputNames {
            intermediate: dir.join(format!("{}.{}", stem, cfg.segment_extension)),
            delivery: dir.join(format!("{}.{}", stem, cfg.delivery_extension)),
        })
    }
}
