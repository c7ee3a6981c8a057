use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the camcorder media tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Path to the ffmpeg binary
    pub ffmpeg_bin: PathBuf,
    /// Extension of camcorder segment files (without the dot, case-sensitive)
    pub segment_extension: String,
    /// Extension of the delivery container (without the dot)
    pub delivery_extension: String,
    /// Frame rate asserted on the concat input to fix its timestamp interpretation
    pub concat_frame_rate: u32,
    /// Video encoder used when re-encoding merged recordings
    pub video_codec: String,
    /// Video encoder used by the per-file MTS conversion
    pub segment_video_codec: String,
    /// Deinterlace filter applied whenever video is re-encoded
    pub deinterlace_filter: String,
    /// Audio encoder, used regardless of quality level
    pub audio_codec: String,
    /// Audio bitrate for merged recordings
    pub audio_bitrate: String,
    /// Kill ffmpeg after this many seconds (None = wait forever)
    pub timeout_secs: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ToolConfig {
    /// Create a default configuration matching what camcorders and ffmpeg expect
    pub fn default_config() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            segment_extension: "MTS".to_string(),
            delivery_extension: "mp4".to_string(),
            concat_frame_rate: 30,
            video_codec: "libx264".to_string(),
            segment_video_codec: "h264".to_string(),
            deinterlace_filter: "yadif=1".to_string(),
            audio_codec: "mp3".to_string(),
            audio_bitrate: "192k".to_string(),
            timeout_secs: None,
        }
    }

    /// Load configuration from a file, or return defaults if path is None or file doesn't exist
    pub fn load_config(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default_config();

        if let Some(config_path) = path {
            if config_path.exists() {
                let content = std::fs::read_to_string(config_path)
                    .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

                // TOML by extension, JSON otherwise
                if config_path.extension().and_then(|s| s.to_str()) == Some("toml") {
                    config = toml::from_str(&content)
                        .with_context(|| format!("Failed to parse TOML config: {}", config_path.display()))?;
                } else {
                    config = serde_json::from_str(&content)
                        .with_context(|| format!("Failed to parse JSON config: {}", config_path.display()))?;
                }
            } else {
                log::warn!("Config file {} not found, using defaults", config_path.display());
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_gives_defaults() {
        let cfg = ToolConfig::load_config(None).unwrap();
        assert_eq!(cfg.segment_extension, "MTS");
        assert_eq!(cfg.delivery_extension, "mp4");
        assert_eq!(cfg.concat_frame_rate, 30);
        assert!(cfg.timeout_secs.is_none());

        let cfg = ToolConfig::load_config(Some(Path::new("/nonexistent/camtools.toml"))).unwrap();
        assert_eq!(cfg.ffmpeg_bin, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camtools.toml");
        std::fs::write(&path, "ffmpeg_bin = \"/opt/ffmpeg/bin/ffmpeg\"\ntimeout_secs = 600\n").unwrap();

        let cfg = ToolConfig::load_config(Some(&path)).unwrap();
        assert_eq!(cfg.ffmpeg_bin, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(cfg.timeout_secs, Some(600));
        assert_eq!(cfg.audio_codec, "mp3");
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camtools.json");
        std::fs::write(&path, r#"{"concat_frame_rate": 25, "video_codec": "libx265"}"#).unwrap();

        let cfg = ToolConfig::load_config(Some(&path)).unwrap();
        assert_eq!(cfg.concat_frame_rate, 25);
        assert_eq!(cfg.video_codec, "libx265");
        assert_eq!(cfg.deinterlace_filter, "yadif=1");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camtools.toml");
        std::fs::write(&path, "concat_frame_rate = \"fast\"").unwrap();

        assert!(ToolConfig::load_config(Some(&path)).is_err());
    }
}
