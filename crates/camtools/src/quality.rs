use std::fmt;

use clap::ValueEnum;

use crate::error::MediaError;

const LEVEL_COUNT: usize = 6;

/// Named quality levels a merged recording can be delivered at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum QualityLevel {
    /// Copy the video bitstream, re-encode audio only
    Lossless,
    VeryHigh,
    #[default]
    High,
    Medium,
    Low,
    VeryLow,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; LEVEL_COUNT] = [
        QualityLevel::Lossless,
        QualityLevel::VeryHigh,
        QualityLevel::High,
        QualityLevel::Medium,
        QualityLevel::Low,
        QualityLevel::VeryLow,
    ];

    /// Name as it appears on the command line and in output filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Lossless => "lossless",
            QualityLevel::VeryHigh => "very-high",
            QualityLevel::High => "high",
            QualityLevel::Medium => "medium",
            QualityLevel::Low => "low",
            QualityLevel::VeryLow => "very-low",
        }
    }

    /// Position in `ALL`, used to index profile tables
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a quality level resolves to on the encoder side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySetting {
    /// Repackage: video stream copied verbatim
    Lossless,
    /// Re-encode video with the given rate factor and speed preset
    Encode { crf: u8, preset: &'static str },
}

/// Marker that starts every tag written into merge output filenames
pub const OUTPUT_TAG: &str = "_quality=";

/// Built-in level table. Lower CRF = higher fidelity, slower preset = better compression.
const BUILTIN_TABLE: &[(QualityLevel, QualitySetting)] = &[
    (QualityLevel::Lossless, QualitySetting::Lossless),
    (QualityLevel::VeryHigh, QualitySetting::Encode { crf: 18, preset: "slower" }),
    (QualityLevel::High, QualitySetting::Encode { crf: 21, preset: "slow" }),
    (QualityLevel::Medium, QualitySetting::Encode { crf: 23, preset: "medium" }),
    (QualityLevel::Low, QualitySetting::Encode { crf: 26, preset: "fast" }),
    (QualityLevel::VeryLow, QualitySetting::Encode { crf: 30, preset: "veryfast" }),
];

/// Immutable mapping from quality level to encoder setting
#[derive(Debug, Clone, Copy)]
pub struct QualityProfile {
    settings: [QualitySetting; LEVEL_COUNT],
}

impl QualityProfile {
    /// The built-in table, validated
    pub fn builtin() -> Result<Self, MediaError> {
        Self::from_table(BUILTIN_TABLE)
    }

    /// Build a profile after checking that every level has exactly one entry and
    /// that only the lossless level maps to stream copy
    pub fn from_table(table: &[(QualityLevel, QualitySetting)]) -> Result<Self, MediaError> {
        let mut settings = [QualitySetting::Lossless; LEVEL_COUNT];

        for level in QualityLevel::ALL {
            let mut entries = table.iter().filter(|(l, _)| *l == level);
            let (_, setting) = entries.next().ok_or(MediaError::ProfileIncomplete(level))?;
            if entries.next().is_some() {
                return Err(MediaError::ProfileConflict(level));
            }

            let is_copy = matches!(setting, QualitySetting::Lossless);
            if is_copy != (level == QualityLevel::Lossless) {
                return Err(MediaError::ProfileConflict(level));
            }

            settings[level.index()] = *setting;
        }

        Ok(QualityProfile { settings })
    }

    pub fn resolve(&self, level: QualityLevel) -> QualitySetting {
        self.settings[level.index()]
    }

    /// Self-describing filename tag, e.g. `_quality=high_crf=21_preset=slow`
    pub fn file_tag(&self, level: QualityLevel) -> String {
        match self.resolve(level) {
            QualitySetting::Lossless => format!("{}{}", OUTPUT_TAG, level),
            QualitySetting::Encode { crf, preset } => {
                format!("{}{}_crf={}_preset={}", OUTPUT_TAG, level, crf, preset)
            }
        }
    }
}
