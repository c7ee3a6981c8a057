use thiserror::Error;

use crate::quality::QualityLevel;

/// Errors raised by the media tools before or while driving ffmpeg
#[derive(Debug, Error)]
pub enum MediaError {
    /// Output base name carries an extension other than the delivery one
    #[error("Given output filename ({name}) must have extension .{expected} or no extension")]
    InvalidOutputName { name: String, expected: String },

    /// Quality table has no entry for a level
    #[error("quality profile has no entry for level '{0}'")]
    ProfileIncomplete(QualityLevel),

    /// Quality table has a duplicate entry, or maps a non-lossless level to stream copy
    #[error("quality profile entry for level '{0}' is inconsistent")]
    ProfileConflict(QualityLevel),

    /// ffmpeg ran but exited unsuccessfully
    #[error("ffmpeg failed (exit code {exit_code})\nCommand: {command}\nSTDERR:\n{stderr}")]
    ToolFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// ffmpeg exceeded the configured timeout and was killed
    #[error("ffmpeg timed out after {secs} seconds and was killed\nCommand: {command}")]
    ToolTimeout { command: String, secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
