pub mod batch;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod naming;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod scan;

#[cfg(test)]
mod testing;

pub use config::ToolConfig;
pub use error::MediaError;
pub use ffmpeg::{CommandBuilder, FFmpegRunner, ToolRunner};
pub use pipeline::{merge_recordings, MergeOutcome, MergeRequest};
pub use quality::{QualityLevel, QualityProfile, QualitySetting};
