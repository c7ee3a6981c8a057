use std::path::Path;
use std::time::{Duration, Instant};
use anyhow::{Context, Result};
use log::info;

use crate::config::ToolConfig;
use crate::ffmpeg::{CommandBuilder, ToolRunner};
use crate::naming::OutputNames;
use crate::quality::{QualityLevel, QualityProfile};
use crate::report;
use crate::scan::{self, MediaFile};

/// Default base name for merged recordings
pub const DEFAULT_BASE_NAME: &str = "combined";

/// What the caller asked the merge to produce
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub base_name: String,
    pub quality: QualityLevel,
}

impl Default for MergeRequest {
    fn default() -> Self {
        MergeRequest {
            base_name: DEFAULT_BASE_NAME.to_string(),
            quality: QualityLevel::default(),
        }
    }
}

/// Summary of a completed merge
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub names: OutputNames,
    pub segments: Vec<MediaFile>,
    pub transcode_elapsed: Duration,
    pub delivery_bytes: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// No segment files in the working directory; ffmpeg was not run
    NothingToDo,
    Completed(MergeReport),
}

/// Merge every segment file in `dir` into one recording and transcode it.
///
/// Runs two ffmpeg invocations back to back: a stream-copy concatenation into
/// the intermediate file, then the transcode into the delivery file. A failed
/// concatenation stops the run before the transcode starts.
pub async fn merge_recordings<R: ToolRunner>(
    runner: &R,
    cfg: &ToolConfig,
    profile: &QualityProfile,
    dir: &Path,
    request: &MergeRequest,
) -> Result<MergeOutcome> {
    // Reject a bad output name before touching the filesystem
    let names = OutputNames::derive(dir, &request.base_name, request.quality, profile, cfg)?;
    info!(
        "Output files: {} and {}",
        names.intermediate.display(),
        names.delivery.display()
    );

    // Earlier merge outputs share the segment extension; never feed them back in
    let segments = scan::discover_segments(dir, &cfg.segment_extension)
        .context("Failed to list segment files")?;
    let segments = scan::concat_safe(segments);
    if segments.is_empty() {
        info!("No .{} files found in {}, nothing to merge", cfg.segment_extension, dir.display());
        return Ok(MergeOutcome::NothingToDo);
    }

    let builder = CommandBuilder::new(cfg);

    let concat_args = builder.build_concat_command(&segments, &names.intermediate);
    runner.run(&concat_args).await
        .with_context(|| format!("Failed to merge segments into {}", names.intermediate.display()))?;

    let segment_names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
    info!("Done merging {:?} into {}", segment_names, names.intermediate.display());

    let setting = profile.resolve(request.quality);
    info!("Converting to {} (quality {}: {:?})", names.delivery.display(), request.quality, setting);

    let transcode_args = builder.build_transcode_command(&names.intermediate, &names.delivery, setting);
    let started = Instant::now();
    runner.run(&transcode_args).await
        .with_context(|| format!("Failed to transcode {}", names.intermediate.display()))?;
    let transcode_elapsed = started.elapsed();

    let delivery_size = report::file_size(&names.delivery);
    match &delivery_size {
        Some((_, human)) => info!(
            "Transcode finished in {}: {} ({})",
            report::format_duration(transcode_elapsed),
            names.delivery.display(),
            human
        ),
        None => info!(
            "Transcode finished in {}: {}",
            report::format_duration(transcode_elapsed),
            names.delivery.display()
        ),
    }

    Ok(MergeOutcome::Completed(MergeReport {
        names,
        segments,
        transcode_elapsed,
        delivery_bytes: delivery_size.map(|(bytes, _)| bytes),
    }))
}
