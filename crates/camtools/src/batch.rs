use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::info;

use crate::config::ToolConfig;
use crate::ffmpeg::{CommandBuilder, ToolRunner};
use crate::scan::{self, MediaFile};

/// One file converted by a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub source: PathBuf,
    pub target: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing matched; ffmpeg was not run
    NothingToDo,
    Converted(Vec<Conversion>),
}

/// Convert every segment file in `dir` into a delivery file with the same basename
pub async fn convert_segments<R: ToolRunner>(
    runner: &R,
    cfg: &ToolConfig,
    dir: &Path,
) -> Result<BatchOutcome> {
    let files = scan::discover_segments(dir, &cfg.segment_extension)
        .context("Failed to list segment files")?;
    let builder = CommandBuilder::new(cfg);

    convert_each(runner, dir, &files, &cfg.delivery_extension, |input, output| {
        builder.build_segment_convert_command(input, output)
    })
    .await
}

/// Convert every WAV recording in `dir` into an MP3 with the same basename
pub async fn convert_wav_files<R: ToolRunner>(
    runner: &R,
    cfg: &ToolConfig,
    dir: &Path,
) -> Result<BatchOutcome> {
    let suffixes = vec![".WAV".to_string(), ".wav".to_string()];
    let files = scan::discover(dir, &suffixes).context("Failed to list WAV files")?;
    let builder = CommandBuilder::new(cfg);

    convert_each(runner, dir, &files, "mp3", |input, output| {
        builder.build_audio_convert_command(input, output)
    })
    .await
}

async fn convert_each<R, F>(
    runner: &R,
    dir: &Path,
    files: &[MediaFile],
    target_extension: &str,
    build: F,
) -> Result<BatchOutcome>
where
    R: ToolRunner,
    F: Fn(&Path, &Path) -> Vec<String>,
{
    if files.is_empty() {
        info!("No matching files in {}, nothing to convert", dir.display());
        return Ok(BatchOutcome::NothingToDo);
    }

    let mut done = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        let target = dir.join(format!("{}.{}", file.stem(), target_extension));
        info!("[{}/{}] Converting {} to {}", i + 1, files.len(), file.name, target.display());

        let args = build(&file.path, &target);
        runner.run(&args).await
            .with_context(|| format!("Failed to convert {}", file.path.display()))?;

        done.push(Conversion {
            source: file.path.clone(),
            target,
        });
    }

    info!("Converted {} file(s)", done.len());
    Ok(BatchOutcome::Converted(done))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRunner;

    fn setup(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"data").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_convert_segments_one_command_per_file() {
        let dir = setup(&["00001.MTS", "00000.MTS", "beach walk.MTS", "x.mp4"]);
        let cfg = ToolConfig::default();
        let runner = RecordingRunner::default();

        let outcome = convert_segments(&runner, &cfg, dir.path()).await.unwrap();
        let conversions = match outcome {
            BatchOutcome::Converted(c) => c,
            BatchOutcome::NothingToDo => panic!("expected conversions"),
        };

        let targets: Vec<_> = conversions.iter().map(|c| c.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                dir.path().join("00000.mp4"),
                dir.path().join("00001.mp4"),
                dir.path().join("beach walk.mp4"),
            ]
        );

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2][1], dir.path().join("beach walk.MTS").display().to_string());
        assert!(calls.iter().all(|c| c.windows(2).any(|w| w[0] == "-vf" && w[1] == "yadif=1")));
    }

    #[tokio::test]
    async fn test_convert_segments_skips_merge_outputs() {
        let dir = setup(&["00000.MTS", "combined_quality=high_crf=21_preset=slow.MTS"]);
        let cfg = ToolConfig::default();
        let runner = RecordingRunner::default();

        let outcome = convert_segments(&runner, &cfg, dir.path()).await.unwrap();
        assert_eq!(
            outcome,
            BatchOutcome::Converted(vec![Conversion {
                source: dir.path().join("00000.MTS"),
                target: dir.path().join("00000.mp4"),
            }])
        );
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_convert_wav_matches_both_cases() {
        let dir = setup(&["b.wav", "A.WAV", "c.Wav", "d.mp3"]);
        let cfg = ToolConfig::default();
        let runner = RecordingRunner::default();

        let outcome = convert_wav_files(&runner, &cfg, dir.path()).await.unwrap();
        match outcome {
            BatchOutcome::Converted(c) => {
                assert_eq!(c.len(), 2);
                assert_eq!(c[0].target, dir.path().join("A.mp3"));
                assert_eq!(c[1].target, dir.path().join("b.mp3"));
            }
            BatchOutcome::NothingToDo => panic!("expected conversions"),
        }
        assert!(runner.calls().iter().all(|c| c.windows(2).any(|w| w[0] == "-c:a" && w[1] == "mp3")));
    }

    #[tokio::test]
    async fn test_empty_directory_is_nothing_to_do() {
        let dir = setup(&["notes.txt"]);
        let cfg = ToolConfig::default();
        let runner = RecordingRunner::default();

        assert_eq!(convert_segments(&runner, &cfg, dir.path()).await.unwrap(), BatchOutcome::NothingToDo);
        assert_eq!(convert_wav_files(&runner, &cfg, dir.path()).await.unwrap(), BatchOutcome::NothingToDo);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_stops_the_batch() {
        let dir = setup(&["00000.MTS", "00001.MTS", "00002.MTS"]);
        let cfg = ToolConfig::default();
        let runner = RecordingRunner::failing_at(1);

        let err = convert_segments(&runner, &cfg, dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("00001.MTS"));
        assert_eq!(runner.calls().len(), 2);
    }
}
