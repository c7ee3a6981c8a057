use std::path::{Path, PathBuf};
use std::process::Stdio;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::config::ToolConfig;
use crate::error::MediaError;
use crate::quality::QualitySetting;
use crate::scan::MediaFile;

/// Something that can run ffmpeg with an argument list and wait for it.
///
/// Implementations must return an error for a non-zero exit status.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    async fn run(&self, args: &[String]) -> Result<()>;
}

/// Runs the real ffmpeg binary as a child process
pub struct FFmpegRunner {
    pub ffmpeg_bin: PathBuf,
    pub timeout_secs: Option<u64>,
}

impl FFmpegRunner {
    pub fn new(cfg: &ToolConfig) -> Self {
        FFmpegRunner {
            ffmpeg_bin: cfg.ffmpeg_bin.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }

    /// Command line as it would be typed, for logs and error messages
    pub fn describe(&self, args: &[String]) -> String {
        describe_command(&self.ffmpeg_bin, args)
    }
}

/// Render a command line, single-quoting arguments that contain whitespace
/// or quotes so one argument never reads as two
pub fn describe_command(bin: &Path, args: &[String]) -> String {
    let mut line = quote_arg(&bin.to_string_lossy());
    for arg in args {
        line.push(' ');
        line.push_str(&quote_arg(arg));
    }
    line
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if !arg.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\\''"))
}

impl ToolRunner for FFmpegRunner {
    async fn run(&self, args: &[String]) -> Result<()> {
        let cmd_str = self.describe(args);
        info!("Running: {}", cmd_str);

        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn()
            .with_context(|| format!(
                "Failed to spawn ffmpeg at: {}. Ensure ffmpeg is installed and accessible.",
                self.ffmpeg_bin.display()
            ))?;

        let stderr = child.stderr.take()
            .ok_or_else(|| anyhow!("Failed to capture ffmpeg stderr"))?;

        // ffmpeg reports progress on stderr
        let stderr_handle = tokio::spawn(async move {
            let mut lines = Vec::new();
            let mut line_stream = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = line_stream.next_line().await {
                debug!("ffmpeg: {}", line);
                lines.push(line);
            }
            lines.join("\n")
        });

        let status = if let Some(secs) = self.timeout_secs {
            match timeout(Duration::from_secs(secs), child.wait()).await {
                Ok(result) => result.context("Failed to wait for ffmpeg process")?,
                Err(_) => {
                    child.kill().await.context("Failed to kill stuck ffmpeg process")?;
                    return Err(MediaError::ToolTimeout { command: cmd_str, secs }.into());
                }
            }
        } else {
            child.wait().await.context("Failed to wait for ffmpeg process")?
        };

        let stderr = stderr_handle.await.context("Failed to read ffmpeg stderr")?;

        if !status.success() {
            return Err(MediaError::ToolFailed {
                command: cmd_str,
                exit_code: status.code().unwrap_or(-1),
                stderr,
            }
            .into());
        }

        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Builds ffmpeg argument lists. Filenames always travel as single arguments.
pub struct CommandBuilder<'a> {
    cfg: &'a ToolConfig,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(cfg: &'a ToolConfig) -> Self {
        CommandBuilder { cfg }
    }

    /// Join segments losslessly with the concat protocol.
    ///
    /// The input frame rate is forced because the concat protocol otherwise
    /// misreads camcorder timestamps and plays back too fast.
    pub fn build_concat_command(&self, segments: &[MediaFile], output: &Path) -> Vec<String> {
        let joined = segments
            .iter()
            .map(|s| path_arg(&s.path))
            .collect::<Vec<_>>()
            .join("|");

        vec![
            "-r".to_string(),
            self.cfg.concat_frame_rate.to_string(),
            "-i".to_string(),
            format!("concat:{}", joined),
            "-c".to_string(),
            "copy".to_string(),
            "-y".to_string(),
            path_arg(output),
        ]
    }

    /// Transcode the merged file at the resolved quality setting
    pub fn build_transcode_command(
        &self,
        input: &Path,
        output: &Path,
        setting: QualitySetting,
    ) -> Vec<String> {
        let mut args = vec!["-i".to_string(), path_arg(input)];

        match setting {
            QualitySetting::Lossless => {
                args.push("-c:v".to_string());
                args.push("copy".to_string());
            }
            QualitySetting::Encode { crf, preset } => {
                // Deinterlace before encoding
                args.push("-vf".to_string());
                args.push(self.cfg.deinterlace_filter.clone());
                args.push("-c:v".to_string());
                args.push(self.cfg.video_codec.clone());
                args.push("-crf".to_string());
                args.push(crf.to_string());
                args.push("-preset".to_string());
                args.push(preset.to_string());
            }
        }

        args.push("-c:a".to_string());
        args.push(self.cfg.audio_codec.clone());
        args.push("-b:a".to_string());
        args.push(self.cfg.audio_bitrate.clone());
        args.push("-y".to_string());
        args.push(path_arg(output));

        args
    }

    /// Convert one segment file to the delivery container
    pub fn build_segment_convert_command(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            path_arg(input),
            "-vf".to_string(),
            self.cfg.deinterlace_filter.clone(),
            "-c:v".to_string(),
            self.cfg.segment_video_codec.clone(),
            "-c:a".to_string(),
            self.cfg.audio_codec.clone(),
            "-y".to_string(),
            path_arg(output),
        ]
    }

    /// Convert one WAV recording to MP3
    pub fn build_audio_convert_command(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            path_arg(input),
            "-c:a".to_string(),
            "mp3".to_string(),
            "-y".to_string(),
            path_arg(output),
        ]
    }
}
