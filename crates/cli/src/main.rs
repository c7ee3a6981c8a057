use anyhow::{Context, Result};
use camtools::{
    batch::{self, BatchOutcome},
    cleanup,
    config::ToolConfig,
    ffmpeg::FFmpegRunner,
    pipeline::{self, MergeOutcome, MergeRequest},
    quality::{QualityLevel, QualityProfile},
};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};

/// Merge, convert and tidy up camcorder and recorder files with ffmpeg
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (JSON or TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge all MTS segments in the current directory into one file and transcode it
    Merge {
        /// Base name for the output files (no extension, or .mp4)
        #[arg(short, long, default_value = pipeline::DEFAULT_BASE_NAME)]
        output: String,

        /// Quality level for the transcode
        #[arg(short, long, value_enum, default_value_t = QualityLevel::High)]
        quality: QualityLevel,
    },

    /// Convert each MTS file in the current directory to an MP4 with the same basename
    ConvertVideo,

    /// Convert each WAV file in the current directory to an MP3 with the same basename
    ConvertAudio,

    /// Find WAV files that already have an MP3 next to them
    CleanWav {
        /// Directory to search recursively (default: ~/Music/SelfMade)
        root: Option<PathBuf>,

        /// Remove the WAV files instead of only listing them
        #[arg(long)]
        delete: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins unless --verbose is given
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.format_timestamp_secs().init();

    let cfg = ToolConfig::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    let profile = QualityProfile::builtin().context("Invalid built-in quality profile")?;

    info!("ffmpeg binary: {}", cfg.ffmpeg_bin.display());

    let runner = FFmpegRunner::new(&cfg);
    let cwd = Path::new(".");

    match args.command {
        Commands::Merge { output, quality } => {
            let request = MergeRequest { base_name: output, quality };
            match pipeline::merge_recordings(&runner, &cfg, &profile, cwd, &request).await? {
                MergeOutcome::NothingToDo => {
                    info!("Nothing to do");
                }
                MergeOutcome::Completed(report) => {
                    info!(
                        "Merged {} segment(s) into {} and {}",
                        report.segments.len(),
                        report.names.intermediate.display(),
                        report.names.delivery.display()
                    );
                }
            }
        }
        Commands::ConvertVideo => {
            let outcome = batch::convert_segments(&runner, &cfg, cwd).await?;
            log_batch(outcome);
        }
        Commands::ConvertAudio => {
            let outcome = batch::convert_wav_files(&runner, &cfg, cwd).await?;
            log_batch(outcome);
        }
        Commands::CleanWav { root, delete } => {
            let root = match root {
                Some(r) => r,
                None => cleanup::default_cleanup_root()
                    .context("HOME is not set; pass the directory to search")?,
            };
            let report = cleanup::clean_converted_wavs(&root, delete)?;
            info!(
                "{} converted WAV file(s) found, {} removed",
                report.converted.len(),
                report.removed
            );
        }
    }

    Ok(())
}

fn log_batch(outcome: BatchOutcome) {
    match outcome {
        BatchOutcome::NothingToDo => info!("Nothing to do"),
        BatchOutcome::Converted(done) => {
            for c in &done {
                info!("  {} -> {}", c.source.display(), c.target.display());
            }
        }
    }
}
