// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::app_controller::{Controller, TimingSource};
use crate::captions::renderer::HighlightMode;
use crate::file_utils::FileManager;

mod app_config;
mod app_controller;
mod captions;
mod errors;
mod file_utils;
mod highlights;
mod media;
mod providers;
mod timecode;

/// CLI wrapper for HighlightMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliHighlightMode {
    Plain,
    ColorSweep,
}

impl From<CliHighlightMode> for HighlightMode {
    fn from(mode: CliHighlightMode) -> Self {
        match mode {
            CliHighlightMode::Plain => HighlightMode::Plain,
            CliHighlightMode::ColorSweep => HighlightMode::ColorSweep,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select viral highlight windows from a cue document
    Highlights {
        /// Cue document to analyze
        #[arg(value_name = "CUE_FILE")]
        cues: PathBuf,

        /// Output highlights JSON path (defaults to <workspace>/highlights.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Caption a single clip video
    Caption {
        /// Clip video to caption
        #[arg(value_name = "CLIP")]
        clip: PathBuf,

        /// Cue document for estimated timings instead of transcription
        #[arg(long, requires = "window_start", requires = "window_end")]
        cues: Option<PathBuf>,

        /// Clip window start in the source video, seconds
        #[arg(long)]
        window_start: Option<f64>,

        /// Clip window end in the source video, seconds
        #[arg(long)]
        window_end: Option<f64>,

        /// Render strategy override
        #[arg(short = 'm', long, value_enum)]
        mode: Option<CliHighlightMode>,

        /// Output video path (defaults to <clip>_captions.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the full pipeline: highlights, clip extraction, captioning
    Pipeline {
        /// Source video file
        #[arg(value_name = "VIDEO")]
        video: PathBuf,

        /// Cue document for highlight selection and timing fallback
        #[arg(long)]
        cues: Option<PathBuf>,

        /// Output directory (defaults to <workspace>/shorts)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completions for clipcap
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// clipcap - AI-captioned shorts generator
///
/// Turns long-form video/podcast content into short clips with styled,
/// word-synchronized captions burned in.
#[derive(Parser, Debug)]
#[command(name = "clipcap")]
#[command(version = "0.1.0")]
#[command(about = "AI-captioned shorts generator")]
#[command(long_about = "clipcap selects highlight windows from long-form video, extracts them \
as clips and burns in styled word-synchronized captions.

EXAMPLES:
    clipcap highlights podcast.en.vtt           # Select highlight windows
    clipcap pipeline podcast.mp4 --cues podcast.en.vtt
    clipcap caption clip.mp4                    # Caption via transcription
    clipcap caption clip.mp4 --cues podcast.en.vtt --window-start 120 --window-end 180
    clipcap caption clip.mp4 -m color-sweep     # Per-word highlight sweep
    clipcap completions bash > clipcap.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, defaults are
    used and a template is written for editing.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let options = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &options.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "clipcap", &mut std::io::stdout());
        return Ok(());
    }

    // Load config, falling back to defaults when the file is absent
    let config = if FileManager::file_exists(&options.config_path) {
        Config::from_file(&options.config_path)?
    } else {
        warn!(
            "Config file {} not found, using defaults and writing a template",
            options.config_path
        );
        let config = Config::default();
        if let Err(e) = config.save(&options.config_path) {
            warn!("Could not write config template: {}", e);
        }
        config
    };

    // CLI log level wins over the config file
    let log_level = options
        .log_level
        .map(app_config::LogLevel::from)
        .unwrap_or(config.log_level);
    log::set_max_level(log_level.to_level_filter());

    match options.command {
        Commands::Highlights { cues, output } => {
            let output = output.unwrap_or_else(|| {
                PathBuf::from(&config.workspace_dir).join("highlights.json")
            });

            let controller = Controller::with_config(config)?;
            let found = controller.find_highlights(&cues, &output).await?;

            for (i, highlight) in found.iter().enumerate() {
                info!(
                    "Highlight {}: {} - {} ({:.1}s) {}",
                    i + 1,
                    timecode::format_mmss(highlight.start),
                    timecode::format_mmss(highlight.end),
                    highlight.duration,
                    highlight.summary
                );
            }
        }

        Commands::Caption {
            clip,
            cues,
            window_start,
            window_end,
            mode,
            output,
        } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.caption.highlight_mode = mode.into();
            }

            let timing = match (cues, window_start, window_end) {
                (Some(cue_path), Some(start), Some(end)) => TimingSource::Estimate {
                    cue_path,
                    window_start: start,
                    window_end: end,
                },
                (None, _, _) => TimingSource::Transcribe,
                _ => return Err(anyhow!("--cues requires --window-start and --window-end")),
            };

            let output = output.unwrap_or_else(|| {
                let stem = clip.file_stem().unwrap_or_default().to_string_lossy();
                clip.with_file_name(format!("{}_captions.mp4", stem))
            });

            let controller = Controller::with_config(config)?;
            if controller.caption_clip(&clip, timing, &output).await? {
                info!("Captioned clip written to {:?}", output);
            }
        }

        Commands::Pipeline {
            video,
            cues,
            output_dir,
        } => {
            config.validate_credentials()?;
            let output_dir = output_dir
                .unwrap_or_else(|| PathBuf::from(&config.workspace_dir).join("shorts"));

            let controller = Controller::with_config(config)?;
            controller
                .run_pipeline(&video, cues.as_deref(), &output_dir)
                .await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
