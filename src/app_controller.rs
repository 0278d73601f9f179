use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::{CompletionProvider as CompletionKind, Config, TranscriptionProvider as TranscriptionKind};
use crate::captions::cue;
use crate::captions::grouper::group_words;
use crate::captions::renderer::render_timeline;
use crate::captions::timing::{estimate_word_timings, WordTiming};
use crate::file_utils::FileManager;
use crate::highlights::{self, Highlight};
use crate::media;
use crate::providers::anthropic::Anthropic;
use crate::providers::assemblyai::AssemblyAi;
use crate::providers::mock::MockProvider;
use crate::providers::openai::OpenAi;
use crate::providers::{CompletionProvider, CompletionRequest, TranscriptionProvider};

// @module: Pipeline controller sequencing the external collaborators

/// Clips captioned at the same time during a pipeline run
const MAX_CONCURRENT_CLIPS: usize = 2;

/// Where the word timings for a clip come from
#[derive(Debug, Clone)]
pub enum TimingSource {
    /// Transcribe the clip's own audio with the configured provider
    Transcribe,

    /// Estimate from cue-level timing in a caption document
    Estimate {
        /// Cue document path
        cue_path: PathBuf,
        /// Clip window start in the source video, seconds
        window_start: f64,
        /// Clip window end in the source video, seconds
        window_end: f64,
    },
}

/// Main application controller for the captioning pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with mock providers
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.transcription.provider = TranscriptionKind::Mock;
        config.completion.provider = CompletionKind::Mock;
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Borrow the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the configured transcription provider
    fn transcription_provider(&self) -> Result<Box<dyn TranscriptionProvider>> {
        let cfg = &self.config.transcription;
        match cfg.provider {
            TranscriptionKind::AssemblyAi => {
                if cfg.api_key.is_empty() {
                    return Err(anyhow!("No API key configured for AssemblyAI"));
                }
                Ok(Box::new(AssemblyAi::new(
                    cfg.api_key.clone(),
                    cfg.endpoint.clone(),
                    cfg.language_code.clone(),
                    cfg.poll_interval_secs,
                    cfg.max_poll_attempts,
                )))
            }
            TranscriptionKind::Mock => Ok(Box::new(MockProvider::working())),
        }
    }

    /// Build the configured completion provider
    fn completion_provider(&self) -> Result<Box<dyn CompletionProvider>> {
        let cfg = &self.config.completion;
        match cfg.provider {
            CompletionKind::OpenAi => {
                if cfg.api_key.is_empty() {
                    return Err(anyhow!("No API key configured for OpenAI"));
                }
                Ok(Box::new(OpenAi::new(
                    cfg.api_key.clone(),
                    cfg.endpoint.clone(),
                    cfg.model.clone(),
                )))
            }
            CompletionKind::Anthropic => {
                if cfg.api_key.is_empty() {
                    return Err(anyhow!("No API key configured for Anthropic"));
                }
                Ok(Box::new(Anthropic::new(
                    cfg.api_key.clone(),
                    cfg.endpoint.clone(),
                    cfg.model.clone(),
                )))
            }
            CompletionKind::Mock => Ok(Box::new(MockProvider::working())),
        }
    }

    /// Select highlight windows from a cue document and persist them.
    pub async fn find_highlights(&self, cue_path: &Path, output_path: &Path) -> Result<Vec<Highlight>> {
        let content = FileManager::read_to_string(cue_path)?;
        let cues = cue::parse_cue_document(&content);
        if cues.is_empty() {
            return Err(anyhow!("No usable cues parsed from {}", cue_path.display()));
        }

        let total_secs = cues.last().map_or(0.0, |c| c.end);
        info!(
            "Parsed {} cue segments covering {:.1} minutes",
            cues.len(),
            total_secs / 60.0
        );

        let transcript =
            highlights::build_timestamped_transcript(&cues, self.config.completion.transcript_char_limit);
        let prompt = highlights::highlight_prompt(&transcript, self.config.completion.highlight_count);

        let provider = self.completion_provider()?;
        let request = CompletionRequest::new(prompt)
            .temperature(self.config.completion.temperature)
            .max_tokens(self.config.completion.max_tokens);

        let response = provider
            .complete(request)
            .await
            .context("Completion provider failed during highlight selection")?;

        let found = highlights::parse_highlight_response(&response)?;
        if found.is_empty() {
            return Err(anyhow!("Completion response contained no usable highlights"));
        }

        if let Some(parent) = output_path.parent() {
            FileManager::ensure_dir(parent)?;
        }
        highlights::save_highlights(output_path, &found)?;
        info!("Saved {} highlights to {}", found.len(), output_path.display());

        Ok(found)
    }

    /// Resolve word timings for a clip from the requested source
    async fn resolve_word_timings(
        &self,
        clip_video: &Path,
        timing: &TimingSource,
        clip_duration: f64,
    ) -> Result<Vec<WordTiming>> {
        match timing {
            TimingSource::Transcribe => {
                let provider = self.transcription_provider()?;

                let temp_dir = tempfile::tempdir().context("Failed to create temp directory")?;
                let audio_path = temp_dir.path().join("clip_audio.mp3");

                media::extract_audio_segment(clip_video, 0.0, clip_duration, &audio_path).await?;

                let transcript = provider
                    .transcribe(&audio_path)
                    .await
                    .context("Transcription provider failed")?;

                debug!("Transcription returned {} words", transcript.words.len());
                Ok(transcript.to_word_timings()?)
            }
            TimingSource::Estimate {
                cue_path,
                window_start,
                window_end,
            } => {
                let content = FileManager::read_to_string(cue_path)?;
                let cues = cue::parse_cue_document(&content);
                let window = cue::extract_cues_in_window(&cues, *window_start, *window_end);

                debug!(
                    "Estimating word timings from {} cues in window {:.1}s-{:.1}s",
                    window.len(),
                    window_start,
                    window_end
                );
                Ok(estimate_word_timings(&window, *window_start))
            }
        }
    }

    /// Caption one clip: resolve timings, group, render, burn.
    ///
    /// Returns false when the clip produced no words to caption; the clip is
    /// left as-is and no output is written, which is not an error.
    pub async fn caption_clip(
        &self,
        clip_video: &Path,
        timing: TimingSource,
        output_video: &Path,
    ) -> Result<bool> {
        let video_info = media::probe_video_info(clip_video).await?;
        debug!(
            "Probed {:?}: {}x{} @ {:.2} fps, {:.1}s",
            clip_video, video_info.width, video_info.height, video_info.fps, video_info.duration
        );

        let words = self
            .resolve_word_timings(clip_video, &timing, video_info.duration)
            .await?;
        if words.is_empty() {
            warn!("No words to caption for {:?}, skipping", clip_video);
            return Ok(false);
        }

        let groups = group_words(&words, &self.config.caption.grouping())?;
        info!("Grouped {} words into {} captions", words.len(), groups.len());

        let render_config = self
            .config
            .caption
            .render_for_canvas(video_info.width, video_info.height);
        let document = render_timeline(&groups, &render_config, self.config.caption.highlight_mode)?;

        let subtitle_path = output_video.with_extension("ass");
        FileManager::write_string(&subtitle_path, &document.to_string())?;
        debug!("Wrote subtitle timeline to {:?}", subtitle_path);

        media::burn_subtitles(clip_video, &subtitle_path, output_video).await?;
        info!("Created captioned clip {:?}", output_video);

        Ok(true)
    }

    /// Run the full pipeline: highlights, clip extraction, captioning.
    pub async fn run_pipeline(
        &self,
        video: &Path,
        cue_path: Option<&Path>,
        output_dir: &Path,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !video.exists() {
            return Err(anyhow!("Input video does not exist: {:?}", video));
        }
        FileManager::ensure_dir(output_dir)?;

        let highlights_path = Path::new(&self.config.workspace_dir).join("highlights.json");
        let selected = if FileManager::file_exists(&highlights_path) {
            info!("Loading existing highlights from {}", highlights_path.display());
            highlights::load_highlights(&highlights_path)?
        } else {
            let cue_path = cue_path.ok_or_else(|| {
                anyhow!("No highlights file and no cue document to select highlights from")
            })?;
            self.find_highlights(cue_path, &highlights_path).await?
        };

        if selected.is_empty() {
            return Err(anyhow!("No highlights to process"));
        }
        info!("Processing {} highlights", selected.len());

        let multi_progress = MultiProgress::new();
        let results: Vec<Result<PathBuf>> = stream::iter(
            selected
                .iter()
                .enumerate()
                .map(|(i, highlight)| {
                    self.process_highlight(i + 1, highlight, video, cue_path, output_dir, &multi_progress)
                }),
        )
        .buffer_unordered(MAX_CONCURRENT_CLIPS)
        .collect()
        .await;

        let mut failures = 0;
        for result in &results {
            if let Err(e) = result {
                failures += 1;
                warn!("Highlight failed: {:#}", e);
            }
        }

        let elapsed = start_time.elapsed();
        info!(
            "Pipeline finished in {:.1}s: {} succeeded, {} failed",
            elapsed.as_secs_f64(),
            results.len() - failures,
            failures
        );

        if failures == results.len() {
            return Err(anyhow!("All {} highlights failed", failures));
        }
        Ok(())
    }

    /// Extract and caption one highlight
    async fn process_highlight(
        &self,
        index: usize,
        highlight: &Highlight,
        video: &Path,
        cue_path: Option<&Path>,
        output_dir: &Path,
        multi_progress: &MultiProgress,
    ) -> Result<PathBuf> {
        let progress = multi_progress.add(ProgressBar::new_spinner());
        progress.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(120));
        progress.set_message(format!("Short {}: extracting clip", index));

        let clip_path = FileManager::numbered_path(output_dir, index, "clip", "mp4");
        let output_path = FileManager::numbered_path(output_dir, index, "captions", "mp4");

        let result: Result<PathBuf> = async {
            media::extract_clip(video, highlight.start, highlight.duration, &clip_path).await?;

            // Prefer real word timings; fall back to cue-based estimation when
            // the transcription provider is unusable and cues are available.
            let timing = match (self.transcription_provider(), cue_path) {
                (Ok(_), _) => TimingSource::Transcribe,
                (Err(e), Some(cues)) => {
                    warn!(
                        "Transcription unavailable ({}), estimating timings from {:?}",
                        e, cues
                    );
                    TimingSource::Estimate {
                        cue_path: cues.to_path_buf(),
                        window_start: highlight.start,
                        window_end: highlight.end,
                    }
                }
                (Err(e), None) => return Err(e),
            };

            progress.set_message(format!("Short {}: captioning", index));
            let captioned = self.caption_clip(&clip_path, timing, &output_path).await?;

            Ok(if captioned { output_path.clone() } else { clip_path.clone() })
        }
        .await;

        match &result {
            Ok(path) => progress.finish_with_message(format!("Short {}: done ({:?})", index, path)),
            Err(_) => progress.finish_with_message(format!("Short {}: failed", index)),
        }

        result
    }
}
