/*!
 * # clipcap - AI-captioned shorts generator
 *
 * A Rust library for turning long-form video/podcast content into short,
 * captioned clips.
 *
 * ## Features
 *
 * - Parse timestamped cue documents (auto-generated captions) resiliently
 * - Select viral highlight windows with a text-completion provider
 * - Transcribe clip audio to word-level timings (AssemblyAI)
 * - Group words into readable on-screen caption units
 * - Render styled ASS subtitle timelines with per-word highlight sweeps
 * - Drive ffmpeg/ffprobe for clip extraction and subtitle burn-in
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timecode`: Timestamp encoding and decoding
 * - `captions`: The caption core:
 *   - `captions::cue`: Cue document parsing
 *   - `captions::timing`: Word timings and the cue-based fallback estimator
 *   - `captions::grouper`: Greedy caption grouping
 *   - `captions::renderer`: Styled subtitle timeline synthesis
 * - `highlights`: Highlight selection around the completion provider
 * - `providers`: Clients for the external AI collaborators:
 *   - `providers::assemblyai`: AssemblyAI transcription client
 *   - `providers::openai`: OpenAI completion client
 *   - `providers::anthropic`: Anthropic completion client
 *   - `providers::mock`: Mock provider for tests
 * - `media`: ffmpeg/ffprobe invocation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod captions;
pub mod errors;
pub mod file_utils;
pub mod highlights;
pub mod media;
pub mod providers;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, TimingSource};
pub use captions::{
    estimate_word_timings, extract_cues_in_window, group_words, parse_cue_document,
    render_timeline, AssDocument, CaptionGroup, CueSegment, GroupingConfig, HighlightMode,
    RenderConfig, WordTiming,
};
pub use errors::{AppError, CaptionError, ProviderError};
pub use highlights::Highlight;
