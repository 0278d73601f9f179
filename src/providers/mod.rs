/*!
 * Provider implementations for the external AI collaborators.
 *
 * This module contains client implementations for the two provider roles:
 * - Transcription: speech-to-text with word-level timestamps (AssemblyAI)
 * - Completion: chat-style text completion for highlight selection
 *   (OpenAI, Anthropic)
 *
 * A mock provider implements both roles for tests and dry runs.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::captions::timing::WordTiming;
use crate::errors::{CaptionError, ProviderError};

/// One transcribed word with millisecond timing, as services report it
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptWord {
    /// Word text
    pub text: String,

    /// Start time in milliseconds
    pub start_ms: u64,

    /// End time in milliseconds
    pub end_ms: u64,
}

/// A completed transcription result
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Full transcript text
    pub text: String,

    /// Word-level timing records
    pub words: Vec<TranscriptWord>,
}

impl Transcript {
    /// Convert the millisecond word records into seconds-denominated timings.
    ///
    /// This is the unit-normalization boundary: everything downstream of the
    /// providers works in seconds.
    pub fn to_word_timings(&self) -> Result<Vec<WordTiming>, CaptionError> {
        self.words
            .iter()
            .map(|w| {
                WordTiming::new_validated(
                    w.text.clone(),
                    w.start_ms as f64 / 1000.0,
                    w.end_ms as f64 / 1000.0,
                )
            })
            .collect()
    }
}

/// A chat-style completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system prompt
    pub system: Option<String>,

    /// User prompt
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new completion request with default sampling settings
    pub fn new(prompt: impl Into<String>) -> Self {
        CompletionRequest {
            system: None,
            prompt: prompt.into(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max token budget
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Common trait for speech-to-text providers
///
/// Implementations upload the audio artifact, run the service's job to
/// completion and hand back a word-timed transcript.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + Debug {
    /// Transcribe an audio file to a word-timed transcript
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Common trait for text completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Complete a request and return the response text
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod anthropic;
pub mod assemblyai;
pub mod mock;
pub mod openai;
