/*!
 * Mock provider implementations for testing.
 *
 * The mock implements both provider roles so tests and dry runs can exercise
 * the pipeline without network access:
 * - `MockProvider::working()` - succeeds with canned data
 * - `MockProvider::failing()` - always fails with an error
 * - `MockProvider::slow(ms)` - succeeds after a delay (for timeout testing)
 */

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{
    CompletionProvider, CompletionRequest, Transcript, TranscriptWord, TranscriptionProvider,
};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with canned data
    Working,
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider implementing both transcription and completion roles
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Canned transcript returned by transcribe()
    transcript: Transcript,
    /// Canned text returned by complete()
    completion_text: String,
    /// Number of calls served, for assertion in tests
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            transcript: default_transcript(),
            completion_text: String::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a slow mock provider for timeout testing
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Replace the canned transcript
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    /// Replace the canned completion text
    pub fn with_completion_text(mut self, text: impl Into<String>) -> Self {
        self.completion_text = text.into();
        self
    }

    /// Number of calls served so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, for assertions after a move
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    async fn run_behavior(&self) -> Result<(), ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Working => Ok(()),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "Mock provider set to failing".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl TranscriptionProvider for MockProvider {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcript, ProviderError> {
        self.run_behavior().await?;
        Ok(self.transcript.clone())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.run_behavior().await
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        self.run_behavior().await?;
        Ok(self.completion_text.clone())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.run_behavior().await
    }
}

/// Canned transcript used when none is supplied
fn default_transcript() -> Transcript {
    let words = [
        ("This", 0_u64, 250_u64),
        ("is", 250, 400),
        ("a", 400, 500),
        ("mock", 500, 900),
        ("transcript.", 900, 1400),
    ];

    Transcript {
        text: "This is a mock transcript.".to_string(),
        words: words
            .iter()
            .map(|(text, start_ms, end_ms)| TranscriptWord {
                text: text.to_string(),
                start_ms: *start_ms,
                end_ms: *end_ms,
            })
            .collect(),
    }
}
