use crate::captions::cue::CueSegment;
use crate::errors::CaptionError;

// @module: Word-level timing records and the cue-based fallback estimator

// @struct: One word with its spoken interval
#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    // @field: Word text
    pub text: String,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,
}

impl WordTiming {
    /// Creates a new word timing - used by tests and internal producers
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        WordTiming {
            text: text.into(),
            start,
            end,
        }
    }

    // @creates: Validated word timing
    // @validates: Non-negative start and ordered interval
    pub fn new_validated(text: impl Into<String>, start: f64, end: f64) -> Result<Self, CaptionError> {
        let timing = Self::new(text, start, end);
        timing.validate()?;
        Ok(timing)
    }

    /// Check the entity invariants: `start >= 0` and `start <= end`.
    ///
    /// A violation indicates a bug in an upstream producer, not a recoverable
    /// condition, so callers fail fast instead of skipping.
    pub fn validate(&self) -> Result<(), CaptionError> {
        if self.start < 0.0 {
            return Err(CaptionError::NegativeWordStart {
                text: self.text.clone(),
                start: self.start,
            });
        }
        if self.start > self.end {
            return Err(CaptionError::InvalidWordTiming {
                text: self.text.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Word duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Synthesize approximate per-word timings from cue-level timing.
///
/// Each cue's duration is distributed evenly across its whitespace-split
/// words, tiled contiguously from `cue.start - time_offset`. Words whose
/// estimated end falls at or before zero are dropped (they precede the region
/// of interest) and remaining start times are clamped to zero.
///
/// This is a deliberately crude linear model — speech is not evenly paced.
/// Callers needing accuracy should prefer true word-level timing from a
/// transcription provider; this exists only as a fallback when no provider
/// is configured.
pub fn estimate_word_timings(cues: &[CueSegment], time_offset: f64) -> Vec<WordTiming> {
    let mut timings = Vec::new();

    for cue in cues {
        let words: Vec<&str> = cue.text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let cue_duration = cue.duration();
        if cue_duration <= 0.0 {
            continue;
        }

        let per_word = cue_duration / words.len() as f64;
        let adjusted_start = cue.start - time_offset;

        for (index, word) in words.iter().enumerate() {
            let word_start = adjusted_start + index as f64 * per_word;
            let word_end = word_start + per_word;

            if word_end > 0.0 {
                timings.push(WordTiming::new(*word, word_start.max(0.0), word_end));
            }
        }
    }

    timings
}
