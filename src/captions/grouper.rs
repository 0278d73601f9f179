use crate::captions::timing::WordTiming;
use crate::errors::CaptionError;

// @module: Greedy word grouping into on-screen caption units

/// Sentence- and clause-ending marks that close the group they appear in
const BREAK_PUNCTUATION: [char; 4] = ['.', '!', '?', ','];

/// Tunables for the grouping pass.
///
/// These were process-wide constants in earlier cuts of this tool and drifted
/// between copies; they are explicit configuration now so callers can test in
/// isolation and tune per output format.
#[derive(Debug, Clone)]
pub struct GroupingConfig {
    /// Maximum words per caption group
    pub max_group_size: usize,

    /// Maximum span between a group's first and last word starts, in seconds
    pub max_group_span_secs: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        GroupingConfig {
            max_group_size: 4,
            max_group_span_secs: 3.0,
        }
    }
}

// @struct: A run of consecutive words shown on screen together
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionGroup {
    // @field: Member words in input order
    pub words: Vec<WordTiming>,

    // @field: Space-joined word text
    pub text: String,

    // @field: Start of the first word, seconds
    pub start: f64,

    // @field: End of the last word, seconds
    pub end: f64,
}

impl CaptionGroup {
    /// Build a group from a non-empty word run.
    fn from_words(words: Vec<WordTiming>) -> Self {
        debug_assert!(!words.is_empty());
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let start = words.first().map_or(0.0, |w| w.start);
        let end = words.last().map_or(0.0, |w| w.end);
        CaptionGroup { words, text, start, end }
    }

    /// Group span in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Partition word timings into caption groups.
///
/// Single forward greedy pass. A new group starts when the group in progress
/// is empty, already holds `max_group_size` words, the previous word carried
/// break punctuation, or the incoming word starts more than
/// `max_group_span_secs` after the group's first word.
///
/// Punctuation closes its own group: a word carrying a comma becomes the last
/// word of its group and the following word opens the next one, keeping the
/// mark visually attached to the phrase it ends.
///
/// Empty input yields an empty output. A word violating the timing invariant
/// is a caller contract violation and fails the whole call.
pub fn group_words(words: &[WordTiming], config: &GroupingConfig) -> Result<Vec<CaptionGroup>, CaptionError> {
    let max_size = config.max_group_size.max(1);
    let mut groups = Vec::new();
    let mut current: Vec<WordTiming> = Vec::new();
    let mut break_after_current = false;

    for word in words {
        word.validate()?;

        let span_exceeded = current
            .first()
            .is_some_and(|first| word.start - first.start > config.max_group_span_secs);

        if !current.is_empty() && (current.len() >= max_size || break_after_current || span_exceeded) {
            groups.push(CaptionGroup::from_words(std::mem::take(&mut current)));
        }

        break_after_current = word.text.contains(BREAK_PUNCTUATION);
        current.push(word.clone());
    }

    if !current.is_empty() {
        groups.push(CaptionGroup::from_words(current));
    }

    Ok(groups)
}
