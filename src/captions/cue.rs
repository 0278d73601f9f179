use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::timecode;

// @module: Cue document parsing

// @const: Inline markup tags (voice tags, styling tags)
static MARKUP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").unwrap()
});

// @const: Runs of whitespace inside cue text
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// Range delimiter on a cue timestamp line
const CUE_RANGE_DELIMITER: &str = "-->";

// @struct: One parsed timed caption block
#[derive(Debug, Clone, PartialEq)]
pub struct CueSegment {
    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Cue text with markup stripped
    pub text: String,
}

impl CueSegment {
    /// Cue duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Parse a cue document into an ordered list of segments.
///
/// The scanner walks lines and only reacts to timestamp-range lines, so
/// headers (`WEBVTT`), `NOTE` comments, blank lines and numeric cue-index
/// lines fall through without special casing. Each bad cue is skipped on its
/// own; one malformed block never aborts the rest of the document, since
/// these files are third-party or auto-generated input.
pub fn parse_cue_document(content: &str) -> Vec<CueSegment> {
    let lines: Vec<&str> = content.lines().collect();
    let mut cues = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if !line.contains(CUE_RANGE_DELIMITER) {
            i += 1;
            continue;
        }

        // Collect the text block belonging to this cue regardless of whether
        // the timestamps parse, so a bad cue consumes its own lines.
        let mut text_lines: Vec<String> = Vec::new();
        let mut j = i + 1;
        while j < lines.len() {
            let text_line = lines[j].trim();
            if text_line.is_empty() || text_line.contains(CUE_RANGE_DELIMITER) {
                break;
            }
            // Stray sequence numbers inside a block are index lines, not text
            if !is_numeric_line(text_line) {
                let cleaned = strip_markup(text_line);
                if !cleaned.is_empty() {
                    text_lines.push(cleaned);
                }
            }
            j += 1;
        }

        match parse_range_line(line) {
            Ok((start, end)) => {
                let text = text_lines.join(" ");
                if text.is_empty() {
                    debug!("Dropping cue at {}s with empty text after markup stripping", start);
                } else if end <= start {
                    debug!("Dropping zero-duration cue at {}s", start);
                } else {
                    cues.push(CueSegment { start, end, text });
                }
            }
            Err(e) => {
                warn!("Skipping cue with malformed timestamp line {:?}: {}", line, e);
            }
        }

        i = j;
    }

    cues
}

/// Select cues whose interval intersects the window, preserving order.
///
/// Intersection is strict on both ends: a cue that only touches the window
/// boundary is excluded.
pub fn extract_cues_in_window(cues: &[CueSegment], window_start: f64, window_end: f64) -> Vec<CueSegment> {
    cues.iter()
        .filter(|cue| cue.start < window_end && cue.end > window_start)
        .cloned()
        .collect()
}

/// Concatenate cue text into one transcript string.
pub fn cues_to_text(cues: &[CueSegment]) -> String {
    cues.iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Split a range line into decoded start and end seconds.
///
/// Trailing cue settings after the end timestamp (position, alignment) are
/// ignored — auto-generated documents append them to the range line.
fn parse_range_line(line: &str) -> Result<(f64, f64), crate::errors::CaptionError> {
    let mut parts = line.splitn(2, CUE_RANGE_DELIMITER);
    let start_text = parts.next().unwrap_or_default().trim();
    let end_text = parts.next().unwrap_or_default().trim();
    let end_text = end_text.split_whitespace().next().unwrap_or_default();

    let start = timecode::parse_cue_timestamp(start_text)?;
    let end = timecode::parse_cue_timestamp(end_text)?;
    Ok((start, end))
}

/// True for pure-numeric cue-index lines
fn is_numeric_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

/// Strip inline markup tags and entities, collapsing internal whitespace.
fn strip_markup(text: &str) -> String {
    let without_tags = MARKUP_TAG_REGEX.replace_all(text, "");
    let without_entities = without_tags.replace("&nbsp;", " ");
    WHITESPACE_REGEX.replace_all(without_entities.trim(), " ").to_string()
}
