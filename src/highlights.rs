use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::captions::cue::CueSegment;
use crate::timecode;

// @module: Viral highlight selection around the completion collaborator

/// Shortest highlight worth clipping, seconds
const MIN_HIGHLIGHT_SECS: f64 = 45.0;

/// Longest highlight worth clipping, seconds
const MAX_HIGHLIGHT_SECS: f64 = 75.0;

/// Marker appended when the transcript is truncated for prompting
const CONTINUATION_MARKER: &str = "\n...[transcript continues]";

// @struct: One selected highlight window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    // @field: Start in the source video, seconds
    pub start: f64,

    // @field: End in the source video, seconds
    pub end: f64,

    // @field: Window length, seconds
    pub duration: f64,

    // @field: Why the collaborator thinks this will perform
    pub summary: String,

    // @field: Opening line, when the collaborator supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
}

/// One candidate entry as the completion collaborator returns it
#[derive(Debug, Deserialize)]
struct HighlightCandidate {
    start_time: String,
    end_time: String,
    summary: String,
    #[serde(default)]
    hook: Option<String>,
}

/// Build the `[MM:SS]`-stamped transcript handed to the completion provider.
///
/// Long transcripts are truncated to `max_chars` with a continuation marker;
/// the collaborator gets a budget, not the whole show.
pub fn build_timestamped_transcript(cues: &[CueSegment], max_chars: usize) -> String {
    let mut transcript = String::new();
    for cue in cues {
        transcript.push('[');
        transcript.push_str(&timecode::format_mmss(cue.start));
        transcript.push_str("] ");
        transcript.push_str(&cue.text);
        transcript.push('\n');
    }

    if transcript.len() > max_chars {
        let cut = floor_char_boundary(&transcript, max_chars);
        transcript.truncate(cut);
        transcript.push_str(CONTINUATION_MARKER);
    }

    transcript
}

/// The prompt asking for highlight windows as a JSON array.
///
/// The contract the parser relies on is the response shape: a JSON array of
/// objects with MM:SS `start_time`/`end_time`, a `summary` and a `hook`.
pub fn highlight_prompt(transcript: &str, count: usize) -> String {
    format!(
        "Find the {count} best continuous ~60-second segments in this transcript \
         that would perform as short-form vertical clips. Favor segments with a \
         strong hook, building tension, and a satisfying payoff.\n\n\
         TRANSCRIPT WITH TIMESTAMPS:\n{transcript}\n\n\
         Each segment must be 55-65 seconds long, ranges must not overlap, and \
         timestamps must come from the transcript. Return ONLY a JSON array of \
         {count} objects shaped like:\n\
         [{{\"start_time\": \"MM:SS\", \"end_time\": \"MM:SS\", \
         \"summary\": \"why this segment\", \"hook\": \"opening line\"}}]"
    )
}

/// Extract highlight windows from a completion response.
///
/// The collaborator's output is untrusted free text: it may wrap the JSON in
/// code fences or chatter around it. Locate the outermost array, parse it
/// leniently, and keep only candidates that decode and land in the accepted
/// duration window. A response with no array at all is an error; a bad entry
/// inside the array is skipped.
pub fn parse_highlight_response(response: &str) -> Result<Vec<Highlight>> {
    let cleaned = response.replace("```json", "").replace("```", "");

    let start = cleaned
        .find('[')
        .ok_or_else(|| anyhow!("No JSON array found in completion response"))?;
    let end = cleaned
        .rfind(']')
        .ok_or_else(|| anyhow!("No JSON array found in completion response"))?;
    if end < start {
        return Err(anyhow!("No JSON array found in completion response"));
    }

    let raw: Vec<serde_json::Value> = serde_json::from_str(&cleaned[start..=end])
        .context("Completion response array is not valid JSON")?;

    let mut highlights = Vec::new();
    for value in raw {
        let candidate: HighlightCandidate = match serde_json::from_value(value) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Skipping malformed highlight entry: {}", e);
                continue;
            }
        };

        let start_secs = match timecode::parse_mmss(&candidate.start_time) {
            Ok(secs) => secs,
            Err(e) => {
                warn!("Skipping highlight with bad start_time: {}", e);
                continue;
            }
        };
        let end_secs = match timecode::parse_mmss(&candidate.end_time) {
            Ok(secs) => secs,
            Err(e) => {
                warn!("Skipping highlight with bad end_time: {}", e);
                continue;
            }
        };

        let duration = end_secs - start_secs;
        if !(MIN_HIGHLIGHT_SECS..=MAX_HIGHLIGHT_SECS).contains(&duration) {
            warn!(
                "Skipping highlight {:?}: duration {:.1}s is not close to 60 seconds",
                candidate.summary, duration
            );
            continue;
        }

        debug!("Accepted {:.1}s highlight: {}", duration, candidate.summary);
        highlights.push(Highlight {
            start: start_secs,
            end: end_secs,
            duration,
            summary: candidate.summary,
            hook: candidate.hook,
        });
    }

    Ok(highlights)
}

/// Load highlights from a JSON file
pub fn load_highlights<P: AsRef<Path>>(path: P) -> Result<Vec<Highlight>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read highlights file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse highlights file: {}", path.display()))
}

/// Write highlights to a JSON file
pub fn save_highlights<P: AsRef<Path>>(path: P, highlights: &[Highlight]) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(highlights)
        .context("Failed to serialize highlights")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write highlights file: {}", path.display()))?;
    Ok(())
}

/// Largest byte index `<= index` that sits on a char boundary
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut cut = index;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}
