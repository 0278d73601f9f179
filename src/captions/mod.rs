/*!
 * Caption segmentation and subtitle timeline synthesis.
 *
 * This is the core engine of clipcap, organized in four stages:
 * - `cue`: parsing timestamped cue documents into `CueSegment`s
 * - `timing`: word-level timing records and the cue-based fallback estimator
 * - `grouper`: partitioning word timings into readable on-screen groups
 * - `renderer`: turning caption groups into a styled ASS subtitle document
 *
 * Every stage is a pure function from input sequence to output sequence with
 * no I/O of its own; callers feed in documents and word lists and write the
 * rendered output wherever they need it.
 */

pub mod cue;
pub mod grouper;
pub mod renderer;
pub mod timing;

pub use cue::{extract_cues_in_window, parse_cue_document, CueSegment};
pub use grouper::{group_words, CaptionGroup, GroupingConfig};
pub use renderer::{render_timeline, AssDocument, AssEvent, HighlightMode, RenderConfig};
pub use timing::{estimate_word_timings, WordTiming};
