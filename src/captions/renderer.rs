use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::captions::grouper::CaptionGroup;
use crate::errors::CaptionError;
use crate::timecode;

// @module: Styled subtitle timeline synthesis (ASS)

// @const: Inline override blocks, which the escape cleanup must not touch
static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^}]*\}").unwrap()
});

/// How caption groups are rendered into timeline events.
///
/// The target format has no native "animate one word" primitive, so the sweep
/// strategy layers a static baseline under a sequence of near-duplicate
/// overlay lines instead of mutating text in place. New highlight strategies
/// (e.g. a bounding box) become new variants here without touching grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    /// One event per group, no per-word treatment
    #[default]
    Plain,

    /// Static baseline plus one color-override overlay event per word
    ColorSweep,
}

// @struct: Canvas and style settings for the rendered document
#[derive(Debug, Clone)]
pub struct RenderConfig {
    // @field: Canvas width
    pub play_res_x: u32,

    // @field: Canvas height
    pub play_res_y: u32,

    // @field: Font name
    pub font_name: String,

    // @field: Font size; derived from canvas height when unset
    pub font_size: Option<u32>,

    // @field: Default text colour (AABBGGRR)
    pub primary_colour: String,

    // @field: Sweep highlight colour (AABBGGRR)
    pub highlight_colour: String,

    // @field: Outline colour (AABBGGRR)
    pub outline_colour: String,

    // @field: Box/shadow colour (AABBGGRR)
    pub back_colour: String,

    // @field: Bold flag
    pub bold: bool,

    // @field: Outline width
    pub outline: u32,

    // @field: Shadow depth
    pub shadow: u32,

    // @field: Numpad-style alignment
    pub alignment: u32,

    // @field: Left/right/vertical margins
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            play_res_x: 720,
            play_res_y: 1280,
            font_name: "Arial".to_string(),
            font_size: None,
            primary_colour: "&H00FFFFFF".to_string(),
            highlight_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H80000000".to_string(),
            bold: false,
            outline: 2,
            shadow: 1,
            alignment: 2,
            margin_l: 30,
            margin_r: 30,
            margin_v: 80,
        }
    }
}

impl RenderConfig {
    /// Config sized to a probed video canvas.
    pub fn for_canvas(width: u32, height: u32) -> Self {
        RenderConfig {
            play_res_x: width,
            play_res_y: height,
            ..Default::default()
        }
    }

    /// Font size to emit, falling back to a height-proportional default.
    pub fn effective_font_size(&self) -> u32 {
        self.font_size.unwrap_or_else(|| (self.play_res_y / 12).max(1))
    }
}

// @struct: One timed render event
#[derive(Debug, Clone, PartialEq)]
pub struct AssEvent {
    // @field: Layer number; overlays sit above the baseline
    pub layer: u32,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Markup text
    pub text: String,
}

/// A complete styled subtitle document: header plus ordered timed events.
#[derive(Debug, Clone)]
pub struct AssDocument {
    /// Style settings baked into the header
    pub config: RenderConfig,

    /// Ordered render events
    pub events: Vec<AssEvent>,
}

impl fmt::Display for AssDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "[Script Info]")?;
        writeln!(f, "Title: clipcap word captions")?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "PlayResX: {}", c.play_res_x)?;
        writeln!(f, "PlayResY: {}", c.play_res_y)?;
        writeln!(f, "WrapStyle: 1")?;
        writeln!(f)?;
        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding")?;
        writeln!(
            f,
            "Style: Default,{},{},{},{},{},{},{},0,0,0,100,100,0,0,1,{},{},{},{},{},{},1",
            c.font_name,
            c.effective_font_size(),
            c.primary_colour,
            c.highlight_colour,
            c.outline_colour,
            c.back_colour,
            if c.bold { 1 } else { 0 },
            c.outline,
            c.shadow,
            c.alignment,
            c.margin_l,
            c.margin_r,
            c.margin_v,
        )?;
        writeln!(f)?;
        writeln!(f, "[Events]")?;
        writeln!(f, "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text")?;
        for event in &self.events {
            let start = timecode::seconds_to_ass(event.start).map_err(|_| fmt::Error)?;
            let end = timecode::seconds_to_ass(event.end).map_err(|_| fmt::Error)?;
            writeln!(
                f,
                "Dialogue: {},{},{},Default,,0,0,0,,{}",
                event.layer, start, end, event.text
            )?;
        }
        Ok(())
    }
}

/// Render caption groups into a styled subtitle document.
///
/// In `Plain` mode every group becomes one layer-0 event. In `ColorSweep`
/// mode each group gets a layer-0 baseline spanning its full interval plus
/// one layer-1 event per word, spanning exactly that word's interval, with
/// the word wrapped in a colour override. Baseline and overlays are
/// intentionally overlaid, not merged.
pub fn render_timeline(
    groups: &[CaptionGroup],
    config: &RenderConfig,
    mode: HighlightMode,
) -> Result<AssDocument, CaptionError> {
    let mut events = Vec::new();

    for group in groups {
        // Event times must survive the codec; reject bad groups up front
        timecode::seconds_to_ass(group.start)?;
        timecode::seconds_to_ass(group.end)?;

        match mode {
            HighlightMode::Plain => {
                events.push(AssEvent {
                    layer: 0,
                    start: group.start,
                    end: group.end,
                    text: escape_event_text(&baseline_text(group)),
                });
            }
            HighlightMode::ColorSweep => {
                events.push(AssEvent {
                    layer: 0,
                    start: group.start,
                    end: group.end,
                    text: escape_event_text(&baseline_text(group)),
                });

                let highlight = inline_colour(&config.highlight_colour);
                let primary = inline_colour(&config.primary_colour);

                for (index, word) in group.words.iter().enumerate() {
                    timecode::seconds_to_ass(word.start)?;
                    timecode::seconds_to_ass(word.end)?;

                    let line = group
                        .words
                        .iter()
                        .enumerate()
                        .map(|(j, w)| {
                            let upper = w.text.to_uppercase();
                            if j == index {
                                format!("{{\\c{}}}{}{{\\c{}}}", highlight, upper, primary)
                            } else {
                                upper
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" ");

                    events.push(AssEvent {
                        layer: 1,
                        start: word.start,
                        end: word.end,
                        text: escape_event_text(&line),
                    });
                }
            }
        }
    }

    Ok(AssDocument {
        config: config.clone(),
        events,
    })
}

/// Upper-cased, space-joined group line
fn baseline_text(group: &CaptionGroup) -> String {
    group
        .words
        .iter()
        .map(|w| w.text.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a style colour (AABBGGRR) to its inline override form (&HBBGGRR&).
fn inline_colour(colour: &str) -> String {
    let hex = colour.trim_start_matches("&H").trim_end_matches('&');
    let stripped = if hex.len() > 6 { &hex[hex.len() - 6..] } else { hex };
    format!("&H{}&", stripped)
}

/// Escape event text for the Dialogue line.
///
/// Commas are escaped naively across the whole line, then a cleanup pass
/// removes the stray backslashes that naive escaping leaves behind in word
/// text. The cleanup splits on override blocks and only touches the plain
/// spans between them; backslashes inside `{...}` carry override tags and
/// must pass through untouched.
fn escape_event_text(text: &str) -> String {
    let escaped = text.replace(',', "\\,");
    clean_outside_overrides(&escaped)
}

/// Apply the stray-backslash cleanup to non-override spans only.
fn clean_outside_overrides(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;

    for block in OVERRIDE_BLOCK_REGEX.find_iter(line) {
        out.push_str(&clean_stray_backslashes(&line[last..block.start()]));
        out.push_str(block.as_str());
        last = block.end();
    }
    out.push_str(&clean_stray_backslashes(&line[last..]));

    out
}

/// Keep exactly one backslash before each comma; drop every other backslash.
fn clean_stray_backslashes(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    let mut chars = span.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            while matches!(chars.peek(), Some('\\')) {
                chars.next();
            }
            if matches!(chars.peek(), Some(',')) {
                out.push('\\');
            }
        } else {
            out.push(c);
        }
    }

    out
}
