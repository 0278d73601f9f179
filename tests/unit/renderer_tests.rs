/*!
 * Tests for the subtitle timeline renderer
 */

use clipcap::captions::grouper::{group_words, GroupingConfig};
use clipcap::captions::renderer::{render_timeline, HighlightMode, RenderConfig};

use crate::common::{word, word_run};

fn groups_from(words: &[clipcap::captions::timing::WordTiming]) -> Vec<clipcap::captions::grouper::CaptionGroup> {
    group_words(words, &GroupingConfig::default()).unwrap()
}

/// Test the one-word sweep group: exactly a baseline and one overlay
#[test]
fn test_render_timeline_withOneWordSweep_shouldEmitTwoEvents() {
    let groups = groups_from(&[word("Hi", 0.0, 0.5)]);
    let document = render_timeline(&groups, &RenderConfig::default(), HighlightMode::ColorSweep).unwrap();

    assert_eq!(document.events.len(), 2);

    let baseline = &document.events[0];
    assert_eq!(baseline.layer, 0);
    assert_eq!(baseline.start, 0.0);
    assert_eq!(baseline.end, 0.5);
    assert_eq!(baseline.text, "HI");

    let overlay = &document.events[1];
    assert_eq!(overlay.layer, 1);
    assert_eq!(overlay.start, 0.0);
    assert_eq!(overlay.end, 0.5);
    assert_eq!(overlay.text, "{\\c&H0000FF&}HI{\\c&HFFFFFF&}");
}

/// Test plain mode: one upper-cased event per group on layer zero
#[test]
fn test_render_timeline_withPlainMode_shouldEmitOneEventPerGroup() {
    let words = word_run(&["first", "part."], 0.0, 0.4);
    let mut more = word_run(&["second", "part"], 1.0, 0.4);
    let mut all = words;
    all.append(&mut more);

    let groups = groups_from(&all);
    assert_eq!(groups.len(), 2);

    let document = render_timeline(&groups, &RenderConfig::default(), HighlightMode::Plain).unwrap();

    assert_eq!(document.events.len(), 2);
    assert!(document.events.iter().all(|e| e.layer == 0));
    assert_eq!(document.events[0].text, "FIRST PART.");
    assert_eq!(document.events[1].text, "SECOND PART");
    assert_eq!(document.events[0].start, 0.0);
    assert!((document.events[0].end - 0.8).abs() < 1e-9);
}

/// Test sweep mode emits baseline plus one overlay per word, in word order
#[test]
fn test_render_timeline_withThreeWordSweep_shouldOverlayEachWord() {
    let groups = groups_from(&word_run(&["one", "two", "three"], 0.0, 0.5));
    let document = render_timeline(&groups, &RenderConfig::default(), HighlightMode::ColorSweep).unwrap();

    // 1 baseline + 3 overlays
    assert_eq!(document.events.len(), 4);
    assert_eq!(document.events[0].layer, 0);

    for (i, overlay) in document.events[1..].iter().enumerate() {
        assert_eq!(overlay.layer, 1);
        assert!((overlay.start - i as f64 * 0.5).abs() < 1e-9);
        assert!((overlay.end - (i as f64 + 1.0) * 0.5).abs() < 1e-9);
    }

    // The middle overlay highlights only the middle word
    let middle = &document.events[2];
    assert_eq!(middle.text, "ONE {\\c&H0000FF&}TWO{\\c&HFFFFFF&} THREE");
}

/// Test comma escaping in event text
#[test]
fn test_render_timeline_withCommaInWord_shouldEscapeIt() {
    let groups = groups_from(&[word("wait,", 0.0, 0.5)]);
    let document = render_timeline(&groups, &RenderConfig::default(), HighlightMode::Plain).unwrap();

    assert_eq!(document.events[0].text, "WAIT\\,");
}

/// Test that stray backslashes in word text are cleaned outside overrides
#[test]
fn test_render_timeline_withStrayBackslash_shouldCleanOutsideOverrides() {
    let groups = groups_from(&[word("odd\\input", 0.0, 0.5)]);
    let document = render_timeline(&groups, &RenderConfig::default(), HighlightMode::ColorSweep).unwrap();

    // Stray backslash removed from the baseline text
    assert_eq!(document.events[0].text, "ODDINPUT");

    // Override tags in the overlay keep their backslashes
    let overlay = &document.events[1];
    assert!(overlay.text.starts_with("{\\c&H0000FF&}"));
    assert!(overlay.text.ends_with("{\\c&HFFFFFF&}"));
    assert!(overlay.text.contains("ODDINPUT"));
}

/// Test that escaped commas survive the cleanup with a single backslash
#[test]
fn test_render_timeline_withCommaAndSweep_shouldKeepEscapeInsidePlainSpan() {
    let groups = groups_from(&[word("so,", 0.0, 0.5)]);
    let document = render_timeline(&groups, &RenderConfig::default(), HighlightMode::ColorSweep).unwrap();

    let overlay = &document.events[1];
    assert_eq!(overlay.text, "{\\c&H0000FF&}SO\\,{\\c&HFFFFFF&}");
}

/// Test custom highlight colour flows into the override tags
#[test]
fn test_render_timeline_withCustomHighlightColour_shouldUseIt() {
    let config = RenderConfig {
        highlight_colour: "&H00FF0000".to_string(),
        ..Default::default()
    };
    let groups = groups_from(&[word("blue", 0.0, 0.5)]);
    let document = render_timeline(&groups, &config, HighlightMode::ColorSweep).unwrap();

    assert_eq!(document.events[1].text, "{\\c&HFF0000&}BLUE{\\c&HFFFFFF&}");
}

/// Test the rendered document header and dialogue formatting
#[test]
fn test_ass_document_display_withEvents_shouldFormatHeaderAndDialogue() {
    let groups = groups_from(&[word("Hi", 0.0, 0.5)]);
    let config = RenderConfig::for_canvas(1080, 1920);
    let document = render_timeline(&groups, &config, HighlightMode::Plain).unwrap();
    let rendered = document.to_string();

    assert!(rendered.contains("[Script Info]"));
    assert!(rendered.contains("PlayResX: 1080"));
    assert!(rendered.contains("PlayResY: 1920"));
    assert!(rendered.contains("[V4+ Styles]"));
    // 1920 / 12 = 160
    assert!(rendered.contains("Style: Default,Arial,160,&H00FFFFFF,&H000000FF,"));
    assert!(rendered.contains("[Events]"));
    assert!(rendered.contains("Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,HI"));
}

/// Test explicit font size overrides the canvas-derived default
#[test]
fn test_render_config_withExplicitFontSize_shouldOverrideDerived() {
    let config = RenderConfig {
        font_size: Some(42),
        ..Default::default()
    };
    assert_eq!(config.effective_font_size(), 42);

    let derived = RenderConfig::default();
    assert_eq!(derived.effective_font_size(), 1280 / 12);
}

/// Test that empty input renders a document with a header and no events
#[test]
fn test_render_timeline_withNoGroups_shouldYieldHeaderOnlyDocument() {
    let document = render_timeline(&[], &RenderConfig::default(), HighlightMode::ColorSweep).unwrap();

    assert!(document.events.is_empty());
    let rendered = document.to_string();
    assert!(rendered.contains("[Events]"));
    assert!(!rendered.contains("Dialogue:"));
}
