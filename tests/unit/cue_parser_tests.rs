/*!
 * Tests for cue document parsing
 */

use clipcap::captions::cue::{cues_to_text, extract_cues_in_window, parse_cue_document, CueSegment};

use crate::common;

/// Test the minimal well-formed single-cue document
#[test]
fn test_parse_cue_document_withSingleCue_shouldYieldOneSegment() {
    let document = "1\n00:00:01.000 --> 00:00:03.000\nHello world\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(
        cues[0],
        CueSegment {
            start: 1.0,
            end: 3.0,
            text: "Hello world".to_string()
        }
    );
}

/// Test a full document with header, indexes and several cues
#[test]
fn test_parse_cue_document_withFullDocument_shouldParseAllCues() {
    let cues = parse_cue_document(common::SAMPLE_CUE_DOCUMENT);

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].start, 1.0);
    assert_eq!(cues[0].end, 4.0);
    assert_eq!(cues[0].text, "This is a test caption.");
    assert_eq!(cues[2].text, "For testing purposes.");
}

/// Test that multi-line cue text joins with single spaces
#[test]
fn test_parse_cue_document_withMultiLineText_shouldJoinWithSpaces() {
    let document = "00:00:01.000 --> 00:00:03.000\nfirst line\nsecond line\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "first line second line");
}

/// Test that inline markup tags and entities are stripped
#[test]
fn test_parse_cue_document_withMarkupTags_shouldStripThem() {
    let document = "00:00:01.000 --> 00:00:03.000\n<v Speaker><c.yellow>Hello</c>&nbsp;there\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hello there");
}

/// Test that a malformed timestamp skips only its own cue
#[test]
fn test_parse_cue_document_withMalformedTimestamp_shouldSkipOnlyThatCue() {
    let document = "1\n\
badstamp --> alsobad\n\
lost text\n\
\n\
2\n\
00:00:05.000 --> 00:00:07.000\n\
kept text\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "kept text");
}

/// Test that a cue with empty text after stripping is omitted
#[test]
fn test_parse_cue_document_withEmptyTextAfterStripping_shouldOmitCue() {
    let document = "00:00:01.000 --> 00:00:03.000\n<c></c>\n\n00:00:04.000 --> 00:00:06.000\nreal text\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "real text");
}

/// Test that zero-duration cues are dropped
#[test]
fn test_parse_cue_document_withZeroDurationCue_shouldDropIt() {
    let document = "00:00:03.000 --> 00:00:03.000\nblink\n\n00:00:04.000 --> 00:00:05.000\nkept\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "kept");
}

/// Test that trailing cue settings on the range line are tolerated
#[test]
fn test_parse_cue_document_withCueSettings_shouldIgnoreThem() {
    let document = "00:00:01.000 --> 00:00:03.000 align:start position:0%\npositioned text\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start, 1.0);
    assert_eq!(cues[0].end, 3.0);
    assert_eq!(cues[0].text, "positioned text");
}

/// Test that overlapping cues are both preserved
#[test]
fn test_parse_cue_document_withOverlappingCues_shouldKeepBoth() {
    let document = "00:00:01.000 --> 00:00:05.000\nfirst\n\n00:00:03.000 --> 00:00:07.000\nsecond\n";
    let cues = parse_cue_document(document);

    assert_eq!(cues.len(), 2);
}

/// Test that empty input produces an empty result, not an error
#[test]
fn test_parse_cue_document_withEmptyInput_shouldYieldNothing() {
    assert!(parse_cue_document("").is_empty());
    assert!(parse_cue_document("WEBVTT\n\nNOTE nothing here\n").is_empty());
}

/// Test window extraction keeps strictly intersecting cues in order
#[test]
fn test_extract_cues_in_window_withMixedCues_shouldKeepIntersecting() {
    let cues = vec![
        CueSegment { start: 0.0, end: 2.0, text: "before".to_string() },
        CueSegment { start: 2.5, end: 4.0, text: "inside".to_string() },
        CueSegment { start: 4.5, end: 8.0, text: "straddling".to_string() },
        CueSegment { start: 9.0, end: 11.0, text: "after".to_string() },
    ];

    let window = extract_cues_in_window(&cues, 2.0, 6.0);

    assert_eq!(window.len(), 2);
    assert_eq!(window[0].text, "inside");
    assert_eq!(window[1].text, "straddling");
}

/// Test that cues only touching the window boundary are excluded
#[test]
fn test_extract_cues_in_window_withBoundaryTouchingCue_shouldExcludeIt() {
    let cues = vec![
        CueSegment { start: 1.0, end: 3.0, text: "ends at start".to_string() },
        CueSegment { start: 5.0, end: 7.0, text: "starts at end".to_string() },
    ];

    let window = extract_cues_in_window(&cues, 3.0, 5.0);
    assert!(window.is_empty());
}

/// Test transcript concatenation from cues
#[test]
fn test_cues_to_text_withSeveralCues_shouldJoinTexts() {
    let cues = parse_cue_document(common::SAMPLE_CUE_DOCUMENT);
    let text = cues_to_text(&cues);

    assert_eq!(
        text,
        "This is a test caption. It contains multiple entries. For testing purposes."
    );
}
