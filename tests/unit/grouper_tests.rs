/*!
 * Tests for caption grouping
 */

use clipcap::captions::grouper::{group_words, GroupingConfig};
use clipcap::errors::CaptionError;

use crate::common::{word, word_run};

/// Test the comma-split example: punctuation closes its own group
#[test]
fn test_group_words_withCommaWord_shouldCloseGroupAfterIt() {
    let words = vec![
        word("Hi", 0.0, 0.3),
        word("there,", 0.3, 0.6),
        word("friend", 0.6, 0.9),
    ];

    let groups = group_words(&words, &GroupingConfig::default()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].text, "Hi there,");
    assert_eq!(groups[1].text, "friend");
}

/// Test that the size cap starts a new group
#[test]
fn test_group_words_withMoreThanMaxWords_shouldSplitBySize() {
    let words = word_run(&["a", "b", "c", "d", "e", "f"], 0.0, 0.2);
    let groups = group_words(&words, &GroupingConfig::default()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].words.len(), 4);
    assert_eq!(groups[1].words.len(), 2);
}

/// Test that no group ever exceeds the configured size
#[test]
fn test_group_words_withLongInput_shouldNeverExceedMaxSize() {
    let texts: Vec<String> = (0..37).map(|i| format!("w{}", i)).collect();
    let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
    let words = word_run(&refs, 0.0, 0.1);

    let config = GroupingConfig { max_group_size: 3, max_group_span_secs: 100.0 };
    let groups = group_words(&words, &config).unwrap();

    assert!(groups.iter().all(|g| g.words.len() <= 3));
}

/// Test that a word starting past the span limit opens a new group
#[test]
fn test_group_words_withSpanExceeded_shouldSplitByTime() {
    let words = vec![
        word("slow", 0.0, 0.4),
        word("speech", 1.0, 1.4),
        word("with", 2.0, 2.4),
        word("pause", 3.5, 3.9),
    ];

    let groups = group_words(&words, &GroupingConfig::default()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].text, "slow speech with");
    assert_eq!(groups[1].text, "pause");
}

/// Test group start/end equal the first/last member words
#[test]
fn test_group_words_withAnyInput_shouldDeriveTimesFromMembers() {
    let words = word_run(&["one", "two", "three"], 1.5, 0.25);
    let groups = group_words(&words, &GroupingConfig::default()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].start, groups[0].words[0].start);
    assert_eq!(groups[0].end, groups[0].words.last().unwrap().end);
    assert_eq!(groups[0].start, 1.5);
    assert!((groups[0].end - 2.25).abs() < 1e-9);
}

/// Reconstruction property: grouping never drops, duplicates or reorders words
#[test]
fn test_group_words_withPunctuatedInput_shouldReconstructInputExactly() {
    let words = vec![
        word("So", 0.0, 0.2),
        word("anyway,", 0.2, 0.5),
        word("the", 0.5, 0.7),
        word("market", 0.7, 1.1),
        word("crashed.", 1.1, 1.6),
        word("Nobody", 1.6, 2.0),
        word("saw", 2.0, 2.2),
        word("it", 2.2, 2.3),
        word("coming!", 2.3, 2.8),
        word("Right?", 2.8, 3.2),
    ];

    let groups = group_words(&words, &GroupingConfig::default()).unwrap();

    let reconstructed: Vec<_> = groups.iter().flat_map(|g| g.words.clone()).collect();
    assert_eq!(reconstructed, words);
}

/// Test that each punctuation mark triggers a boundary after its word
#[test]
fn test_group_words_withEachBreakMark_shouldSplitAfterMarkedWord() {
    for mark in [".", "!", "?", ","] {
        let words = vec![
            word(&format!("first{}", mark), 0.0, 0.3),
            word("second", 0.3, 0.6),
        ];

        let groups = group_words(&words, &GroupingConfig::default()).unwrap();
        assert_eq!(groups.len(), 2, "mark {:?} did not split", mark);
        assert_eq!(groups[0].words.len(), 1);
    }
}

/// Test that group text is the space-joined member words
#[test]
fn test_group_words_withMultipleWords_shouldJoinTextWithSpaces() {
    let words = word_run(&["join", "these", "words"], 0.0, 0.2);
    let groups = group_words(&words, &GroupingConfig::default()).unwrap();

    assert_eq!(groups[0].text, "join these words");
}

/// Test empty input produces an empty result, not an error
#[test]
fn test_group_words_withEmptyInput_shouldYieldNothing() {
    let groups = group_words(&[], &GroupingConfig::default()).unwrap();
    assert!(groups.is_empty());
}

/// Test that an inverted word timing fails fast
#[test]
fn test_group_words_withInvertedTiming_shouldFail() {
    let words = vec![word("ok", 0.0, 0.5), word("broken", 2.0, 1.0)];
    let result = group_words(&words, &GroupingConfig::default());

    assert!(matches!(result, Err(CaptionError::InvalidWordTiming { .. })));
}

/// Test that a negative start time fails fast
#[test]
fn test_group_words_withNegativeStart_shouldFail() {
    let words = vec![word("early", -0.5, 0.5)];
    let result = group_words(&words, &GroupingConfig::default());

    assert!(matches!(result, Err(CaptionError::NegativeWordStart { .. })));
}

/// Test custom group size configuration
#[test]
fn test_group_words_withCustomMaxSize_shouldRespectIt() {
    let words = word_run(&["a", "b", "c", "d"], 0.0, 0.2);
    let config = GroupingConfig { max_group_size: 2, max_group_span_secs: 3.0 };

    let groups = group_words(&words, &config).unwrap();

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.words.len() == 2));
}
