/*!
 * Tests for timestamp encoding and decoding
 */

use rand::Rng;

use clipcap::errors::CaptionError;
use clipcap::timecode::{
    ass_to_seconds, format_mmss, parse_cue_timestamp, parse_mmss, seconds_to_ass,
};

/// Test ASS formatting at the origin
#[test]
fn test_seconds_to_ass_withZero_shouldFormatOrigin() {
    assert_eq!(seconds_to_ass(0.0).unwrap(), "0:00:00.00");
}

/// Test ASS formatting of a value spanning every field
#[test]
fn test_seconds_to_ass_withKnownValue_shouldFormatAllFields() {
    assert_eq!(seconds_to_ass(3661.75).unwrap(), "1:01:01.75");
    assert_eq!(seconds_to_ass(59.5).unwrap(), "0:00:59.50");
    assert_eq!(seconds_to_ass(3600.0).unwrap(), "1:00:00.00");
}

/// Test that fractional centiseconds are truncated, never rounded
#[test]
fn test_seconds_to_ass_withSubCentisecondFraction_shouldTruncate() {
    assert_eq!(seconds_to_ass(1.999).unwrap(), "0:00:01.99");
    assert_eq!(seconds_to_ass(0.009_9).unwrap(), "0:00:00.00");
    assert_eq!(seconds_to_ass(2.0).unwrap(), "0:00:02.00");
}

/// Test that negative input is rejected
#[test]
fn test_seconds_to_ass_withNegativeInput_shouldFail() {
    let result = seconds_to_ass(-0.5);
    assert!(matches!(result, Err(CaptionError::NegativeTimestamp(_))));
}

/// Test parsing an ASS timestamp back to seconds
#[test]
fn test_ass_to_seconds_withValidTimestamp_shouldParse() {
    assert_eq!(ass_to_seconds("1:01:01.75").unwrap(), 3661.75);
    assert_eq!(ass_to_seconds("0:00:00.00").unwrap(), 0.0);
}

/// Test that malformed ASS timestamps are rejected
#[test]
fn test_ass_to_seconds_withMalformedInput_shouldFail() {
    assert!(ass_to_seconds("1:01").is_err());
    assert!(ass_to_seconds("a:bb:cc.dd").is_err());
    assert!(ass_to_seconds("0:99:00.00").is_err());
    assert!(ass_to_seconds("0:00:75.00").is_err());
}

/// Round-trip property: formatting then parsing recovers the input to within
/// one centisecond for any non-negative value
#[test]
fn test_ass_round_trip_withRandomValues_shouldStayWithinOneCentisecond() {
    let mut rng = rand::rng();
    for _ in 0..1000 {
        let value: f64 = rng.random_range(0.0..36_000.0);
        let formatted = seconds_to_ass(value).unwrap();
        let recovered = ass_to_seconds(&formatted).unwrap();
        assert!(
            (value - recovered).abs() <= 0.011,
            "{} -> {} -> {} drifted more than a centisecond",
            value,
            formatted,
            recovered
        );
    }
}

/// Test cue timestamp parsing in the three-field form
#[test]
fn test_parse_cue_timestamp_withHoursForm_shouldParse() {
    assert_eq!(parse_cue_timestamp("00:00:10.500").unwrap(), 10.5);
    assert_eq!(parse_cue_timestamp("01:02:03.250").unwrap(), 3723.25);
}

/// Test cue timestamp parsing in the two-field form
#[test]
fn test_parse_cue_timestamp_withMinutesForm_shouldParse() {
    assert_eq!(parse_cue_timestamp("00:10.500").unwrap(), 10.5);
    assert_eq!(parse_cue_timestamp("10:30.250").unwrap(), 630.25);
}

/// Test that a comma decimal separator is tolerated
#[test]
fn test_parse_cue_timestamp_withCommaSeparator_shouldParse() {
    assert_eq!(parse_cue_timestamp("00:00:01,000").unwrap(), 1.0);
}

/// Test that malformed cue timestamps are rejected
#[test]
fn test_parse_cue_timestamp_withMalformedInput_shouldFail() {
    assert!(parse_cue_timestamp("10").is_err());
    assert!(parse_cue_timestamp("1:2:3:4").is_err());
    assert!(parse_cue_timestamp("aa:bb.cc").is_err());
    assert!(parse_cue_timestamp("00:xx:10.500").is_err());
}

/// Test MM:SS parsing used for highlight exchange
#[test]
fn test_parse_mmss_withValidInput_shouldParse() {
    assert_eq!(parse_mmss("02:30").unwrap(), 150.0);
    assert_eq!(parse_mmss("2:05").unwrap(), 125.0);
    assert_eq!(parse_mmss("00:00").unwrap(), 0.0);
}

/// Test that bad MM:SS fields are rejected
#[test]
fn test_parse_mmss_withMalformedInput_shouldFail() {
    assert!(parse_mmss("150").is_err());
    assert!(parse_mmss("02:30:00").is_err());
    assert!(parse_mmss("aa:30").is_err());
}

/// Test MM:SS formatting truncates into whole seconds
#[test]
fn test_format_mmss_withFractionalSeconds_shouldTruncate() {
    assert_eq!(format_mmss(150.7), "02:30");
    assert_eq!(format_mmss(0.0), "00:00");
    assert_eq!(format_mmss(3599.9), "59:59");
}
