use crate::errors::CaptionError;

// @module: Timestamp encoding and decoding

/// Format seconds as an ASS event timestamp (H:MM:SS.cc).
///
/// The fractional part is truncated to centiseconds, not rounded. libass keys
/// frames off the truncated value, and rounding up makes highlight overlays
/// land one frame early over a long timeline.
pub fn seconds_to_ass(seconds: f64) -> Result<String, CaptionError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(CaptionError::NegativeTimestamp(seconds));
    }

    let total_cs = (seconds * 100.0) as u64;
    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let secs = (total_cs % 6_000) / 100;
    let centis = total_cs % 100;

    Ok(format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis))
}

/// Parse an ASS event timestamp (H:MM:SS.cc) back to seconds.
pub fn ass_to_seconds(text: &str) -> Result<f64, CaptionError> {
    let malformed = || CaptionError::MalformedTimestamp(text.to_string());

    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(malformed());
    }

    let hours: u64 = parts[0].parse().map_err(|_| malformed())?;
    let minutes: u64 = parts[1].parse().map_err(|_| malformed())?;
    let seconds: f64 = parts[2].parse().map_err(|_| malformed())?;

    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return Err(malformed());
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Parse a cue-document timestamp to seconds.
///
/// Accepts both HH:MM:SS.mmm and MM:SS.mmm, disambiguated by the field count.
/// A comma decimal separator is tolerated since auto-generated documents mix
/// both conventions.
pub fn parse_cue_timestamp(text: &str) -> Result<f64, CaptionError> {
    let malformed = || CaptionError::MalformedTimestamp(text.to_string());

    let normalized = text.trim().replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    match parts.len() {
        3 => {
            let hours: u64 = parts[0].parse().map_err(|_| malformed())?;
            let minutes: u64 = parts[1].parse().map_err(|_| malformed())?;
            let seconds: f64 = parts[2].parse().map_err(|_| malformed())?;
            Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
        }
        2 => {
            let minutes: u64 = parts[0].parse().map_err(|_| malformed())?;
            let seconds: f64 = parts[1].parse().map_err(|_| malformed())?;
            Ok(minutes as f64 * 60.0 + seconds)
        }
        _ => Err(malformed()),
    }
}

/// Parse an MM:SS field, the format highlight candidates are exchanged in.
pub fn parse_mmss(text: &str) -> Result<f64, CaptionError> {
    let malformed = || CaptionError::MalformedTimestamp(text.to_string());

    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 2 {
        return Err(malformed());
    }

    let minutes: u64 = parts[0].parse().map_err(|_| malformed())?;
    let seconds: u64 = parts[1].parse().map_err(|_| malformed())?;

    Ok((minutes * 60 + seconds) as f64)
}

/// Format seconds as MM:SS for transcript stamping. Truncates.
pub fn format_mmss(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
