use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, error};
use serde_json::{from_str, Value};
use tokio::process::Command;

// @module: External transcoder and prober invocation

/// Timeout for ffprobe calls
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for ffmpeg transcode calls
const TRANSCODE_TIMEOUT: Duration = Duration::from_secs(600);

// @struct: Probed properties of a video file
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    // @field: Frame width in pixels
    pub width: u32,

    // @field: Frame height in pixels
    pub height: u32,

    // @field: Frames per second
    pub fps: f64,

    // @field: Container duration in seconds
    pub duration: f64,
}

/// Probe a video file for canvas size, frame rate and duration
pub async fn probe_video_info<P: AsRef<Path>>(video_path: P) -> Result<VideoInfo> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(anyhow!("Video file not found: {:?}", video_path));
    }

    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(PROBE_TIMEOUT) => {
            return Err(anyhow!("ffprobe command timed out after 60 seconds"));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = from_str(&stdout).context("Failed to parse ffprobe JSON output")?;

    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .ok_or_else(|| anyhow!("ffprobe output has no streams"))?;

    let video_stream = streams
        .iter()
        .find(|stream| {
            stream.get("codec_type").and_then(|v| v.as_str()) == Some("video")
        })
        .ok_or_else(|| anyhow!("No video stream found in {:?}", video_path))?;

    let width = video_stream
        .get("width")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| anyhow!("Video stream has no width"))? as u32;

    let height = video_stream
        .get("height")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| anyhow!("Video stream has no height"))? as u32;

    let fps = video_stream
        .get("r_frame_rate")
        .and_then(|v| v.as_str())
        .map(parse_frame_rate)
        .transpose()?
        .unwrap_or(0.0);

    let duration = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoInfo {
        width,
        height,
        fps,
        duration,
    })
}

/// Extract a mono 16 kHz mp3 audio segment for the transcription provider
pub async fn extract_audio_segment<P1: AsRef<Path>, P2: AsRef<Path>>(
    video_path: P1,
    start_secs: f64,
    duration_secs: f64,
    output_path: P2,
) -> Result<()> {
    let video_path = video_path.as_ref();
    let output_path = output_path.as_ref();

    debug!(
        "Extracting {:.1}s of audio starting at {:.1}s from {:?}",
        duration_secs, start_secs, video_path
    );

    run_ffmpeg(
        &[
            "-y",
            "-i", video_path.to_str().unwrap_or_default(),
            "-ss", &start_secs.to_string(),
            "-t", &duration_secs.to_string(),
            "-vn",
            "-acodec", "libmp3lame",
            "-ar", "16000",
            "-ac", "1",
            "-b:a", "64k",
            output_path.to_str().unwrap_or_default(),
        ],
        "audio extraction",
    )
    .await
}

/// Extract a re-encoded clip from the source video
pub async fn extract_clip<P1: AsRef<Path>, P2: AsRef<Path>>(
    video_path: P1,
    start_secs: f64,
    duration_secs: f64,
    output_path: P2,
) -> Result<()> {
    let video_path = video_path.as_ref();
    let output_path = output_path.as_ref();

    debug!(
        "Extracting {:.1}s clip starting at {:.1}s from {:?}",
        duration_secs, start_secs, video_path
    );

    run_ffmpeg(
        &[
            "-y",
            "-i", video_path.to_str().unwrap_or_default(),
            "-ss", &start_secs.to_string(),
            "-t", &duration_secs.to_string(),
            "-c:v", "libx264",
            "-c:a", "aac",
            "-preset", "fast",
            output_path.to_str().unwrap_or_default(),
        ],
        "clip extraction",
    )
    .await
}

/// Burn a styled subtitle file into a video, copying the audio track
pub async fn burn_subtitles<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
    video_path: P1,
    subtitle_path: P2,
    output_path: P3,
) -> Result<()> {
    let video_path = video_path.as_ref();
    let subtitle_path = subtitle_path.as_ref();
    let output_path = output_path.as_ref();

    // The ass filter chokes on backslash path separators
    let subtitle_arg = subtitle_path.to_string_lossy().replace('\\', "/");

    debug!("Burning {:?} into {:?}", subtitle_path, video_path);

    run_ffmpeg(
        &[
            "-y",
            "-i", video_path.to_str().unwrap_or_default(),
            "-vf", &format!("ass={}", subtitle_arg),
            "-c:a", "copy",
            "-preset", "fast",
            output_path.to_str().unwrap_or_default(),
        ],
        "subtitle burn-in",
    )
    .await
}

/// Run an ffmpeg invocation with a timeout, surfacing filtered stderr on failure
async fn run_ffmpeg(args: &[&str], operation: &str) -> Result<()> {
    let ffmpeg_future = Command::new("ffmpeg").args(args).output();

    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg command for {}: {}", operation, e))?
        },
        _ = tokio::time::sleep(TRANSCODE_TIMEOUT) => {
            return Err(anyhow!("ffmpeg {} timed out after 10 minutes", operation));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("ffmpeg {} failed: {}", operation, filtered);
        return Err(anyhow!("ffmpeg {} failed: {}", operation, filtered));
    }

    Ok(())
}

/// Parse ffprobe's num/den frame rate representation
fn parse_frame_rate(rate: &str) -> Result<f64> {
    let mut parts = rate.splitn(2, '/');
    let num: f64 = parts
        .next()
        .unwrap_or_default()
        .parse()
        .with_context(|| format!("Bad frame rate: {:?}", rate))?;

    match parts.next() {
        Some(den) => {
            let den: f64 = den
                .parse()
                .with_context(|| format!("Bad frame rate: {:?}", rate))?;
            if den == 0.0 {
                return Err(anyhow!("Zero denominator in frame rate: {:?}", rate));
            }
            Ok(num / den)
        }
        None => Ok(num),
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
