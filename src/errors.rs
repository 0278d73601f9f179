/*!
 * Error types for the clipcap application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error reported by an asynchronous transcription job
    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    /// Error when a polled job does not finish in time
    #[error("Timed out waiting for job {job_id} after {attempts} polls")]
    PollTimeout {
        /// Identifier of the polled job
        job_id: String,
        /// Number of polls performed before giving up
        attempts: usize
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised by the caption core for contract violations and bad timestamps
#[derive(Error, Debug)]
pub enum CaptionError {
    /// A timestamp value below zero was passed to the codec
    #[error("Negative timestamp: {0}")]
    NegativeTimestamp(f64),

    /// A textual timestamp did not match any accepted encoding
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// A word timing record violated its start/end invariant
    #[error("Invalid word timing for {text:?}: start {start} > end {end}")]
    InvalidWordTiming {
        /// The word text
        text: String,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64
    },

    /// A word timing record carried a negative start time
    #[error("Negative word start for {text:?}: {start}")]
    NegativeWordStart {
        /// The word text
        text: String,
        /// Start time in seconds
        start: f64
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the caption core
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
