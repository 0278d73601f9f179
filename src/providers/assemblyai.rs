use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{Transcript, TranscriptWord, TranscriptionProvider};

/// AssemblyAI client for word-timestamped transcription
#[derive(Debug)]
pub struct AssemblyAi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Language code submitted with each job
    language_code: String,
    /// Seconds between job status polls
    poll_interval_secs: u64,
    /// Max polls before giving up on a job
    max_poll_attempts: usize,
}

/// Upload response carrying the temporary audio URL
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Transcription job submission body
#[derive(Debug, Serialize)]
struct TranscriptRequest {
    audio_url: String,
    format_text: bool,
    language_code: String,
}

/// Transcription job state, polled until terminal
#[derive(Debug, Deserialize)]
struct TranscriptStatus {
    id: String,
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    words: Option<Vec<ApiWord>>,
    #[serde(default)]
    error: Option<String>,
}

/// One word record as the API reports it (milliseconds)
#[derive(Debug, Deserialize)]
struct ApiWord {
    text: String,
    start: u64,
    end: u64,
}

impl AssemblyAi {
    /// Create a new AssemblyAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        language_code: impl Into<String>,
        poll_interval_secs: u64,
        max_poll_attempts: usize,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            language_code: language_code.into(),
            poll_interval_secs,
            max_poll_attempts,
        }
    }

    /// Base API URL, defaulting to the public service
    fn base_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.assemblyai.com/v2".to_string()
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        }
    }

    /// Upload an audio file, returning its temporary URL
    async fn upload(&self, audio_path: &Path) -> Result<String, ProviderError> {
        let audio = tokio::fs::read(audio_path).await.map_err(|e| {
            ProviderError::RequestFailed(format!(
                "Failed to read audio file {}: {}",
                audio_path.display(),
                e
            ))
        })?;

        debug!("Uploading {} bytes of audio for transcription", audio.len());

        let response = self
            .client
            .post(format!("{}/upload", self.base_url()))
            .header("authorization", &self.api_key)
            .body(bytes::Bytes::from(audio))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Audio upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Bad upload response: {}", e)))?;

        Ok(upload.upload_url)
    }

    /// Submit a transcription job for an uploaded audio URL
    async fn submit(&self, audio_url: String) -> Result<String, ProviderError> {
        let request = TranscriptRequest {
            audio_url,
            format_text: true,
            language_code: self.language_code.clone(),
        };

        let response = self
            .client
            .post(format!("{}/transcript", self.base_url()))
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Job submission failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let job: TranscriptStatus = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Bad submission response: {}", e)))?;

        Ok(job.id)
    }

    /// Poll a job until it reaches a terminal state
    async fn poll(&self, job_id: &str) -> Result<TranscriptStatus, ProviderError> {
        for attempt in 0..self.max_poll_attempts {
            let response = self
                .client
                .get(format!("{}/transcript/{}", self.base_url(), job_id))
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| ProviderError::RequestFailed(format!("Status poll failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                });
            }

            let job: TranscriptStatus = response
                .json()
                .await
                .map_err(|e| ProviderError::ParseError(format!("Bad status response: {}", e)))?;

            match job.status.as_str() {
                "completed" => return Ok(job),
                "error" => {
                    let message = job.error.unwrap_or_else(|| "unknown error".to_string());
                    error!("Transcription job {} failed: {}", job_id, message);
                    return Err(ProviderError::JobFailed(message));
                }
                other => {
                    debug!("Job {} still {}, poll {}/{}", job_id, other, attempt + 1, self.max_poll_attempts);
                }
            }

            tokio::time::sleep(Duration::from_secs(self.poll_interval_secs)).await;
        }

        Err(ProviderError::PollTimeout {
            job_id: job_id.to_string(),
            attempts: self.max_poll_attempts,
        })
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAi {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::AuthenticationError(
                "AssemblyAI API key is not set".to_string(),
            ));
        }

        let audio_url = self.upload(audio_path).await?;
        let job_id = self.submit(audio_url).await?;
        let job = self.poll(&job_id).await?;

        let words = job
            .words
            .unwrap_or_default()
            .into_iter()
            .map(|w| TranscriptWord {
                text: w.text,
                start_ms: w.start,
                end_ms: w.end,
            })
            .collect();

        Ok(Transcript {
            text: job.text.unwrap_or_default(),
            words,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::AuthenticationError(
                "AssemblyAI API key is not set".to_string(),
            ));
        }

        // A status request for a bogus id authenticates without starting a job
        let response = self
            .client
            .get(format!("{}/transcript", self.base_url()))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Connection test failed: {}", e)))?;

        if response.status().as_u16() == 401 {
            return Err(ProviderError::AuthenticationError(
                "AssemblyAI rejected the API key".to_string(),
            ));
        }

        Ok(())
    }
}
