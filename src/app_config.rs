use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::captions::grouper::GroupingConfig;
use crate::captions::renderer::{HighlightMode, RenderConfig};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Working directory for downloaded media and generated artifacts
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,

    /// Transcription provider config
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Completion provider config
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Caption grouping and styling config
    #[serde(default)]
    pub caption: CaptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    // @provider: AssemblyAI
    #[default]
    AssemblyAi,
    // @provider: In-process mock, for tests and dry runs
    Mock,
}

impl TranscriptionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::AssemblyAi => "AssemblyAI",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssemblyAi => write!(f, "assemblyai"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "assemblyai" => Ok(Self::AssemblyAi),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid transcription provider: {}", s)),
        }
    }
}

/// Completion provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    // @provider: OpenAI
    #[default]
    OpenAi,
    // @provider: Anthropic
    Anthropic,
    // @provider: In-process mock, for tests and dry runs
    Mock,
}

impl CompletionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for CompletionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid completion provider: {}", s)),
        }
    }
}

/// Transcription provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    // @field: Provider type identifier
    #[serde(rename = "type", default)]
    pub provider: TranscriptionProvider,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL; empty uses the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Language code passed to the service
    #[serde(default = "default_language_code")]
    pub language_code: String,

    // @field: Seconds between job status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    // @field: Max polls before giving up on a job
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: usize,

    // @field: Per-request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        TranscriptionConfig {
            provider: TranscriptionProvider::default(),
            api_key: String::new(),
            endpoint: String::new(),
            language_code: default_language_code(),
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: default_max_poll_attempts(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompletionConfig {
    // @field: Provider type identifier
    #[serde(rename = "type", default)]
    pub provider: CompletionProvider,

    // @field: Model name
    #[serde(default = "default_completion_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL; empty uses the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    // @field: Per-request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Transcript truncation limit before prompting
    #[serde(default = "default_transcript_char_limit")]
    pub transcript_char_limit: usize,

    // @field: Number of highlights to request
    #[serde(default = "default_highlight_count")]
    pub highlight_count: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        CompletionConfig {
            provider: CompletionProvider::default(),
            model: default_completion_model(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            transcript_char_limit: default_transcript_char_limit(),
            highlight_count: default_highlight_count(),
        }
    }
}

/// Caption grouping and styling configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptionConfig {
    // @field: Max words per caption group
    #[serde(default = "default_max_group_size")]
    pub max_group_size: usize,

    // @field: Max group span seconds
    #[serde(default = "default_max_group_span_secs")]
    pub max_group_span_secs: f64,

    // @field: Render strategy
    #[serde(default)]
    pub highlight_mode: HighlightMode,

    // @field: Font name
    #[serde(default = "default_font_name")]
    pub font_name: String,

    // @field: Font size; derived from canvas height when unset
    #[serde(default)]
    pub font_size: Option<u32>,

    // @field: Default text colour (AABBGGRR)
    #[serde(default = "default_primary_colour")]
    pub primary_colour: String,

    // @field: Sweep highlight colour (AABBGGRR)
    #[serde(default = "default_highlight_colour")]
    pub highlight_colour: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        CaptionConfig {
            max_group_size: default_max_group_size(),
            max_group_span_secs: default_max_group_span_secs(),
            highlight_mode: HighlightMode::default(),
            font_name: default_font_name(),
            font_size: None,
            primary_colour: default_primary_colour(),
            highlight_colour: default_highlight_colour(),
        }
    }
}

impl CaptionConfig {
    /// Grouping tunables for the word grouper
    pub fn grouping(&self) -> GroupingConfig {
        GroupingConfig {
            max_group_size: self.max_group_size,
            max_group_span_secs: self.max_group_span_secs,
        }
    }

    /// Render settings sized to a probed video canvas
    pub fn render_for_canvas(&self, width: u32, height: u32) -> RenderConfig {
        RenderConfig {
            play_res_x: width,
            play_res_y: height,
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            primary_colour: self.primary_colour.clone(),
            highlight_colour: self.highlight_colour.clone(),
            ..Default::default()
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace_dir: default_workspace_dir(),
            transcription: TranscriptionConfig::default(),
            completion: CompletionConfig::default(),
            caption: CaptionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<()> {
        if self.caption.max_group_size == 0 {
            return Err(anyhow!("caption.max_group_size must be at least 1"));
        }
        if self.caption.max_group_span_secs <= 0.0 {
            return Err(anyhow!("caption.max_group_span_secs must be positive"));
        }
        if self.completion.highlight_count == 0 {
            return Err(anyhow!("completion.highlight_count must be at least 1"));
        }

        validate_endpoint("transcription", &self.transcription.endpoint)?;
        validate_endpoint("completion", &self.completion.endpoint)?;

        Ok(())
    }

    /// Check that the configured providers have the credentials they need.
    /// Separate from validate() so offline commands can run with a bare config.
    pub fn validate_credentials(&self) -> Result<()> {
        if self.transcription.provider != TranscriptionProvider::Mock
            && self.transcription.api_key.is_empty()
        {
            return Err(anyhow!(
                "No API key configured for transcription provider {}",
                self.transcription.provider.display_name()
            ));
        }
        if self.completion.provider != CompletionProvider::Mock && self.completion.api_key.is_empty() {
            return Err(anyhow!(
                "No API key configured for completion provider {}",
                self.completion.provider.display_name()
            ));
        }
        Ok(())
    }
}

/// Reject endpoints that are present but not parseable URLs
fn validate_endpoint(section: &str, endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Ok(());
    }
    url::Url::parse(endpoint)
        .map_err(|e| anyhow!("Invalid {} endpoint {:?}: {}", section, endpoint, e))?;
    Ok(())
}

// Default value functions for serde
fn default_workspace_dir() -> String {
    "downloads".to_string()
}

fn default_language_code() -> String {
    "en_us".to_string()
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_max_poll_attempts() -> usize {
    200
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_completion_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_transcript_char_limit() -> usize {
    8000
}

fn default_highlight_count() -> usize {
    3
}

fn default_max_group_size() -> usize {
    4
}

fn default_max_group_span_secs() -> f64 {
    3.0
}

fn default_font_name() -> String {
    "Arial".to_string()
}

fn default_primary_colour() -> String {
    "&H00FFFFFF".to_string()
}

fn default_highlight_colour() -> String {
    "&H000000FF".to_string()
}
