//! Configuration for resume analysis.
//!
//! Every knob lives in [`AnalyzerConfig`], built via its
//! [`AnalyzerConfigBuilder`]. The API key is the only value normally taken
//! from the environment; everything else has a working default.

use crate::error::ResumeLensError;
use std::fmt;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for a resume analysis.
///
/// # Example
/// ```rust
/// use resume_lens::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .api_key("test-key")
///     .model("gemini-2.5-pro")
///     .request_timeout_secs(90)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_image_dimension, 1500);
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Gemini API key. `None` (or empty) makes every analysis fail with
    /// [`ResumeLensError::MissingApiKey`] before any network activity.
    pub api_key: Option<String>,

    /// Gemini model identifier. Default: `gemini-2.5-flash`.
    pub model: String,

    /// Base URL of the REST API, without trailing slash.
    pub api_base: String,

    /// Timeout for the whole `generateContent` call, in seconds. Default: 60.
    pub request_timeout_secs: u64,

    /// Longest allowed image edge in pixels. Default: 1500.
    ///
    /// Larger images are scaled down proportionally before upload so that
    /// the longest edge equals this value exactly.
    pub max_image_dimension: u32,

    /// JPEG quality (1–100) for re-encoded images. Default: 80.
    pub jpeg_quality: u8,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 60,
            max_image_dimension: 1500,
            jpeg_quality: 80,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_image_dimension", &self.max_image_dimension)
            .field("jpeg_quality", &self.jpeg_quality)
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Default configuration with the API key read from `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
            ..Self::default()
        }
    }

    /// The API key, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn max_image_dimension(mut self, px: u32) -> Self {
        self.config.max_image_dimension = px;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A missing API key is *not* a build error: it is reported when an
    /// analysis is attempted.
    pub fn build(self) -> Result<AnalyzerConfig, ResumeLensError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ResumeLensError::InvalidConfig("model must not be empty".into()));
        }
        if c.max_image_dimension == 0 {
            return Err(ResumeLensError::InvalidConfig(
                "max image dimension must be ≥ 1".into(),
            ));
        }
        if c.jpeg_quality == 0 {
            return Err(ResumeLensError::InvalidConfig(
                "JPEG quality must be 1–100, got 0".into(),
            ));
        }
        if c.request_timeout_secs == 0 {
            return Err(ResumeLensError::InvalidConfig(
                "request timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}
