//! Runtime settings.
//!
//! Defaults are compiled in; a few values can be overridden from the
//! environment (see [`Settings::from_env`]) and then from command-line flags.

use std::time::Duration;

/// Model used for every request unless overridden.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Largest document accepted for upload, in megabytes.
pub const MAX_UPLOAD_SIZE_MB: u64 = 50;

/// Most content slides rendered into one deck.
pub const MAX_SLIDES: usize = 10;

/// Character budget for document text sent in one prompt.
pub const PROCESSING_CHUNK_SIZE: usize = 15_000;

/// Extracted text shorter than this is probably a scanned document.
pub const MIN_CONTENT_LENGTH: usize = 100;

/// Typeface used for bullet text in generated decks.
pub const PPT_FONT: &str = "Calibri";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "AITOOLS_MODEL";
pub const POLL_TIMEOUT_ENV: &str = "AITOOLS_POLL_TIMEOUT_SECS";

/// Settings shared by all tools.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub max_upload_size_mb: u64,
    pub max_slides: usize,
    pub processing_chunk_size: usize,
    pub min_content_length: usize,
    pub font: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_upload_size_mb: MAX_UPLOAD_SIZE_MB,
            max_slides: MAX_SLIDES,
            processing_chunk_size: PROCESSING_CHUNK_SIZE,
            min_content_length: MIN_CONTENT_LENGTH,
            font: PPT_FONT.to_string(),
            poll_interval: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(300),
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides taken from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        settings.api_key = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty());

        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            settings.model = model;
        }

        if let Some(raw) = lookup(POLL_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => settings.poll_timeout = Duration::from_secs(secs),
                Err(_) => log::warn!("Ignoring invalid {}={:?}", POLL_TIMEOUT_ENV, raw),
            }
        }

        settings
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the content-slide cap (at least one slide).
    pub fn with_max_slides(mut self, max: usize) -> Self {
        self.max_slides = max.max(1);
        self
    }

    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}
