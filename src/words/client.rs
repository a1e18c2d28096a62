//! RandomWordClient - fetches target words from a random-word HTTP API.
//!
//! The API answers `GET {base}/word?length=5&lang=en` with a JSON array of
//! strings, e.g. `["apple"]`.

use std::time::Duration;

use super::retry::{
    calculate_backoff, is_transient_network_error, is_transient_status, DEFAULT_BACKOFF_BASE,
    DEFAULT_BACKOFF_MAX, DEFAULT_NETWORK_RETRIES,
};
use crate::evaluate::{Word, WordError};
use crate::WORD_LEN;

/// Default base URL for the random word API.
pub const DEFAULT_WORD_API_URL: &str = "https://random-word-api.herokuapp.com";

/// Default timeout for HTTP requests (10 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout (5 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while fetching a word.
#[derive(Debug, thiserror::Error)]
pub enum WordApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: status {status}: {body}")]
    ApiError {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Network error: {message} (after {attempts} attempts)")]
    NetworkError {
        /// Human-readable network error message
        message: String,
        /// Number of attempts made before giving up
        attempts: u32,
    },

    #[error("API returned no words")]
    EmptyResponse,

    #[error("API returned an unusable word: {0}")]
    InvalidWord(#[from] WordError),
}

/// Client for the random word API.
pub struct RandomWordClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl RandomWordClient {
    /// Create a client for the public API.
    pub fn new() -> Result<Self, WordApiError> {
        Self::with_base_url(DEFAULT_WORD_API_URL.to_string())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(base_url: String) -> Result<Self, WordApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one five-letter word, uppercased and validated.
    pub async fn fetch_word(&self) -> Result<Word, WordApiError> {
        let url = format!("{}/word", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("length", WORD_LEN.to_string()), ("lang", "en".to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WordApiError::ApiError { status, body });
        }

        let words: Vec<String> = response.json().await?;
        let first = words.first().ok_or(WordApiError::EmptyResponse)?;
        let word = Word::parse(first)?;
        log::debug!("Fetched target word from {}", self.base_url);
        Ok(word)
    }

    /// Fetch a word, retrying transient network failures with exponential backoff.
    pub async fn fetch_word_with_retry(&self) -> Result<Word, WordApiError> {
        self.fetch_word_with_retry_config(
            DEFAULT_NETWORK_RETRIES,
            DEFAULT_BACKOFF_BASE,
            DEFAULT_BACKOFF_MAX,
        )
        .await
    }

    /// Like `fetch_word_with_retry`, with custom retry settings.
    pub async fn fetch_word_with_retry_config(
        &self,
        max_retries: u32,
        backoff_base: Duration,
        backoff_max: Duration,
    ) -> Result<Word, WordApiError> {
        let mut attempt = 0;
        loop {
            let message = match self.fetch_word().await {
                Ok(word) => return Ok(word),
                Err(WordApiError::HttpError(e)) if is_transient_network_error(&e) => e.to_string(),
                Err(WordApiError::ApiError { status, body }) if is_transient_status(status) => {
                    format!("status {}: {}", status, body)
                }
                Err(e) => return Err(e),
            };

            if attempt >= max_retries {
                log::error!(
                    "Word API unreachable after {} attempts. Giving up.",
                    attempt + 1
                );
                return Err(WordApiError::NetworkError {
                    message,
                    attempts: attempt + 1,
                });
            }

            let delay = calculate_backoff(attempt, backoff_base, backoff_max);
            log::warn!(
                "Word API request failed ({}). Retrying in {:?} (attempt {}/{})",
                message,
                delay,
                attempt + 1,
                max_retries
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
