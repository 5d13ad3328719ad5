// src/error.rs

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain generated text from the model service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("service responded with status {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingCredential(&'static str),
}
