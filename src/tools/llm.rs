// src/tools/llm.rs

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::GenerationError;
use crate::tools::{GenerationRequest, Transport};

/// Blocking HTTP client for a hosted text-generation endpoint.
pub struct HttpTransport {
    client: Client,
    config: Config,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

impl HttpTransport {
    pub fn new(config: Config) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(url = %self.config.api_url))]
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .map_err(|err| classify(err, &self.config))?;

        let status = response.status();
        debug!(%status, "generation response");
        if !status.is_success() {
            return Err(GenerationError::Status(status));
        }

        let body = response.text().map_err(|err| classify(err, &self.config))?;
        parse_generated_text(&body)
    }
}

fn classify(err: reqwest::Error, config: &Config) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout(config.request_timeout)
    } else {
        GenerationError::Request(err)
    }
}

/// Reads `generated_text` from the first element of the response array.
pub fn parse_generated_text(body: &str) -> Result<String, GenerationError> {
    let items: Vec<GeneratedText> = serde_json::from_str(body)
        .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;
    items
        .into_iter()
        .next()
        .map(|item| item.generated_text)
        .ok_or_else(|| GenerationError::MalformedResponse("empty result array".into()))
}
