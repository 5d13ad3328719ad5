// src/config/mod.rs

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "HF_API_KEY";
pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/codellama/CodeLlama-7b-hf";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 200;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for talking to the text-generation service.
///
/// Built once at startup and handed to the plan generator; nothing else reads
/// the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub max_new_tokens: u32,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;
        Ok(Self::new(&api_key))
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_credential_and_keeps_defaults() {
        let config = Config::from_lookup(|name| {
            (name == API_KEY_VAR).then(|| " hf_secret \n".to_string())
        })
        .expect("config");
        assert_eq!(config.api_key, "hf_secret");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.max_new_tokens, 200);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn credential_can_come_from_dotenv_file() {
        use std::collections::HashMap;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# local secrets\nHF_API_KEY=hf_from_file").unwrap();
        let vars: HashMap<String, String> = dotenvy::from_path_iter(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.api_key, "hf_from_file");
    }

    #[test]
    fn builders_override_defaults() {
        let config = Config::new("key")
            .with_api_url("http://localhost:8080/generate")
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.api_url, "http://localhost:8080/generate");
        assert_eq!(config.request_timeout.as_secs(), 5);
    }

    #[test]
    fn missing_or_blank_credential_is_an_error() {
        assert!(matches!(
            Config::from_lookup(|_| None),
            Err(ConfigError::MissingCredential(API_KEY_VAR))
        ));
        assert!(Config::from_lookup(|_| Some("   ".into())).is_err());
    }
}
