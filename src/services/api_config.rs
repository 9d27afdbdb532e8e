use std::fs;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// Which backend deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ApiEnvironment {
    Development,
    Production,
}

impl ApiEnvironment {
    /// Debug builds talk to a local backend, release builds to the hosted one.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            ApiEnvironment::Development
        } else {
            ApiEnvironment::Production
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            ApiEnvironment::Development => "http://localhost:8000",
            ApiEnvironment::Production => "https://simulation-api-rsaw.onrender.com",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: 120,
        }
    }
}

impl ApiSettings {
    pub fn from_yaml_file(filepath: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(filepath)?;
        let settings: ApiSettings = serde_yaml::from_str(&contents)?;
        Ok(settings)
    }
}

/// Resolved once at startup and handed to every API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: Duration::from_secs(ApiSettings::default().request_timeout_secs),
        })
    }

    /// Flag override beats the settings file, which beats the environment default.
    pub fn resolve(
        environment: ApiEnvironment,
        settings: &ApiSettings,
        base_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url_override
            .or(settings.base_url.as_deref())
            .unwrap_or_else(|| environment.base_url());
        Ok(Self::new(base_url)?.with_timeout(Duration::from_secs(settings.request_timeout_secs)))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn http_client(&self) -> Result<Client, ConfigError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))
    }
}
