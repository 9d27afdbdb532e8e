use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::domain::conversion::BillingFile;
use crate::services::api_config::{ApiConfig, ConfigError};
use crate::services::api_error::{detail_message, status_line_message, ApiError};

pub const CONVERT_PATH: &str = "/api/focus/convert";

pub const CONVERSION_TRANSPORT_MESSAGE: &str =
    "An unexpected error occurred during normalization.";

/// Normalized bytes, or the reason the service gave for refusing the file.
pub type ConversionOutcome = Result<Vec<u8>, ApiError>;

/// Turns a provider billing export into a FOCUS 1.3 file.
#[async_trait::async_trait]
pub trait ConversionService: Send + Sync {
    async fn convert(&self, file: &BillingFile) -> ConversionOutcome;
}

pub struct FocusApiClient {
    url: String,
    client: Client,
}

impl FocusApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            url: config.endpoint(CONVERT_PATH),
            client: config.http_client()?,
        })
    }
}

#[async_trait::async_trait]
impl ConversionService for FocusApiClient {
    async fn convert(&self, file: &BillingFile) -> ConversionOutcome {
        let part = Part::bytes(file.contents.clone()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        tracing::info!(file = %file.name, bytes = file.contents.len(), "uploading billing export");
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "text/csv, application/octet-stream")
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "conversion request did not complete");
                ApiError::Transport(CONVERSION_TRANSPORT_MESSAGE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = detail_message(&body).unwrap_or_else(|| status_line_message(status));
            tracing::warn!(status = status.as_u16(), %message, "conversion rejected");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(|err| {
            tracing::warn!(error = %err, "conversion body could not be read");
            ApiError::Transport(CONVERSION_TRANSPORT_MESSAGE.to_string())
        })?;
        tracing::info!(bytes = body.len(), "conversion succeeded");
        Ok(body.to_vec())
    }
}
