use reqwest::Client;

use crate::domain::simulation::{SimulationInputs, SimulationResponse};
use crate::services::api_config::{ApiConfig, ConfigError};
use crate::services::api_error::{first_validation_error, ApiError};

pub const SIMULATION_PATH: &str = "/api/simulations/production";

pub const SIMULATION_TRANSPORT_MESSAGE: &str = "Could not reach the simulation service.";
pub const SIMULATION_MALFORMED_MESSAGE: &str =
    "Received an unexpected response from the simulation service.";

/// Runs the production-planning Monte Carlo remotely.
#[async_trait::async_trait]
pub trait SimulationService: Send + Sync {
    async fn simulate(&self, inputs: &SimulationInputs) -> Result<SimulationResponse, ApiError>;
}

pub struct SimulationApiClient {
    url: String,
    client: Client,
}

impl SimulationApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            url: config.endpoint(SIMULATION_PATH),
            client: config.http_client()?,
        })
    }
}

#[async_trait::async_trait]
impl SimulationService for SimulationApiClient {
    async fn simulate(&self, inputs: &SimulationInputs) -> Result<SimulationResponse, ApiError> {
        tracing::info!(?inputs, "requesting production simulation");
        let response = self
            .client
            .post(&self.url)
            .json(inputs)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "simulation request did not complete");
                ApiError::Transport(SIMULATION_TRANSPORT_MESSAGE.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            tracing::warn!(error = %err, "simulation body could not be read");
            ApiError::Transport(SIMULATION_TRANSPORT_MESSAGE.to_string())
        })?;

        if !status.is_success() {
            let message = match first_validation_error(&body) {
                Some(detail) => detail.message(),
                None => format!("Simulation request failed (HTTP {status})"),
            };
            tracing::warn!(status = status.as_u16(), %message, "simulation rejected");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<SimulationResponse>(&body)
            .map_err(|err| err.to_string())
            .and_then(|decoded| decoded.validate().map_err(|err| err.to_string()))
            .map_err(|reason| {
                tracing::warn!(%reason, "simulation response rejected");
                ApiError::Malformed(SIMULATION_MALFORMED_MESSAGE.to_string())
            })
    }
}
