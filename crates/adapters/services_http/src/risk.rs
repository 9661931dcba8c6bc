//! HTTP implementation of [`RiskGateway`].

use serde::{Deserialize, Serialize};

use defipilot_app::ports::RiskGateway;
use defipilot_domain::error::{DefiPilotError, DownstreamError};
use defipilot_domain::position::Position;

const SERVICE: &str = "ml-service";

#[derive(Debug, Serialize)]
struct ForecastRequest<'a> {
    user_address: &'a str,
    positions: &'a [Position],
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    liquidation_risk: f64,
}

/// Risk gateway backed by the ML service's forecast endpoint.
pub struct HttpRiskForecast {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRiskForecast {
    /// Create a new gateway over an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn forecast_url(&self) -> String {
        format!("{}/api/v1/risk/forecast", self.base_url)
    }
}

impl RiskGateway for HttpRiskForecast {
    async fn liquidation_risk(
        &self,
        user_address: &str,
        positions: &[Position],
    ) -> Result<f64, DefiPilotError> {
        let request = ForecastRequest {
            user_address,
            positions,
        };

        tracing::debug!(user_address, position_count = positions.len(), "querying ml-service");
        let response = self
            .client
            .post(self.forecast_url())
            .json(&request)
            .send()
            .await
            .map_err(|err| DownstreamError::Request {
                service: SERVICE,
                source: Box::new(err),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(DownstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
            }
            .into());
        }

        let body: ForecastResponse =
            response
                .json()
                .await
                .map_err(|err| DownstreamError::Decode {
                    service: SERVICE,
                    source: Box::new(err),
                })?;
        Ok(body.liquidation_risk)
    }
}
