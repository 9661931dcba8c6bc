//! HTTP implementation of [`MarketDataGateway`].

use serde::Deserialize;

use defipilot_app::ports::MarketDataGateway;
use defipilot_domain::error::{DefiPilotError, DownstreamError};

const SERVICE: &str = "defi-service";

#[derive(Debug, Deserialize)]
struct ApyResponse {
    apy: f64,
}

#[derive(Debug, Deserialize)]
struct HealthFactorResponse {
    health_factor: f64,
}

/// Market-data gateway backed by the DeFi service's REST API.
pub struct HttpMarketData {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMarketData {
    /// Create a new gateway over an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn apy_url(&self, protocol: &str, asset: &str, chain: &str) -> String {
        format!(
            "{}/api/v1/protocols/{protocol}/apy?asset={asset}&chain={chain}",
            self.base_url
        )
    }

    fn health_factor_url(&self, protocol: &str, user_address: &str, chain: &str) -> String {
        format!(
            "{}/api/v1/protocols/{protocol}/health-factor?user_address={user_address}&chain={chain}",
            self.base_url
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, DefiPilotError> {
        tracing::debug!(%url, "querying defi-service");
        let response = self
            .client
            .get(&url)
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

        response
            .json::<T>()
            .await
            .map_err(|err| {
                DownstreamError::Decode {
                    service: SERVICE,
                    source: Box::new(err),
                }
                .into()
            })
    }
}

impl MarketDataGateway for HttpMarketData {
    async fn current_apy(
        &self,
        protocol: &str,
        asset: &str,
        chain: &str,
    ) -> Result<f64, DefiPilotError> {
        let url = self.apy_url(protocol, asset, chain);
        let body: ApyResponse = self.get_json(url).await?;
        Ok(body.apy)
    }

    async fn health_factor(
        &self,
        protocol: &str,
        user_address: &str,
        chain: &str,
    ) -> Result<f64, DefiPilotError> {
        let url = self.health_factor_url(protocol, user_address, chain);
        let body: HealthFactorResponse = self.get_json(url).await?;
        Ok(body.health_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpMarketData {
        HttpMarketData::new(
            reqwest::Client::new(),
            "http://defi.internal:8081".to_string(),
        )
    }

    #[test]
    fn should_build_apy_url_with_protocol_path_and_query() {
        let url = gateway().apy_url("aave", "USDC", "ethereum");
        assert_eq!(
            url,
            "http://defi.internal:8081/api/v1/protocols/aave/apy?asset=USDC&chain=ethereum"
        );
    }

    #[test]
    fn should_build_health_factor_url_with_address_and_chain() {
        let url = gateway().health_factor_url("compound", "0xabc", "base");
        assert_eq!(
            url,
            "http://defi.internal:8081/api/v1/protocols/compound/health-factor?user_address=0xabc&chain=base"
        );
    }

    #[test]
    fn should_decode_apy_response() {
        let body: ApyResponse = serde_json::from_str(r#"{"apy": 3.75}"#).unwrap();
        assert!((body.apy - 3.75).abs() < f64::EPSILON);
    }

    #[test]
    fn should_decode_health_factor_response_ignoring_extra_fields() {
        let body: HealthFactorResponse =
            serde_json::from_str(r#"{"health_factor": 1.42, "protocol": "aave"}"#).unwrap();
        assert!((body.health_factor - 1.42).abs() < f64::EPSILON);
    }

    #[test]
    fn should_fail_to_decode_apy_response_without_apy_field() {
        let result = serde_json::from_str::<ApyResponse>(r#"{"rate": 3.75}"#);
        assert!(result.is_err());
    }
}
