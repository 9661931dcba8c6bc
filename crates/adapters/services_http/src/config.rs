//! Configuration and construction of the downstream service gateways.

use std::time::Duration;

use crate::market_data::HttpMarketData;
use crate::risk::HttpRiskForecast;

/// Default request timeout applied to every downstream call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the downstream HTTP gateways.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the DeFi market-data service.
    pub defi_base_url: String,
    /// Base URL of the ML risk-forecast service.
    pub ml_base_url: String,
    /// Per-request timeout for every downstream call.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defi_base_url: "http://localhost:8081".to_string(),
            ml_base_url: "http://localhost:8001".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Build both gateways over one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<(HttpMarketData, HttpRiskForecast), BuildError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok((
            HttpMarketData::new(client.clone(), self.defi_base_url),
            HttpRiskForecast::new(client, self.ml_base_url),
        ))
    }
}

/// Gateway construction errors.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.defi_base_url, "http://localhost:8081");
        assert_eq!(config.ml_base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn should_build_gateways_from_default_config() {
        let result = Config::default().build();
        assert!(result.is_ok());
    }
}
