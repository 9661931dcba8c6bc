//! Risk gateway port — liquidation-risk forecasts.

use std::future::Future;

use defipilot_domain::error::DefiPilotError;
use defipilot_domain::position::Position;

/// Read-only gateway to the risk-forecast collaborator service.
pub trait RiskGateway {
    /// Forecast liquidation-risk score for `user_address` given the
    /// supplied positions (an empty list asks the forecaster to work
    /// from the address alone).
    fn liquidation_risk(
        &self,
        user_address: &str,
        positions: &[Position],
    ) -> impl Future<Output = Result<f64, DefiPilotError>> + Send;
}
