//! Market-data gateway port — live protocol metrics.

use std::future::Future;

use defipilot_domain::error::DefiPilotError;

/// Read-only gateway to the market-data collaborator service.
///
/// Every method is a synchronous request/response round-trip; any failure
/// (connect error, non-success status, undecodable payload) surfaces as a
/// [`DownstreamError`](defipilot_domain::error::DownstreamError) and is
/// never folded into a "condition not met" result.
pub trait MarketDataGateway {
    /// Current APY for `asset` on `protocol`, scoped to `chain`.
    fn current_apy(
        &self,
        protocol: &str,
        asset: &str,
        chain: &str,
    ) -> impl Future<Output = Result<f64, DefiPilotError>> + Send;

    /// Current lending health factor for `user_address` on `protocol`,
    /// scoped to `chain`.
    fn health_factor(
        &self,
        protocol: &str,
        user_address: &str,
        chain: &str,
    ) -> impl Future<Output = Result<f64, DefiPilotError>> + Send;
}
