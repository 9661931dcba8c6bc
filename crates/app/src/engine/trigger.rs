//! Trigger evaluation — decides whether a rule's condition currently holds.
//!
//! Pure strategy dispatch on the rule's trigger type tag. Each strategy
//! decodes the open config map into its own typed struct, queries the
//! relevant collaborator, and compares against the configured threshold.
//! All comparators are strict: equality at the threshold never fires.

use std::str::FromStr;

use defipilot_domain::error::{ConfigKeyError, DefiPilotError, NotFoundError};
use defipilot_domain::id::UserId;
use defipilot_domain::rule::{AutomationRule, ConfigMap, TriggerKind};

use crate::ports::{MarketDataGateway, RiskGateway, UserRepository};

const DEFAULT_CHAIN: &str = "ethereum";
const DEFAULT_LENDING_PROTOCOL: &str = "aave";

/// Typed view of an `apy_drop` trigger configuration.
#[derive(Debug)]
struct ApyDropConfig {
    protocol: String,
    asset: String,
    threshold: f64,
    chain: String,
}

impl ApyDropConfig {
    fn decode(config: &ConfigMap) -> Result<Self, ConfigKeyError> {
        Ok(Self {
            protocol: config.require_str("protocol")?.to_string(),
            asset: config.require_str("asset")?.to_string(),
            threshold: config.require_f64("threshold")?,
            chain: config.str_or("chain", DEFAULT_CHAIN).to_string(),
        })
    }
}

/// Typed view of a `health_factor` trigger configuration.
#[derive(Debug)]
struct HealthFactorConfig {
    threshold: f64,
    protocol: String,
    chain: String,
}

impl HealthFactorConfig {
    fn decode(config: &ConfigMap) -> Result<Self, ConfigKeyError> {
        Ok(Self {
            threshold: config.require_f64("threshold")?,
            protocol: config
                .str_or("protocol", DEFAULT_LENDING_PROTOCOL)
                .to_string(),
            chain: config.str_or("chain", DEFAULT_CHAIN).to_string(),
        })
    }
}

/// Typed view of a `risk_threshold` trigger configuration.
#[derive(Debug)]
struct RiskThresholdConfig {
    threshold: f64,
}

impl RiskThresholdConfig {
    fn decode(config: &ConfigMap) -> Result<Self, ConfigKeyError> {
        Ok(Self {
            threshold: config.require_f64("threshold")?,
        })
    }
}

/// Evaluates rule triggers against live market and risk data.
pub struct TriggerEvaluator<M, R, U> {
    market: M,
    risk: R,
    users: U,
}

impl<M, R, U> TriggerEvaluator<M, R, U>
where
    M: MarketDataGateway,
    R: RiskGateway,
    U: UserRepository,
{
    /// Create a new evaluator over the given gateways.
    pub fn new(market: M, risk: R, users: U) -> Self {
        Self {
            market,
            risk,
            users,
        }
    }

    /// Decide whether `rule`'s trigger condition currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::UnknownTriggerType`] for an unrecognized
    /// type tag, [`DefiPilotError::Config`] for a missing or mistyped
    /// required key, and any [`DefiPilotError::Downstream`] /
    /// [`DefiPilotError::NotFound`] raised while resolving data. None of
    /// these is ever reported as "not fired".
    pub async fn evaluate(&self, rule: &AutomationRule) -> Result<bool, DefiPilotError> {
        match TriggerKind::from_str(&rule.trigger_type)? {
            TriggerKind::ApyDrop => self.check_apy_drop(rule).await,
            TriggerKind::HealthFactor => self.check_health_factor(rule).await,
            TriggerKind::RiskThreshold => self.check_risk_threshold(rule).await,
        }
    }

    /// Fires iff the asset's current APY is strictly below the threshold.
    async fn check_apy_drop(&self, rule: &AutomationRule) -> Result<bool, DefiPilotError> {
        let config = ApyDropConfig::decode(&rule.trigger_config)?;
        let apy = self
            .market
            .current_apy(&config.protocol, &config.asset, &config.chain)
            .await?;
        Ok(apy < config.threshold)
    }

    /// Fires iff the owner's health factor is strictly below the threshold.
    async fn check_health_factor(&self, rule: &AutomationRule) -> Result<bool, DefiPilotError> {
        let config = HealthFactorConfig::decode(&rule.trigger_config)?;
        let wallet = self.owner_wallet(rule.user_id).await?;
        let health_factor = self
            .market
            .health_factor(&config.protocol, &wallet, &config.chain)
            .await?;
        Ok(health_factor < config.threshold)
    }

    /// Fires iff the forecast liquidation risk strictly exceeds the
    /// threshold. Risk rises toward danger, so the comparator points the
    /// other way than the APY and health-factor strategies.
    async fn check_risk_threshold(&self, rule: &AutomationRule) -> Result<bool, DefiPilotError> {
        let config = RiskThresholdConfig::decode(&rule.trigger_config)?;
        let wallet = self.owner_wallet(rule.user_id).await?;
        // Position enumeration is not wired up yet; the forecaster
        // accepts an empty list and works from the address alone.
        let risk = self.risk.liquidation_risk(&wallet, &[]).await?;
        Ok(risk > config.threshold)
    }

    async fn owner_wallet(&self, user_id: UserId) -> Result<String, DefiPilotError> {
        let user = self.users.get_by_id(user_id).await?.ok_or_else(|| {
            DefiPilotError::from(NotFoundError {
                entity: "User",
                id: user_id.to_string(),
            })
        })?;
        Ok(user.wallet_address)
    }
}
