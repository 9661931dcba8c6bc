//! Recognized trigger and action type tags.
//!
//! Rules store their type tags as open strings (the CRUD collaborator
//! accepts whatever the user authored); the engine parses them into
//! these closed enums at evaluation time. An unrecognized tag is a hard
//! error for that rule only — the rest of the pass is unaffected.

use std::fmt;
use std::str::FromStr;

use crate::error::DefiPilotError;

/// Condition families the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Fires when an asset's APY on a protocol falls below a threshold.
    ApyDrop,
    /// Fires when the owner's lending health factor falls below a threshold.
    HealthFactor,
    /// Fires when the owner's forecast liquidation risk exceeds a threshold.
    RiskThreshold,
}

impl TriggerKind {
    /// The wire/storage tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApyDrop => "apy_drop",
            Self::HealthFactor => "health_factor",
            Self::RiskThreshold => "risk_threshold",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = DefiPilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apy_drop" => Ok(Self::ApyDrop),
            "health_factor" => Ok(Self::HealthFactor),
            "risk_threshold" => Ok(Self::RiskThreshold),
            other => Err(DefiPilotError::UnknownTriggerType(other.to_string())),
        }
    }
}

/// Effect families the engine knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Move an asset amount from one protocol to another.
    Rebalance,
    /// Withdraw a position.
    Withdraw,
    /// Deposit into a position.
    Deposit,
}

impl ActionKind {
    /// The wire/storage tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rebalance => "rebalance",
            Self::Withdraw => "withdraw",
            Self::Deposit => "deposit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = DefiPilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rebalance" => Ok(Self::Rebalance),
            "withdraw" => Ok(Self::Withdraw),
            "deposit" => Ok(Self::Deposit),
            other => Err(DefiPilotError::UnknownActionType(other.to_string())),
        }
    }
}
