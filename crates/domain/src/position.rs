//! Positions — read-only market snapshots used as evaluation input.

use serde::{Deserialize, Serialize};

/// What side of a protocol a position sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    Lending,
    Borrowing,
    Staking,
}

/// A single DeFi position as reported by the market-data collaborator.
///
/// The engine never persists positions; they only travel as input to
/// trigger evaluation and risk forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Protocol the position lives on, e.g. `"aave"`.
    pub protocol: String,
    /// Chain the position lives on, e.g. `"ethereum"`.
    pub chain: String,
    /// Asset symbol, e.g. `"USDC"`.
    pub asset: String,
    #[serde(rename = "position_type")]
    pub kind: PositionKind,
    pub amount: f64,
    pub apy: f64,
    /// Contract address backing the position.
    pub address: String,
}
