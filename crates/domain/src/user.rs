//! Users — rule owners, resolved to a wallet address.

use serde::{Deserialize, Serialize};

use crate::error::{DefiPilotError, ValidationError};
use crate::id::UserId;

/// A platform user. The engine only needs enough of the user record to
/// resolve the wallet address a rule acts on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// On-chain address owned by this user, e.g. `0xabc…`.
    pub wallet_address: String,
    pub email: Option<String>,
}

impl User {
    /// Create a user with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::Validation`] when `wallet_address` is empty.
    pub fn new(wallet_address: impl Into<String>) -> Result<Self, DefiPilotError> {
        let wallet_address = wallet_address.into();
        if wallet_address.is_empty() {
            return Err(ValidationError::EmptyWalletAddress.into());
        }
        Ok(Self {
            id: UserId::new(),
            wallet_address,
            email: None,
        })
    }
}
