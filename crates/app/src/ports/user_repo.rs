//! User repository port — lookup of rule owners.

use std::future::Future;

use defipilot_domain::error::DefiPilotError;
use defipilot_domain::id::UserId;
use defipilot_domain::user::User;

/// Repository for persisting and querying [`User`]s.
///
/// The engine only reads users (to resolve a rule owner's wallet address);
/// `create` exists for the account-management collaborator and for seeding.
pub trait UserRepository {
    /// Create a new user in storage.
    fn create(&self, user: User) -> impl Future<Output = Result<User, DefiPilotError>> + Send;

    /// Get a user by their unique identifier.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, DefiPilotError>> + Send;
}
