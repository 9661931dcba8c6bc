//! Rule repository port — persistence for automation rules.

use std::future::Future;

use defipilot_domain::error::DefiPilotError;
use defipilot_domain::id::RuleId;
use defipilot_domain::rule::AutomationRule;
use defipilot_domain::time::Timestamp;

/// Repository for persisting and querying [`AutomationRule`]s.
pub trait RuleRepository {
    /// Create a new rule in storage.
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, DefiPilotError>> + Send;

    /// Get a rule by its unique identifier.
    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, DefiPilotError>> + Send;

    /// Get all rules.
    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, DefiPilotError>> + Send;

    /// Get all enabled rules. This is the set one scheduler pass iterates over.
    fn get_enabled(
        &self,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, DefiPilotError>> + Send;

    /// Update an existing rule.
    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, DefiPilotError>> + Send;

    /// Delete a rule by its unique identifier.
    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), DefiPilotError>> + Send;

    /// Record one successful execution: set `last_executed_at` and bump
    /// `execution_count` by exactly one, in a single atomic write against
    /// the stored row (never against a value read earlier).
    fn record_execution(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> impl Future<Output = Result<(), DefiPilotError>> + Send;
}
