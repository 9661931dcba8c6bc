//! Rule service — use-cases for managing automation rules.
//!
//! The CRUD transport (HTTP API) lives with another collaborator; these
//! use-cases are the validated surface it drives, and what operational
//! tooling uses directly.

use defipilot_domain::error::{DefiPilotError, NotFoundError};
use defipilot_domain::id::RuleId;
use defipilot_domain::rule::AutomationRule;

use crate::ports::RuleRepository;

/// Application service for automation-rule CRUD operations.
pub struct RuleService<R> {
    repo: R,
}

impl<R: RuleRepository> RuleService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new rule after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, rule), fields(rule_name = %rule.name))]
    pub async fn create_rule(&self, rule: AutomationRule) -> Result<AutomationRule, DefiPilotError> {
        rule.validate()?;
        self.repo.create(rule).await
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_rule(&self, id: RuleId) -> Result<AutomationRule, DefiPilotError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "AutomationRule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all rules.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_rules(&self) -> Result<Vec<AutomationRule>, DefiPilotError> {
        self.repo.get_all().await
    }

    /// Get all enabled rules.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_enabled(&self) -> Result<Vec<AutomationRule>, DefiPilotError> {
        self.repo.get_enabled().await
    }

    /// Update an existing rule.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, rule))]
    pub async fn update_rule(&self, rule: AutomationRule) -> Result<AutomationRule, DefiPilotError> {
        rule.validate()?;
        self.repo.update(rule).await
    }

    /// Delete a rule by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: RuleId) -> Result<(), DefiPilotError> {
        self.repo.delete(id).await
    }
}
