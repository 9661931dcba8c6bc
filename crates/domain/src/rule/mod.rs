//! Automation rules — trigger → action pairs evaluated against live data.
//!
//! A rule pairs a parameterized [trigger](TriggerKind) (a market or risk
//! condition) with a parameterized [action](ActionKind) to perform when
//! the condition holds. Trigger and action configuration travels as an
//! open [`ConfigMap`] because rules are user-authored and each type has
//! its own schema; strategies decode the map into typed structs at
//! evaluation time.

mod config;
mod kind;

pub use config::ConfigMap;
pub use kind::{ActionKind, TriggerKind};

use serde::{Deserialize, Serialize};

use crate::error::{DefiPilotError, ValidationError};
use crate::id::{RuleId, UserId};
use crate::time::Timestamp;

/// A user-authored automation rule.
///
/// `execution_count` and `last_executed_at` are bookkeeping fields owned
/// by the engine: they change together, only after a successful
/// trigger+action pair, and at most once per evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    /// Open trigger type tag as authored/stored, e.g. `"apy_drop"`.
    pub trigger_type: String,
    pub trigger_config: ConfigMap,
    /// Open action type tag as authored/stored, e.g. `"rebalance"`.
    pub action_type: String,
    pub action_config: ConfigMap,
    pub last_executed_at: Option<Timestamp>,
    pub execution_count: i64,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `trigger_type` is empty ([`ValidationError::EmptyTriggerType`])
    /// - `action_type` is empty ([`ValidationError::EmptyActionType`])
    pub fn validate(&self) -> Result<(), DefiPilotError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.trigger_type.is_empty() {
            return Err(ValidationError::EmptyTriggerType.into());
        }
        if self.action_type.is_empty() {
            return Err(ValidationError::EmptyActionType.into());
        }
        Ok(())
    }

    /// Record a successful execution.
    ///
    /// Both bookkeeping fields move together; there is no partial credit
    /// for a rule whose action failed.
    pub fn mark_executed(&mut self, at: Timestamp) {
        self.last_executed_at = Some(at);
        self.execution_count += 1;
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    user_id: Option<UserId>,
    name: Option<String>,
    description: Option<String>,
    enabled: Option<bool>,
    trigger_type: Option<String>,
    trigger_config: ConfigMap,
    action_type: Option<String>,
    action_config: ConfigMap,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn trigger(mut self, kind: impl Into<String>, config: ConfigMap) -> Self {
        self.trigger_type = Some(kind.into());
        self.trigger_config = config;
        self
    }

    #[must_use]
    pub fn action(mut self, kind: impl Into<String>, config: ConfigMap) -> Self {
        self.action_type = Some(kind.into());
        self.action_config = config;
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::Validation`] if required fields are
    /// missing or empty ([`ValidationError::MissingOwner`] when no owner
    /// was set).
    pub fn build(self) -> Result<AutomationRule, DefiPilotError> {
        let user_id = self.user_id.ok_or(ValidationError::MissingOwner)?;
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            user_id,
            name: self.name.unwrap_or_default(),
            description: self.description,
            enabled: self.enabled.unwrap_or(true),
            trigger_type: self.trigger_type.unwrap_or_default(),
            trigger_config: self.trigger_config,
            action_type: self.action_type.unwrap_or_default(),
            action_config: self.action_config,
            last_executed_at: None,
            execution_count: 0,
        };
        rule.validate()?;
        Ok(rule)
    }
}
