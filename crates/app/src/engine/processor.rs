//! Per-rule processing — trigger, action, bookkeeping, failure isolation.
//!
//! One call to [`RuleProcessor::process`] handles exactly one rule for
//! exactly one pass. Nothing a single rule does — bad configuration,
//! unknown type tags, a collaborator outage — escapes past this
//! boundary; the failure is logged with the rule's identity and the
//! batch moves on.

use defipilot_domain::error::DefiPilotError;
use defipilot_domain::rule::AutomationRule;
use defipilot_domain::time;

use crate::engine::action::ActionExecutor;
use crate::engine::trigger::TriggerEvaluator;
use crate::ports::{MarketDataGateway, RiskGateway, RuleRepository, UserRepository};

/// What one pass over one rule produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Trigger did not fire; no side effect.
    NotTriggered,
    /// Action ran and the execution was recorded.
    Executed,
    /// Action ran but the bookkeeping write failed. The downstream
    /// effect already happened, so this is a visible inconsistency the
    /// operator must reconcile — it is not retried.
    ExecutedUnrecorded,
    /// Evaluation or execution failed; bookkeeping untouched.
    Failed,
}

/// Runs a single rule through trigger evaluation, action execution, and
/// execution bookkeeping.
pub struct RuleProcessor<M, R, U, S> {
    triggers: TriggerEvaluator<M, R, U>,
    actions: ActionExecutor<U>,
    rules: S,
}

impl<M, R, U, S> RuleProcessor<M, R, U, S>
where
    M: MarketDataGateway,
    R: RiskGateway,
    U: UserRepository,
    S: RuleRepository,
{
    /// Create a new processor.
    pub fn new(triggers: TriggerEvaluator<M, R, U>, actions: ActionExecutor<U>, rules: S) -> Self {
        Self {
            triggers,
            actions,
            rules,
        }
    }

    /// Process one rule for the current pass. Never propagates an error.
    pub async fn process(&self, rule: &AutomationRule) -> Outcome {
        match self.run(rule).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    rule_id = %rule.id,
                    rule_name = %rule.name,
                    error = %err,
                    "rule processing failed"
                );
                Outcome::Failed
            }
        }
    }

    async fn run(&self, rule: &AutomationRule) -> Result<Outcome, DefiPilotError> {
        let fired = self.triggers.evaluate(rule).await?;
        if !fired {
            return Ok(Outcome::NotTriggered);
        }

        tracing::info!(rule_id = %rule.id, rule_name = %rule.name, "trigger fired");
        self.actions.execute(rule).await?;

        // The action already took effect downstream; retrying the write
        // could double-execute it, so a failure here is only surfaced.
        let executed_at = time::now();
        if let Err(err) = self.rules.record_execution(rule.id, executed_at).await {
            tracing::error!(
                rule_id = %rule.id,
                error = %err,
                "bookkeeping write failed after successful action"
            );
            return Ok(Outcome::ExecutedUnrecorded);
        }

        Ok(Outcome::Executed)
    }
}
