//! Recurring evaluation loop.
//!
//! One pass runs immediately at startup, then one per elapsed interval.
//! Passes execute inline on the scheduler's own task, so they are
//! naturally serialized: a rule can never be picked up by two
//! overlapping passes, which is what keeps the per-rule
//! at-most-one-execution-per-tick invariant. Shutdown is observed
//! between passes only; a pass that has already been dispatched
//! completes its rules before the loop exits.

use std::time::Duration;

use tokio::sync::watch;

use crate::engine::processor::RuleProcessor;
use crate::ports::{MarketDataGateway, RiskGateway, RuleRepository, UserRepository};

/// Drives the engine: fetches enabled rules on a fixed interval and
/// feeds each one to the [`RuleProcessor`].
pub struct Scheduler<M, R, U, S> {
    processor: RuleProcessor<M, R, U, S>,
    rules: S,
    interval: Duration,
}

impl<M, R, U, S> Scheduler<M, R, U, S>
where
    M: MarketDataGateway,
    R: RiskGateway,
    U: UserRepository,
    S: RuleRepository + Clone,
{
    /// Create a new scheduler that evaluates every `interval`.
    pub fn new(processor: RuleProcessor<M, R, U, S>, rules: S, interval: Duration) -> Self {
        Self {
            processor,
            rules,
            interval,
        }
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// The first tick completes immediately, giving the initial pass;
    /// later ticks stay at their fixed offsets regardless of how long a
    /// pass takes.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "automation engine started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => self.run_pass().await,
            }
        }

        tracing::info!("automation engine stopped");
    }

    /// One evaluation pass over all enabled rules.
    ///
    /// A fetch failure skips the whole pass (there is nothing to iterate
    /// over) and the loop simply tries again at the next tick.
    async fn run_pass(&self) {
        let rules = match self.rules.get_enabled().await {
            Ok(rules) => rules,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch automation rules, skipping pass");
                return;
            }
        };

        tracing::debug!(rule_count = rules.len(), "evaluation pass started");
        for rule in &rules {
            let outcome = self.processor.process(rule).await;
            tracing::debug!(rule_id = %rule.id, ?outcome, "rule processed");
        }
    }
}
