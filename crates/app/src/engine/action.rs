//! Action execution — performs a rule's configured effect once its
//! trigger has fired.
//!
//! Pure strategy dispatch on the rule's action type tag. Execution is
//! confined to this call: no action strategy touches the rule's
//! bookkeeping fields, which belong to the
//! [`RuleProcessor`](crate::engine::RuleProcessor).

use std::str::FromStr;

use defipilot_domain::error::{ConfigKeyError, DefiPilotError, NotFoundError};
use defipilot_domain::id::UserId;
use defipilot_domain::rule::{ActionKind, AutomationRule, ConfigMap};

use crate::ports::UserRepository;

/// Best-effort view of a `rebalance` action configuration.
///
/// A rebalance is currently notification-only (see [`ActionExecutor`]),
/// so absent or mistyped fields decay to zero values instead of failing
/// the rule.
#[derive(Debug)]
struct RebalancePlan {
    from_protocol: String,
    to_protocol: String,
    asset: String,
    amount: f64,
}

impl RebalancePlan {
    fn decode(config: &ConfigMap) -> Self {
        Self {
            from_protocol: config.str_or("from_protocol", "").to_string(),
            to_protocol: config.str_or("to_protocol", "").to_string(),
            asset: config.str_or("asset", "").to_string(),
            amount: config.f64_or("amount", 0.0),
        }
    }
}

/// Executes rule actions against downstream services.
///
/// The movement strategies stop at structured logging today: building,
/// signing, and submitting the underlying transactions belongs to a
/// separate collaborator service, and this executor is the seam where it
/// gets wired in.
pub struct ActionExecutor<U> {
    users: U,
}

impl<U: UserRepository> ActionExecutor<U> {
    /// Create a new executor over the given user repository.
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Perform `rule`'s configured action.
    ///
    /// # Errors
    ///
    /// Returns [`DefiPilotError::UnknownActionType`] for an unrecognized
    /// type tag, [`DefiPilotError::Config`] when the action config is
    /// absent, and [`DefiPilotError::NotFound`] when the owning user
    /// cannot be resolved.
    pub async fn execute(&self, rule: &AutomationRule) -> Result<(), DefiPilotError> {
        match ActionKind::from_str(&rule.action_type)? {
            ActionKind::Rebalance => self.execute_rebalance(rule).await,
            ActionKind::Withdraw => Self::execute_withdraw(rule),
            ActionKind::Deposit => Self::execute_deposit(rule),
        }
    }

    async fn execute_rebalance(&self, rule: &AutomationRule) -> Result<(), DefiPilotError> {
        require_config(&rule.action_config)?;
        let plan = RebalancePlan::decode(&rule.action_config);
        let wallet = self.owner_wallet(rule.user_id).await?;

        tracing::info!(
            rule_id = %rule.id,
            wallet = %wallet,
            from_protocol = %plan.from_protocol,
            to_protocol = %plan.to_protocol,
            asset = %plan.asset,
            amount = plan.amount,
            "rebalance requested"
        );
        Ok(())
    }

    fn execute_withdraw(rule: &AutomationRule) -> Result<(), DefiPilotError> {
        require_config(&rule.action_config)?;
        tracing::info!(rule_id = %rule.id, "withdraw requested");
        Ok(())
    }

    fn execute_deposit(rule: &AutomationRule) -> Result<(), DefiPilotError> {
        require_config(&rule.action_config)?;
        tracing::info!(rule_id = %rule.id, "deposit requested");
        Ok(())
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

/// An action with no configuration at all was never authored on purpose;
/// an empty map stands in for the absent config the CRUD layer allows.
fn require_config(config: &ConfigMap) -> Result<(), ConfigKeyError> {
    if config.is_empty() {
        return Err(ConfigKeyError::Missing {
            key: "action_config",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use defipilot_domain::user::User;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryUserRepo {
        store: Arc<Mutex<HashMap<UserId, User>>>,
    }

    impl InMemoryUserRepo {
        fn with(users: Vec<User>) -> Self {
            let map: HashMap<_, _> = users.into_iter().map(|u| (u.id, u)).collect();
            Self {
                store: Arc::new(Mutex::new(map)),
            }
        }
    }

    impl UserRepository for InMemoryUserRepo {
        fn create(&self, user: User) -> impl Future<Output = Result<User, DefiPilotError>> + Send {
            self.store.lock().unwrap().insert(user.id, user.clone());
            async { Ok(user) }
        }

        fn get_by_id(
            &self,
            id: UserId,
        ) -> impl Future<Output = Result<Option<User>, DefiPilotError>> + Send {
            let user = self.store.lock().unwrap().get(&id).cloned();
            async { Ok(user) }
        }
    }

    fn rebalance_rule(user_id: UserId, config: ConfigMap) -> AutomationRule {
        AutomationRule::builder()
            .user_id(user_id)
            .name("Rebalance rule")
            .trigger(
                "apy_drop",
                ConfigMap::default()
                    .with("protocol", "aave")
                    .with("asset", "USDC")
                    .with("threshold", 3.0),
            )
            .action("rebalance", config)
            .build()
            .unwrap()
    }

    fn full_rebalance_config() -> ConfigMap {
        ConfigMap::default()
            .with("from_protocol", "aave")
            .with("to_protocol", "compound")
            .with("asset", "USDC")
            .with("amount", 500.0)
    }

    #[tokio::test]
    async fn should_execute_rebalance_with_full_config() {
        let user = User::new("0xowner").unwrap();
        let executor = ActionExecutor::new(InMemoryUserRepo::with(vec![user.clone()]));
        let rule = rebalance_rule(user.id, full_rebalance_config());

        assert!(executor.execute(&rule).await.is_ok());
    }

    #[tokio::test]
    async fn should_execute_rebalance_with_partial_config() {
        // Absent movement fields decay to zero values; only a fully
        // absent config fails.
        let user = User::new("0xowner").unwrap();
        let executor = ActionExecutor::new(InMemoryUserRepo::with(vec![user.clone()]));
        let rule = rebalance_rule(user.id, ConfigMap::default().with("asset", "USDC"));

        assert!(executor.execute(&rule).await.is_ok());
    }

    #[tokio::test]
    async fn should_error_when_rebalance_config_is_absent() {
        let user = User::new("0xowner").unwrap();
        let executor = ActionExecutor::new(InMemoryUserRepo::with(vec![user.clone()]));
        let rule = rebalance_rule(user.id, ConfigMap::default());

        let result = executor.execute(&rule).await;
        assert!(matches!(result, Err(DefiPilotError::Config(_))));
    }

    #[tokio::test]
    async fn should_error_when_rebalance_owner_is_missing() {
        let executor = ActionExecutor::new(InMemoryUserRepo::default());
        let rule = rebalance_rule(UserId::new(), full_rebalance_config());

        let result = executor.execute(&rule).await;
        assert!(matches!(result, Err(DefiPilotError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_execute_withdraw_when_config_present() {
        let executor = ActionExecutor::new(InMemoryUserRepo::default());
        let mut rule = rebalance_rule(UserId::new(), ConfigMap::default().with("asset", "USDC"));
        rule.action_type = "withdraw".to_string();

        assert!(executor.execute(&rule).await.is_ok());
    }

    #[tokio::test]
    async fn should_error_when_withdraw_config_is_absent() {
        let executor = ActionExecutor::new(InMemoryUserRepo::default());
        let mut rule = rebalance_rule(UserId::new(), ConfigMap::default());
        rule.action_type = "withdraw".to_string();

        let result = executor.execute(&rule).await;
        assert!(matches!(result, Err(DefiPilotError::Config(_))));
    }

    #[tokio::test]
    async fn should_execute_deposit_when_config_present() {
        let executor = ActionExecutor::new(InMemoryUserRepo::default());
        let mut rule = rebalance_rule(UserId::new(), ConfigMap::default().with("asset", "ETH"));
        rule.action_type = "deposit".to_string();

        assert!(executor.execute(&rule).await.is_ok());
    }

    #[tokio::test]
    async fn should_error_on_unknown_action_type() {
        let executor = ActionExecutor::new(InMemoryUserRepo::default());
        let mut rule = rebalance_rule(UserId::new(), full_rebalance_config());
        rule.action_type = "notify".to_string();

        let result = executor.execute(&rule).await;
        assert!(matches!(
            result,
            Err(DefiPilotError::UnknownActionType(tag)) if tag == "notify"
        ));
    }

    #[test]
    fn should_decode_rebalance_plan_with_zero_value_defaults() {
        let plan = RebalancePlan::decode(&ConfigMap::default().with("asset", "USDC"));
        assert_eq!(plan.asset, "USDC");
        assert_eq!(plan.from_protocol, "");
        assert_eq!(plan.to_protocol, "");
        assert!(plan.amount.abs() < f64::EPSILON);
    }
}
