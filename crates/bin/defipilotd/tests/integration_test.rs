//! End-to-end tests for the assembled engine.
//!
//! Each test wires the real engine (scheduler, processor, evaluators)
//! against an in-memory `SQLite` database with real repositories; only
//! the downstream HTTP collaborators are replaced by in-process stubs.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use defipilot_adapter_storage_sqlite_sqlx::{
    Config, SqliteRuleRepository, SqliteUserRepository,
};
use defipilot_app::engine::{ActionExecutor, RuleProcessor, Scheduler, TriggerEvaluator};
use defipilot_app::ports::{MarketDataGateway, RiskGateway, RuleRepository, UserRepository};
use defipilot_domain::error::DefiPilotError;
use defipilot_domain::position::Position;
use defipilot_domain::rule::{AutomationRule, ConfigMap};
use defipilot_domain::user::User;

// ── Downstream stubs ────────────────────────────────────────────────

#[derive(Clone)]
struct StubMarket {
    apy: f64,
}

impl MarketDataGateway for StubMarket {
    fn current_apy(
        &self,
        _protocol: &str,
        _asset: &str,
        _chain: &str,
    ) -> impl Future<Output = Result<f64, DefiPilotError>> + Send {
        let apy = self.apy;
        async move { Ok(apy) }
    }

    fn health_factor(
        &self,
        _protocol: &str,
        _user_address: &str,
        _chain: &str,
    ) -> impl Future<Output = Result<f64, DefiPilotError>> + Send {
        async { Ok(10.0) }
    }
}

#[derive(Clone)]
struct StubRisk;

impl RiskGateway for StubRisk {
    fn liquidation_risk(
        &self,
        _user_address: &str,
        _positions: &[Position],
    ) -> impl Future<Output = Result<f64, DefiPilotError>> + Send {
        async { Ok(0.0) }
    }
}

// ── Wiring helpers ──────────────────────────────────────────────────

async fn repos() -> (SqliteRuleRepository, SqliteUserRepository) {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let pool = db.pool().clone();
    (
        SqliteRuleRepository::new(pool.clone()),
        SqliteUserRepository::new(pool),
    )
}

fn engine(
    apy: f64,
    rule_repo: SqliteRuleRepository,
    user_repo: SqliteUserRepository,
) -> Scheduler<StubMarket, StubRisk, SqliteUserRepository, SqliteRuleRepository> {
    let processor = RuleProcessor::new(
        TriggerEvaluator::new(StubMarket { apy }, StubRisk, user_repo.clone()),
        ActionExecutor::new(user_repo),
        rule_repo.clone(),
    );
    Scheduler::new(processor, rule_repo, Duration::from_secs(3600))
}

/// Run exactly the initial pass, then shut the scheduler down.
async fn run_one_pass(
    sched: Scheduler<StubMarket, StubRisk, SqliteUserRepository, SqliteRuleRepository>,
) {
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move { sched.run(rx).await });
    tokio::time::sleep(Duration::from_millis(250)).await;
    tx.send(true).unwrap();
    handle.await.unwrap();
}

fn firing_apy_rule(user: &User) -> AutomationRule {
    AutomationRule::builder()
        .user_id(user.id)
        .name("Exit on falling APY")
        .trigger(
            "apy_drop",
            ConfigMap::default()
                .with("protocol", "aave")
                .with("asset", "USDC")
                .with("threshold", 3.0),
        )
        .action("withdraw", ConfigMap::default().with("asset", "USDC"))
        .build()
        .unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_execute_valid_rule_and_isolate_invalid_one_in_same_pass() {
    let (rule_repo, user_repo) = repos().await;
    let user = user_repo.create(User::new("0xowner").unwrap()).await.unwrap();

    let valid = rule_repo.create(firing_apy_rule(&user)).await.unwrap();
    let mut broken = firing_apy_rule(&user);
    broken.name = "Broken rule".to_string();
    broken.trigger_type = "price_spike".to_string();
    let broken = rule_repo.create(broken).await.unwrap();

    run_one_pass(engine(2.0, rule_repo.clone(), user_repo)).await;

    let valid = rule_repo.get_by_id(valid.id).await.unwrap().unwrap();
    let broken = rule_repo.get_by_id(broken.id).await.unwrap().unwrap();
    assert_eq!(valid.execution_count, 1);
    assert!(valid.last_executed_at.is_some());
    assert_eq!(broken.execution_count, 0);
    assert!(broken.last_executed_at.is_none());
}

#[tokio::test]
async fn should_never_process_disabled_rules() {
    let (rule_repo, user_repo) = repos().await;
    let user = user_repo.create(User::new("0xowner").unwrap()).await.unwrap();

    let mut disabled = firing_apy_rule(&user);
    disabled.enabled = false;
    let disabled = rule_repo.create(disabled).await.unwrap();

    // APY well below the threshold: the trigger would fire if evaluated.
    run_one_pass(engine(0.5, rule_repo.clone(), user_repo)).await;

    let disabled = rule_repo.get_by_id(disabled.id).await.unwrap().unwrap();
    assert_eq!(disabled.execution_count, 0);
    assert!(disabled.last_executed_at.is_none());
}

#[tokio::test]
async fn should_not_credit_rule_whose_action_fails() {
    let (rule_repo, user_repo) = repos().await;
    let user = user_repo.create(User::new("0xowner").unwrap()).await.unwrap();

    let mut rule = firing_apy_rule(&user);
    // An absent action config makes the action fail after the trigger fires.
    rule.action_config = ConfigMap::default();
    let rule = rule_repo.create(rule).await.unwrap();

    run_one_pass(engine(2.0, rule_repo.clone(), user_repo)).await;

    let rule = rule_repo.get_by_id(rule.id).await.unwrap().unwrap();
    assert_eq!(rule.execution_count, 0);
    assert!(rule.last_executed_at.is_none());
}

#[tokio::test]
async fn should_not_execute_when_condition_does_not_hold() {
    let (rule_repo, user_repo) = repos().await;
    let user = user_repo.create(User::new("0xowner").unwrap()).await.unwrap();
    let rule = rule_repo.create(firing_apy_rule(&user)).await.unwrap();

    // APY above the threshold: nothing should happen.
    run_one_pass(engine(4.5, rule_repo.clone(), user_repo)).await;

    let rule = rule_repo.get_by_id(rule.id).await.unwrap().unwrap();
    assert_eq!(rule.execution_count, 0);
}

#[tokio::test]
async fn should_stamp_execution_time_no_earlier_than_pass_start() {
    let (rule_repo, user_repo) = repos().await;
    let user = user_repo.create(User::new("0xowner").unwrap()).await.unwrap();
    let rule = rule_repo.create(firing_apy_rule(&user)).await.unwrap();

    let before = defipilot_domain::time::now();
    run_one_pass(engine(2.0, rule_repo.clone(), user_repo)).await;

    let rule = rule_repo.get_by_id(rule.id).await.unwrap().unwrap();
    assert_eq!(rule.execution_count, 1);
    assert!(rule.last_executed_at.unwrap() >= before);
}
