//! `SQLite` implementation of [`RuleRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use defipilot_app::ports::RuleRepository;
use defipilot_domain::error::{DefiPilotError, NotFoundError};
use defipilot_domain::id::{RuleId, UserId};
use defipilot_domain::rule::{AutomationRule, ConfigMap};
use defipilot_domain::time::Timestamp;

use crate::error::StorageError;

struct Wrapper(AutomationRule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AutomationRule> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let name: String = row.try_get("name")?;
        let description: Option<String> = row.try_get("description")?;
        let enabled: bool = row.try_get("enabled")?;
        let trigger_type: String = row.try_get("trigger_type")?;
        let trigger_config_json: String = row.try_get("trigger_config")?;
        let action_type: String = row.try_get("action_type")?;
        let action_config_json: String = row.try_get("action_config")?;
        let last_executed_at_str: Option<String> = row.try_get("last_executed_at")?;
        let execution_count: i64 = row.try_get("execution_count")?;

        let id = RuleId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let user_id =
            UserId::from_str(&user_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let trigger_config: ConfigMap = serde_json::from_str(&trigger_config_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let action_config: ConfigMap = serde_json::from_str(&action_config_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let last_executed_at = last_executed_at_str
            .map(|s| {
                chrono::DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.to_utc())
                    .map_err(|err| sqlx::Error::Decode(Box::new(err)))
            })
            .transpose()?;

        Ok(Self(AutomationRule {
            id,
            user_id,
            name,
            description,
            enabled,
            trigger_type,
            trigger_config,
            action_type,
            action_config,
            last_executed_at,
            execution_count,
        }))
    }
}

/// `SQLite`-backed rule repository.
#[derive(Clone)]
pub struct SqliteRuleRepository {
    pool: SqlitePool,
}

impl SqliteRuleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RuleRepository for SqliteRuleRepository {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, DefiPilotError> {
        let trigger_config =
            serde_json::to_string(&rule.trigger_config).map_err(StorageError::from)?;
        let action_config =
            serde_json::to_string(&rule.action_config).map_err(StorageError::from)?;
        let last_executed_at = rule.last_executed_at.map(|ts| ts.to_rfc3339());

        sqlx::query(
                "INSERT INTO automation_rules (id, user_id, name, description, enabled, trigger_type, trigger_config, action_type, action_config, last_executed_at, execution_count) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(rule.id.to_string())
            .bind(rule.user_id.to_string())
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(rule.enabled)
            .bind(&rule.trigger_type)
            .bind(&trigger_config)
            .bind(&rule.action_type)
            .bind(&action_config)
            .bind(&last_executed_at)
            .bind(rule.execution_count)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn get_by_id(&self, id: RuleId) -> Result<Option<AutomationRule>, DefiPilotError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM automation_rules WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<AutomationRule>, DefiPilotError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM automation_rules ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_enabled(&self) -> Result<Vec<AutomationRule>, DefiPilotError> {
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT * FROM automation_rules WHERE enabled = 1 ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, rule: AutomationRule) -> Result<AutomationRule, DefiPilotError> {
        let trigger_config =
            serde_json::to_string(&rule.trigger_config).map_err(StorageError::from)?;
        let action_config =
            serde_json::to_string(&rule.action_config).map_err(StorageError::from)?;
        let last_executed_at = rule.last_executed_at.map(|ts| ts.to_rfc3339());

        sqlx::query(
                "UPDATE automation_rules SET user_id = ?, name = ?, description = ?, enabled = ?, trigger_type = ?, trigger_config = ?, action_type = ?, action_config = ?, last_executed_at = ?, execution_count = ? WHERE id = ?",
            )
            .bind(rule.user_id.to_string())
            .bind(&rule.name)
            .bind(&rule.description)
            .bind(rule.enabled)
            .bind(&rule.trigger_type)
            .bind(&trigger_config)
            .bind(&rule.action_type)
            .bind(&action_config)
            .bind(&last_executed_at)
            .bind(rule.execution_count)
            .bind(rule.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn delete(&self, id: RuleId) -> Result<(), DefiPilotError> {
        sqlx::query("DELETE FROM automation_rules WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn record_execution(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> Result<(), DefiPilotError> {
        // The counter moves against the stored row, never against a value
        // read earlier, so concurrent executions cannot lose an increment.
        let result = sqlx::query(
            "UPDATE automation_rules SET execution_count = execution_count + 1, last_executed_at = ? WHERE id = ?",
        )
        .bind(executed_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "AutomationRule",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
