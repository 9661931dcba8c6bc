//! Open configuration maps for triggers and actions.
//!
//! Rules are authored through the CRUD collaborator and each trigger or
//! action type has its own key schema, so the storage representation
//! stays an open JSON object. Strategies decode the keys they need with
//! the typed accessors here; a missing or mistyped key fails that single
//! evaluation, never the whole batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigKeyError;

/// String-keyed JSON object holding per-type trigger/action parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap(serde_json::Map<String, Value>);

impl ConfigMap {
    /// Whether the map holds no keys at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a value, consuming and returning the map (test/builder helper).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw access to a key's JSON value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Required string key.
    ///
    /// # Errors
    ///
    /// [`ConfigKeyError::Missing`] when absent, [`ConfigKeyError::WrongType`]
    /// when present but not a string.
    pub fn require_str(&self, key: &'static str) -> Result<&str, ConfigKeyError> {
        match self.0.get(key) {
            None => Err(ConfigKeyError::Missing { key }),
            Some(value) => value.as_str().ok_or(ConfigKeyError::WrongType {
                key,
                expected: "string",
            }),
        }
    }

    /// Required numeric key.
    ///
    /// # Errors
    ///
    /// [`ConfigKeyError::Missing`] when absent, [`ConfigKeyError::WrongType`]
    /// when present but not a number.
    pub fn require_f64(&self, key: &'static str) -> Result<f64, ConfigKeyError> {
        match self.0.get(key) {
            None => Err(ConfigKeyError::Missing { key }),
            Some(value) => value.as_f64().ok_or(ConfigKeyError::WrongType {
                key,
                expected: "number",
            }),
        }
    }

    /// Optional string key: the default applies when the key is absent
    /// or holds a non-string value.
    #[must_use]
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Optional numeric key: the default applies when the key is absent
    /// or holds a non-numeric value.
    #[must_use]
    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).and_then(Value::as_f64).unwrap_or(default)
    }
}

impl FromIterator<(String, Value)> for ConfigMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigMap {
        ConfigMap::default()
            .with("protocol", "aave")
            .with("threshold", 1.25)
            .with("count", 3)
    }

    #[test]
    fn should_return_required_string() {
        assert_eq!(sample().require_str("protocol").unwrap(), "aave");
    }

    #[test]
    fn should_error_when_required_string_is_missing() {
        assert_eq!(
            sample().require_str("asset"),
            Err(ConfigKeyError::Missing { key: "asset" })
        );
    }

    #[test]
    fn should_error_when_required_string_has_wrong_type() {
        assert_eq!(
            sample().require_str("threshold"),
            Err(ConfigKeyError::WrongType {
                key: "threshold",
                expected: "string",
            })
        );
    }

    #[test]
    fn should_return_required_number() {
        let value = sample().require_f64("threshold").unwrap();
        assert!((value - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn should_accept_integer_json_values_as_numbers() {
        let value = sample().require_f64("count").unwrap();
        assert!((value - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_error_when_required_number_is_missing() {
        assert_eq!(
            sample().require_f64("amount"),
            Err(ConfigKeyError::Missing { key: "amount" })
        );
    }

    #[test]
    fn should_error_when_required_number_has_wrong_type() {
        assert_eq!(
            sample().require_f64("protocol"),
            Err(ConfigKeyError::WrongType {
                key: "protocol",
                expected: "number",
            })
        );
    }

    #[test]
    fn should_fall_back_to_default_for_optional_string() {
        assert_eq!(sample().str_or("chain", "ethereum"), "ethereum");
    }

    #[test]
    fn should_prefer_present_value_over_default_for_optional_string() {
        let config = sample().with("chain", "base");
        assert_eq!(config.str_or("chain", "ethereum"), "base");
    }

    #[test]
    fn should_fall_back_to_default_when_optional_string_is_mistyped() {
        let config = sample().with("chain", 8453);
        assert_eq!(config.str_or("chain", "ethereum"), "ethereum");
    }

    #[test]
    fn should_fall_back_to_default_for_optional_number() {
        let value = sample().f64_or("amount", 0.0);
        assert!(value.abs() < f64::EPSILON);
    }

    #[test]
    fn should_report_empty_map() {
        assert!(ConfigMap::default().is_empty());
        assert!(!sample().is_empty());
    }

    #[test]
    fn should_roundtrip_through_serde_json_as_plain_object() {
        let config = sample();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.starts_with('{'));
        let parsed: ConfigMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
