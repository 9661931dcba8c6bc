//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DefiPilotError`] via `#[from]`; storage adapters box their error
//! behind the [`DefiPilotError::Storage`] variant so the domain stays
//! free of driver types.

/// Top-level error for the defipilot workspace.
#[derive(Debug, thiserror::Error)]
pub enum DefiPilotError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced aggregate does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A trigger or action configuration map is missing or mistyped.
    #[error("configuration error")]
    Config(#[from] ConfigKeyError),

    /// A rule carries a trigger type tag outside the recognized set.
    #[error("unknown trigger type: {0}")]
    UnknownTriggerType(String),

    /// A rule carries an action type tag outside the recognized set.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    /// A collaborator service call failed.
    #[error("downstream error")]
    Downstream(#[from] DownstreamError),

    /// A persistence operation failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Rule name is empty.
    #[error("rule name must not be empty")]
    EmptyName,
    /// Rule has no trigger type tag.
    #[error("trigger type must not be empty")]
    EmptyTriggerType,
    /// Rule has no action type tag.
    #[error("action type must not be empty")]
    EmptyActionType,
    /// Rule has no owning user.
    #[error("rule must reference an owning user")]
    MissingOwner,
    /// User wallet address is empty.
    #[error("wallet address must not be empty")]
    EmptyWalletAddress,
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Aggregate name, e.g. `"AutomationRule"`.
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

/// A required trigger/action config key is missing or mistyped.
///
/// Scoped to a single evaluation of a single rule: config maps are
/// user-authored and only validated lazily, when a strategy decodes them.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigKeyError {
    /// The key is absent from the map.
    #[error("required config key `{key}` is missing")]
    Missing {
        /// Name of the missing key.
        key: &'static str,
    },
    /// The key is present but holds the wrong JSON type.
    #[error("config key `{key}` must be a {expected}")]
    WrongType {
        /// Name of the offending key.
        key: &'static str,
        /// Expected JSON type, e.g. `"string"` or `"number"`.
        expected: &'static str,
    },
}

/// A collaborator service call failed.
///
/// Any of these is a hard error for the evaluation that issued the call;
/// none of them is ever treated as "condition not met".
#[derive(Debug, thiserror::Error)]
pub enum DownstreamError {
    /// The request could not be sent or timed out.
    #[error("{service} request failed")]
    Request {
        /// Collaborator name, e.g. `"defi-service"`.
        service: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The collaborator answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status {
        /// Collaborator name.
        service: &'static str,
        /// HTTP status code of the response.
        status: u16,
    },
    /// The response body could not be decoded.
    #[error("{service} returned an undecodable payload")]
    Decode {
        /// Collaborator name.
        service: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "AutomationRule",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "AutomationRule not found: 42");
    }

    #[test]
    fn should_display_missing_config_key() {
        let err = ConfigKeyError::Missing { key: "threshold" };
        assert_eq!(
            err.to_string(),
            "required config key `threshold` is missing"
        );
    }

    #[test]
    fn should_display_wrong_type_config_key() {
        let err = ConfigKeyError::WrongType {
            key: "threshold",
            expected: "number",
        };
        assert_eq!(err.to_string(), "config key `threshold` must be a number");
    }

    #[test]
    fn should_convert_config_key_error_into_top_level_error() {
        let err: DefiPilotError = ConfigKeyError::Missing { key: "asset" }.into();
        assert!(matches!(err, DefiPilotError::Config(_)));
    }

    #[test]
    fn should_display_downstream_status_error() {
        let err = DownstreamError::Status {
            service: "defi-service",
            status: 503,
        };
        assert_eq!(err.to_string(), "defi-service returned status 503");
    }
}
