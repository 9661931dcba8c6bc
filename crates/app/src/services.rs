//! Application services — use-cases exposed to driving adapters.

pub mod rule_service;

pub use rule_service::RuleService;
