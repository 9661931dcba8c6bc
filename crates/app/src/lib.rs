//! # defipilot-app
//!
//! Application layer — the automation rule engine and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleRepository` — persistence for automation rules
//!   - `UserRepository` — lookup of rule owners
//!   - `MarketDataGateway` — APY and health-factor queries
//!   - `RiskGateway` — liquidation-risk forecasts
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RuleService` — validated CRUD for rules
//!   - `Scheduler` / `RuleProcessor` — the recurring evaluation loop
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `defipilot-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod ports;
pub mod services;
