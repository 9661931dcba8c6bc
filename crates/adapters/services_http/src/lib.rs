//! # defipilot-adapter-services-http
//!
//! HTTP client adapter using [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `MarketDataGateway` and `RiskGateway` ports against the
//!   collaborator services' REST APIs
//! - Own the shared HTTP client and its request timeout
//! - Map transport failures (connect errors, non-OK statuses, undecodable
//!   bodies) onto the domain's `DownstreamError`
//!
//! ## Dependency rule
//! Depends on `defipilot-app` (for port traits) and `defipilot-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod config;
pub mod market_data;
pub mod risk;

pub use config::Config;
pub use market_data::HttpMarketData;
pub use risk::HttpRiskForecast;
