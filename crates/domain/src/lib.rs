//! # defipilot-domain
//!
//! Pure domain model for the defipilot automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automation rules** (trigger → action pairs with open per-type
//!   configuration maps and execution bookkeeping)
//! - Define **Users** (rule owners, resolved to a wallet address)
//! - Define **Positions** (read-only market snapshots used as evaluation input)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod position;
pub mod rule;
pub mod user;
