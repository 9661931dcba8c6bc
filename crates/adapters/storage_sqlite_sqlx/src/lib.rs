//! # defipilot-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `defipilot-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `defipilot-app` (for port traits) and `defipilot-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod pool;
pub mod rule_repo;
pub mod user_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use rule_repo::SqliteRuleRepository;
pub use user_repo::SqliteUserRepository;
