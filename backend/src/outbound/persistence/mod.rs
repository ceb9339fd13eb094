//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Business rules, including the cooldown, stay in the domain;
//!   the log repository only evaluates the policy it is handed.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures map onto each port's error
//!   enum through [`diesel_helpers`].
//!
//! # Example
//!
//! ```ignore
//! use geocache::outbound::persistence::{DbPool, DieselCacheRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/geocache")).await?;
//! let caches = DieselCacheRepository::new(pool);
//! ```

mod diesel_bookmark_repository;
mod diesel_cache_repository;
mod diesel_discovery_log_repository;
pub(crate) mod diesel_helpers;
mod diesel_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bookmark_repository::DieselBookmarkRepository;
pub use diesel_cache_repository::DieselCacheRepository;
pub use diesel_discovery_log_repository::DieselDiscoveryLogRepository;
pub use diesel_profile_repository::{DieselAdminRegistry, DieselProfileRepository};
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
