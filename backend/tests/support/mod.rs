//! Embedded PostgreSQL fixtures shared by the Diesel adapter suites.
//!
//! Every suite gets its own temporary database on the process-wide cluster,
//! migrated with the crate's embedded migrations. Where the cluster cannot
//! start, set `SKIP_TEST_CLUSTER=1` to skip these suites instead of failing.

use std::future::Future;

use geocache::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when `SKIP_TEST_CLUSTER` is set, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Migrated temporary database plus the runtime that drives its pool.
///
/// Field order matters: the pool closes before the runtime stops, and the
/// database is dropped last.
pub struct TestDatabase {
    pub pool: DbPool,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    /// Run `future` to completion on the database's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn provision() -> Result<TestDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    let database_name = format!("test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(database_name.as_str())
        .map_err(|err| format!("create temporary database: {err:?}"))?;
    let url = database.url().to_string();

    runtime
        .block_on(run_pending_migrations(&url))
        .map_err(|err| err.to_string())?;
    let config = PoolConfig::new(url).with_max_size(4).with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        pool,
        runtime,
        _database: database,
    })
}

/// Fresh database for one test, or `None` when the cluster is skipped.
pub fn test_database() -> Option<TestDatabase> {
    match provision() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
