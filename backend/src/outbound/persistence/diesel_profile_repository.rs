//! PostgreSQL-backed profile and admin adapters using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AdminRegistry, AdminRegistryError, ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{AccountId, ProfileDraft, UserId, UserProfile};

use super::diesel_helpers::{DbFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{admins, users};

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_profile_diesel_error(
    error: diesel::result::Error,
    account: Option<&AccountId>,
) -> ProfileRepositoryError {
    match classify_diesel_error(error, "profile repository") {
        DbFailure::Connection(message) => ProfileRepositoryError::connection(message),
        DbFailure::UniqueViolation(constraint) => match account {
            Some(account) => ProfileRepositoryError::duplicate(account.to_string()),
            None => ProfileRepositoryError::query(constraint),
        },
        DbFailure::ForeignKeyViolation(message) | DbFailure::Query(message) => {
            ProfileRepositoryError::query(message)
        }
    }
}

fn map_profile_read_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_profile_diesel_error(error, None)
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn insert(
        &self,
        account: &AccountId,
        draft: &ProfileDraft,
    ) -> Result<UserProfile, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_error_message(err)))?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow {
                account_id: *account.as_uuid(),
                first_name: draft.first_name(),
                last_name: draft.last_name(),
                user_email: draft.email(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_profile_diesel_error(err, Some(account)))?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_error_message(err)))?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_profile_read_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_account(
        &self,
        account: &AccountId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_error_message(err)))?;

        let row: Option<UserRow> = users::table
            .filter(users::account_id.eq(account.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_profile_read_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, ProfileRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_error_message(err)))?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();

        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(raw))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_profile_read_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Diesel-backed implementation of the `AdminRegistry` port.
#[derive(Clone)]
pub struct DieselAdminRegistry {
    pool: DbPool,
}

impl DieselAdminRegistry {
    /// Create a new registry with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_admin_pool_error(error: PoolError) -> AdminRegistryError {
    AdminRegistryError::connection(pool_error_message(error))
}

fn map_admin_diesel_error(error: diesel::result::Error, user: UserId) -> AdminRegistryError {
    match classify_diesel_error(error, "admin registry") {
        DbFailure::Connection(message) => AdminRegistryError::connection(message),
        DbFailure::ForeignKeyViolation(_) => AdminRegistryError::unknown_user(user.get()),
        DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
            AdminRegistryError::query(message)
        }
    }
}

#[async_trait]
impl AdminRegistry for DieselAdminRegistry {
    async fn is_admin(&self, user: UserId) -> Result<bool, AdminRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_admin_pool_error)?;

        diesel::select(exists(admins::table.find(user.get())))
            .get_result(&mut conn)
            .await
            .map_err(|err| map_admin_diesel_error(err, user))
    }

    async fn grant(&self, user: UserId) -> Result<bool, AdminRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_admin_pool_error)?;

        let inserted = diesel::insert_into(admins::table)
            .values(admins::user_id.eq(user.get()))
            .on_conflict(admins::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_admin_diesel_error(err, user))?;
        Ok(inserted > 0)
    }

    async fn revoke(&self, user: UserId) -> Result<bool, AdminRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_admin_pool_error)?;

        let deleted = diesel::delete(admins::table.find(user.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_admin_diesel_error(err, user))?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn read_failures_are_query_errors() {
        let err = map_profile_read_error(diesel::result::Error::NotFound);
        assert!(matches!(err, ProfileRepositoryError::Query { .. }));
    }

    #[rstest]
    fn admin_pool_failures_are_connection_errors() {
        let err = map_admin_pool_error(PoolError::build("bad url"));
        assert_eq!(err, AdminRegistryError::connection("bad url"));
    }
}
