//! Shared Diesel error classification for repository implementations.
//!
//! Each repository maps a [`DbFailure`] onto its own port error enum, so the
//! logging and variant matching live in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Database failure reduced to the cases repositories distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation(String),
    /// Any other query failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, emitting debug context for the operation.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation(info.constraint_name().unwrap_or("unique").to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DbFailure::ForeignKeyViolation(
                info.constraint_name().unwrap_or("foreign key").to_owned(),
            )
        }
        DieselError::DatabaseError(_, _) => DbFailure::Query("database error".to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}

/// Escape `%`, `_` and `\` so `needle` matches literally inside `LIKE`.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("quarry", "%quarry%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    fn like_patterns_escape_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }

    #[rstest]
    #[case(DieselError::NotFound, DbFailure::Query("record not found".to_owned()))]
    #[case(
        DieselError::QueryBuilderError("bad".into()),
        DbFailure::Query("database query error".to_owned())
    )]
    fn non_database_errors_are_query_failures(
        #[case] error: DieselError,
        #[case] expected: DbFailure,
    ) {
        assert_eq!(classify_diesel_error(error, "test"), expected);
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        assert_eq!(pool_error_message(PoolError::checkout("timed out")), "timed out");
    }
}
