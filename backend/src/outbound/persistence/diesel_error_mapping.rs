//! Diesel and pool error mapping for the event repository.
//!
//! Driver messages are logged at debug level and replaced with fixed,
//! sanitised text before they leave the adapter.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::EventRepositoryError;

use super::pool::PoolError;

/// Map pool errors to connection failures.
pub(crate) fn map_pool_error(error: PoolError) -> EventRepositoryError {
    debug!(%error, "event store checkout failed");
    match error {
        PoolError::Checkout { .. } => {
            EventRepositoryError::connection("no database connection available")
        }
        PoolError::Build { .. } => EventRepositoryError::connection("database pool unavailable"),
    }
}

/// Map Diesel errors to query or connection failures.
pub(crate) fn map_diesel_error(error: DieselError) -> EventRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EventRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            EventRepositoryError::query("event already exists")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _)
        | DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, _) => {
            EventRepositoryError::query("event violates a storage constraint")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            EventRepositoryError::query("concurrent update conflict")
        }
        DieselError::QueryBuilderError(_) => EventRepositoryError::query("database query error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            EventRepositoryError::query("event row could not be converted")
        }
        _ => EventRepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[derive(Debug)]
    struct FixedInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for FixedInfo {
        fn message(&self) -> &str {
            self.0
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            None
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(FixedInfo("secret driver detail")))
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection),
        EventRepositoryError::connection("database connection error")
    )]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation),
        EventRepositoryError::query("event already exists")
    )]
    #[case(
        database_error(DatabaseErrorKind::CheckViolation),
        EventRepositoryError::query("event violates a storage constraint")
    )]
    #[case(DieselError::NotFound, EventRepositoryError::query("database error"))]
    fn maps_diesel_errors(#[case] error: DieselError, #[case] expected: EventRepositoryError) {
        let mapped = map_diesel_error(error);
        assert_eq!(mapped, expected);
        assert!(!mapped.to_string().contains("secret driver detail"));
    }

    #[rstest]
    fn pool_checkout_maps_to_connection() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(mapped, EventRepositoryError::Connection { .. }));
    }
}
