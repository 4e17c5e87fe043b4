//! Diesel and pool error mapping shared by the repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through a repository-specific connection constructor.
pub(crate) fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Map a Diesel failure to a query or connection error.
///
/// Closed connections and unreachable servers are connection errors; every
/// other failure, including constraint violations, is a query error carrying
/// the database message.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        DieselError::BrokenTransactionManager => {
            connection("transaction manager is in a broken state".to_owned())
        }
        other => query(other.to_string()),
    }
}
