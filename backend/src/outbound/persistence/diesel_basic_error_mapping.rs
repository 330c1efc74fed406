//! Diesel and pool error translation shared by every repository adapter.
//!
//! Each repository port defines its own `Connection`/`Query` error pair, so
//! the helpers take the port's constructors rather than a concrete type.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto the port's connection constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure onto the port's query or connection constructor.
///
/// Driver detail is logged at debug level and never reaches the caller.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(%error, "diesel operation failed");
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("record violates a table constraint")
        }
        DieselError::BrokenTransactionManager => connection("database connection unusable"),
        _ => query("database error"),
    }
}
