//! Classification of sqlx failures into the catalog's store errors.

use reel_core::error::CoreError;

/// PostgreSQL SQLSTATEs meaning "the server cannot serve you right now".
///
/// Class `08` (connection exception) is matched by prefix.
const UNAVAILABLE_SQLSTATES: &[&str] = &[
    "53300", // too_many_connections
    "57P01", // admin_shutdown
    "57P02", // crash_shutdown
    "57P03", // cannot_connect_now
];

/// `true` when `err` means the database could not be reached, as opposed to
/// a failure of the query itself.
pub fn is_unavailable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| {
            code.starts_with("08") || UNAVAILABLE_SQLSTATES.contains(&&*code)
        }),
        _ => false,
    }
}

/// Map a sqlx error onto [`CoreError::StoreUnavailable`] or
/// [`CoreError::Store`], logging the original error.
pub fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    if is_unavailable(&err) {
        tracing::warn!(error = %err, "Database unavailable");
        CoreError::StoreUnavailable(err.to_string())
    } else {
        tracing::error!(error = %err, "Database error");
        CoreError::Store(err.to_string())
    }
}
