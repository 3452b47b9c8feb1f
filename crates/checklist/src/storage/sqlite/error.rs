//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StoreError` from `checklist_core::storage`.
//! Specific errors are mapped to semantic variants (e.g., UNIQUE constraint to DuplicateKey).

use checklist_core::storage::StoreError;

/// Maps a rusqlite error to a StoreError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_UNIQUE` → `StoreError::DuplicateKey`
/// - `SQLITE_CONSTRAINT_FOREIGNKEY` → `StoreError::NotFound`
/// - Connection errors → `StoreError::ConnectionFailed`
/// - All other errors → `StoreError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, key: &str) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::duplicate(entity_type, key)
        }

        // A referenced row vanished under the store's own checks.
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            StoreError::NotFound {
                entity_type,
                id: format!("reference of {key}"),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StoreError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => StoreError::not_found(entity_type, key),

        rusqlite::Error::FromSqlConversionFailure(..) => {
            StoreError::Serialization(format!("Corrupt {entity_type} row: {err}"))
        }

        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a StoreError.
///
/// `key` names the record involved (its id, text or description) and ends up
/// in `NotFound` and `DuplicateKey` messages.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    key: impl AsRef<str>,
) -> StoreError {
    match err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(&rusqlite_err, entity_type, key.as_ref())
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            StoreError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        tokio_rusqlite::Error::Other(other) => match other.downcast::<StoreError>() {
            Ok(store_err) => *store_err,
            Err(other) => StoreError::QueryFailed(other.to_string()),
        },
        other => StoreError::QueryFailed(other.to_string()),
    }
}

/// Carries a domain error out of a `tokio_rusqlite` closure.
///
/// [`map_tokio_rusqlite_error`] unwraps it again on the async side.
pub fn domain_err(err: StoreError) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(err))
}
