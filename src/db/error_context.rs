//! Structured error extraction from sqlx errors.

use sqlx::mysql::MySqlDatabaseError;

use crate::error::DbError;

/// Convert a sqlx error into a [`DbError`], keeping the server's SQLSTATE and error number.
pub fn db_error(error: &sqlx::Error) -> DbError {
    if let Some(db_error) = error.as_database_error()
        && let Some(mysql_error) = db_error.try_downcast_ref::<MySqlDatabaseError>()
    {
        let message = format!("{} (error {})", mysql_error.message(), mysql_error.number());
        return match mysql_error.code() {
            Some(code) => DbError::with_code(message, code),
            None => DbError::new(message),
        };
    }

    DbError::new(error.to_string())
}
