//! API error taxonomy.
//!
//! Every failure surfaced through GraphQL is one of these kinds. The kind is
//! exposed to clients as `extensions.code` so they can tell a missing row
//! from a rejected write without parsing messages.

use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A row addressed by the request does not exist (or no longer exists)
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Arguments were syntactically valid GraphQL but semantically wrong
    #[error("{0}")]
    Validation(String),

    /// The store rejected a write (unique, foreign key, check, not null)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store could not be reached; retrying later may succeed
    #[error("database unavailable: {0}")]
    TransientIo(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity: entity.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Machine readable code placed in `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Validation(_) => "BAD_USER_INPUT",
            ApiError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            ApiError::TransientIo(_) => "TRANSIENT_IO",
            ApiError::Internal(_) => "INTERNAL",
        }
    }
}

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CONSTRAINT: i32 = 19;

/// Primary result code from SQLite's (possibly extended) error code.
/// `787` (SQLITE_CONSTRAINT_FOREIGNKEY) becomes `19`.
fn sqlite_primary_code(code: Option<&str>) -> Option<i32> {
    code?.parse::<i32>().ok().map(|code| code & 0xff)
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record"),
            sqlx::Error::Database(ref db) => {
                let primary = sqlite_primary_code(db.code().as_deref());
                let constraint = !matches!(db.kind(), sqlx::error::ErrorKind::Other)
                    || primary == Some(SQLITE_CONSTRAINT);
                if constraint {
                    ApiError::ConstraintViolation(db.message().to_string())
                } else if matches!(primary, Some(SQLITE_BUSY | SQLITE_LOCKED)) {
                    tracing::warn!(error = %db, "Database locked");
                    ApiError::TransientIo(db.message().to_string())
                } else {
                    tracing::error!(error = %db, "Unclassified database error");
                    ApiError::Internal(db.message().to_string())
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => {
                tracing::warn!(error = %err, "Transient database failure");
                ApiError::TransientIo(err.to_string())
            }
            other => {
                tracing::error!(error = %other, "Database error");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

/// Convert a result into a GraphQL result carrying the error code.
pub trait IntoGraphql<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T> IntoGraphql<T> for ApiResult<T> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, ApiError::NotFound { .. });
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn pool_timeout_is_transient() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_matches!(err, ApiError::TransientIo(_));
    }

    #[test]
    fn extended_sqlite_codes_reduce_to_primary() {
        assert_eq!(sqlite_primary_code(Some("787")), Some(SQLITE_CONSTRAINT));
        assert_eq!(sqlite_primary_code(Some("2067")), Some(SQLITE_CONSTRAINT));
        assert_eq!(sqlite_primary_code(Some("517")), Some(SQLITE_BUSY));
        assert_eq!(sqlite_primary_code(Some("6")), Some(SQLITE_LOCKED));
        assert_eq!(sqlite_primary_code(None), None);
    }

    #[tokio::test]
    async fn sqlite_failures_are_classified() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                "sqlite::memory:"
                    .parse::<sqlx::sqlite::SqliteConnectOptions>()
                    .unwrap()
                    .foreign_keys(true),
            )
            .await
            .unwrap();
        for sql in [
            "CREATE TABLE parent (id INTEGER PRIMARY KEY)",
            "CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER NOT NULL REFERENCES parent(id) ON DELETE RESTRICT)",
            "INSERT INTO parent (id) VALUES (1)",
            "INSERT INTO child (id, parent_id) VALUES (1, 1)",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }

        let restricted = sqlx::query("DELETE FROM parent WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap_err();
        assert_matches!(ApiError::from(restricted), ApiError::ConstraintViolation(_));

        let dangling = sqlx::query("INSERT INTO child (id, parent_id) VALUES (2, 99)")
            .execute(&pool)
            .await
            .unwrap_err();
        assert_matches!(ApiError::from(dangling), ApiError::ConstraintViolation(_));

        let duplicate = sqlx::query("INSERT INTO parent (id) VALUES (1)")
            .execute(&pool)
            .await
            .unwrap_err();
        assert_eq!(ApiError::from(duplicate).code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn graphql_error_carries_code() {
        let err = ApiError::validation("take must not be negative").extend();
        assert_eq!(err.message, "take must not be negative");
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("BAD_USER_INPUT")));
    }
}
