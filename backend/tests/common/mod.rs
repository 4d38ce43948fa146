//! Shared fixtures: a seeded database, the schema, and row helpers.

#![allow(dead_code)]

use async_graphql::{Request, ServerError};
use chrono::{Duration, TimeZone, Utc};
use protocol_api::db::Database;
use protocol_api::graphql::orm::format_timestamp;
use protocol_api::graphql::{ProtocolSchema, build_schema};
use serde_json::Value;

pub struct TestApp {
    pub db: Database,
    pub schema: ProtocolSchema,
    _dir: Option<tempfile::TempDir>,
}

pub async fn setup() -> TestApp {
    let db = Database::connect_in_memory().await.unwrap();
    db.prepare(true).await.unwrap();
    let schema = build_schema(db.clone());
    TestApp { db, schema, _dir: None }
}

/// Same fixture on a pooled file database, so writes really overlap.
pub async fn setup_file() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("protocol.db").display());
    let db = Database::connect(&url, 10).await.unwrap();
    db.prepare(true).await.unwrap();
    let schema = build_schema(db.clone());
    TestApp { db, schema, _dir: Some(dir) }
}

impl TestApp {
    /// Execute and return `data`, failing the test on any GraphQL error.
    pub async fn query(&self, query: &str) -> Value {
        let response = self.schema.execute(Request::new(query)).await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().unwrap()
    }

    pub async fn query_errors(&self, query: &str) -> Vec<ServerError> {
        self.schema.execute(Request::new(query)).await.errors
    }

    async fn insert(&self, sql: &str, binds: &[Value]) -> i64 {
        let now = format_timestamp(&Utc::now());
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for bind in binds {
            query = match bind {
                Value::Number(n) => query.bind(n.as_i64().unwrap()),
                Value::String(s) => query.bind(s.clone()),
                Value::Null => query.bind(None::<i64>),
                other => panic!("unsupported bind {other}"),
            };
        }
        query.bind(now).fetch_one(self.db.pool()).await.unwrap()
    }

    pub async fn user(&self, address: &str) -> i64 {
        self.insert(
            "INSERT INTO user (address, chain_type_id, created_at, updated_at) VALUES (?, 1, ?2, ?2) RETURNING id",
            &[address.into()],
        )
        .await
    }

    pub async fn guild(&self, name: &str) -> i64 {
        self.insert(
            "INSERT INTO guild (name, created_at, updated_at) VALUES (?, ?2, ?2) RETURNING id",
            &[name.into()],
        )
        .await
    }

    pub async fn member(&self, user_id: i64, guild_id: i64) -> i64 {
        self.insert(
            "INSERT INTO guild_user (user_id, guild_id, created_at, updated_at) VALUES (?, ?, ?3, ?3) RETURNING id",
            &[user_id.into(), guild_id.into()],
        )
        .await
    }

    /// Contribution engaged `days_ago` days before a fixed date
    pub async fn contribution(&self, user_id: i64, name: &str, days_ago: i64) -> i64 {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let engaged = format_timestamp(&(base - Duration::days(days_ago)));
        self.insert(
            "INSERT INTO contribution (user_id, name, status_id, activity_type_id, date_of_submission, \
             date_of_engagement, created_at, updated_at) VALUES (?, ?, 1, 1, ?3, ?3, ?4, ?4) RETURNING id",
            &[user_id.into(), name.into(), engaged.into()],
        )
        .await
    }

    pub async fn link(&self, guild_id: i64, contribution_id: i64) -> i64 {
        self.insert(
            "INSERT INTO guild_contribution (guild_id, contribution_id, created_at, updated_at) \
             VALUES (?, ?, ?3, ?3) RETURNING id",
            &[guild_id.into(), contribution_id.into()],
        )
        .await
    }

    pub async fn attestation(&self, user_id: i64, contribution_id: i64) -> i64 {
        self.insert(
            "INSERT INTO attestation (user_id, contribution_id, confidence_id, date_of_attestation, \
             created_at, updated_at) VALUES (?, ?, 1, ?3, ?3, ?3) RETURNING id",
            &[user_id.into(), contribution_id.into()],
        )
        .await
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.db.pool())
            .await
            .unwrap()
    }
}

/// `extensions.code` of a server error
pub fn code(error: &ServerError) -> Option<String> {
    error
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .map(|value| value.to_string().trim_matches('"').to_string())
}
