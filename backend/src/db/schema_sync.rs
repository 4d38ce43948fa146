//! Automatic schema synchronization from entity definitions
//!
//! This module provides ORM-like auto-migration capabilities:
//! - Compares entity definitions to current database schema
//! - Creates missing tables automatically
//! - Adds missing columns automatically
//! - Does NOT handle column renames or type changes (requires DB wipe)

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::graphql::orm::{ColumnDef, DatabaseSchema};

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub columns_added: Vec<(String, String)>, // (table, column)
    pub errors: Vec<String>,
}

impl SchemaSyncResult {
    fn merge(&mut self, other: SchemaSyncResult) {
        self.tables_created.extend(other.tables_created);
        self.columns_added.extend(other.columns_added);
        self.errors.extend(other.errors);
    }
}

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Get existing columns for a table
async fn get_table_columns(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as(&format!("PRAGMA table_info({})", table_name))
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(_, name, _, _, _, _)| name).collect())
}

/// Sync a single entity's table to the database
pub async fn sync_entity<E: DatabaseSchema>(
    pool: &SqlitePool,
) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();
    let table_name = E::TABLE_NAME;

    if !table_exists(pool, table_name).await? {
        let create_sql = E::create_table_sql();
        debug!("Creating table {}: {}", table_name, create_sql);

        match sqlx::query(&create_sql).execute(pool).await {
            Ok(_) => {
                info!("Created table: {}", table_name);
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
        return Ok(result);
    }

    let existing_columns = get_table_columns(pool, table_name).await?;
    for col_def in E::columns() {
        if existing_columns.iter().any(|c| c == col_def.name) {
            continue;
        }

        let alter_sql = generate_add_column_sql(table_name, col_def);
        debug!("Adding column to {}: {}", table_name, alter_sql);

        match sqlx::query(&alter_sql).execute(pool).await {
            Ok(_) => {
                info!("Added column {}.{}", table_name, col_def.name);
                result
                    .columns_added
                    .push((table_name.to_string(), col_def.name.to_string()));
            }
            Err(e) => {
                let msg = format!(
                    "Failed to add column {}.{}: {}",
                    table_name, col_def.name, e
                );
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    Ok(result)
}

/// Generate ALTER TABLE ADD COLUMN SQL
fn generate_add_column_sql(table_name: &str, col: &ColumnDef) -> String {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        table_name, col.name, col.sql_type
    );

    // SQLite cannot add PRIMARY KEY or UNIQUE columns, and NOT NULL needs a default.
    if let Some(default) = col.default {
        if !col.nullable {
            sql.push_str(" NOT NULL");
        }
        sql.push_str(&format!(" DEFAULT {}", default));
    } else if !col.nullable {
        let default_val = match col.sql_type {
            "TEXT" => "''",
            "INTEGER" => "0",
            "REAL" => "0.0",
            _ => "''",
        };
        sql.push_str(&format!(" NOT NULL DEFAULT {}", default_val));
    }

    if let Some(ref fk) = col.foreign_key {
        if col.nullable {
            sql.push_str(&format!(
                " REFERENCES {}({}) ON DELETE {}",
                fk.table, fk.column, fk.on_delete
            ));
        }
    }

    sql
}

/// Sync all entity tables to the database.
///
/// Called at startup so every entity table exists with the defined columns.
/// Referenced tables are created before the tables pointing at them.
pub async fn sync_all_entity_schemas(pool: &SqlitePool) -> SchemaSyncResult {
    use crate::graphql::entities::*;

    let mut total_result = SchemaSyncResult::default();

    macro_rules! sync_one {
        ($entity:ty) => {
            match sync_entity::<$entity>(pool).await {
                Ok(result) => total_result.merge(result),
                Err(e) => {
                    total_result.errors.push(format!(
                        "Error syncing {}: {}",
                        stringify!($entity),
                        e
                    ));
                }
            }
        };
    }

    // Lookup tables
    sync_one!(ChainType);
    sync_one!(ContributionStatus);
    sync_one!(GuildMembershipStatus);
    sync_one!(AttestationConfidence);
    sync_one!(ActivityType);
    sync_one!(Chain);

    // Users and linked accounts
    sync_one!(User);
    sync_one!(DiscordUser);
    sync_one!(TwitterUser);
    sync_one!(LinearUser);
    sync_one!(LinearIssue);

    // DAOs
    sync_one!(Guild);
    sync_one!(GuildUser);
    sync_one!(GuildActivityType);

    // Contributions
    sync_one!(Contribution);
    sync_one!(GuildContribution);
    sync_one!(Attestation);
    sync_one!(Partner);
    sync_one!(TwitterTweet);
    sync_one!(TwitterTweetContribution);

    total_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::orm::ForeignKeyDef;

    #[test]
    fn add_column_gets_not_null_default() {
        let col = ColumnDef {
            name: "favorite",
            sql_type: "INTEGER",
            nullable: false,
            is_primary_key: false,
            unique: false,
            default: Some("0"),
            foreign_key: None,
        };
        assert_eq!(
            generate_add_column_sql("guild_user", &col),
            "ALTER TABLE guild_user ADD COLUMN favorite INTEGER NOT NULL DEFAULT 0"
        );
    }

    #[test]
    fn add_nullable_reference() {
        let col = ColumnDef {
            name: "chain_id",
            sql_type: "INTEGER",
            nullable: true,
            is_primary_key: false,
            unique: false,
            default: None,
            foreign_key: Some(ForeignKeyDef {
                table: "chain",
                column: "id",
                on_delete: "SET NULL",
            }),
        };
        assert_eq!(
            generate_add_column_sql("contribution", &col),
            "ALTER TABLE contribution ADD COLUMN chain_id INTEGER REFERENCES chain(id) ON DELETE SET NULL"
        );
    }

    #[tokio::test]
    async fn missing_columns_are_added() {
        let db = crate::db::Database::connect_in_memory().await.unwrap();
        sqlx::query("CREATE TABLE chain_type (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
            .execute(db.pool())
            .await
            .unwrap();

        let result = sync_entity::<crate::graphql::entities::ChainType>(db.pool())
            .await
            .unwrap();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let added: Vec<&str> = result.columns_added.iter().map(|(_, c)| c.as_str()).collect();
        assert_eq!(added, vec!["created_at", "updated_at"]);
    }
}
