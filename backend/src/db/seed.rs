//! Pre-seed data for initial database setup.
//!
//! Runs after schema sync to insert the lookup rows the rest of the schema
//! points at: chain types, contribution statuses, DAO membership statuses,
//! attestation confidences and activity types. Uses INSERT OR IGNORE on the
//! unique `name` column so re-runs are idempotent (existing rows are preserved).

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::graphql::orm::format_timestamp;

/// Result of running seed operations.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub tables_seeded: Vec<String>,
    pub errors: Vec<String>,
}

pub const CHAIN_TYPES: &[&str] = &["ethereum_mainnet", "ethereum_goerli", "gnosis"];

/// Lifecycle of a contribution: drafted, submitted for minting, minted on chain.
pub const CONTRIBUTION_STATUSES: &[&str] = &["staging", "pending", "minted"];

pub const MEMBERSHIP_STATUSES: &[&str] = &["Recruit", "Member", "Admin"];

pub const ATTESTATION_CONFIDENCES: &[&str] = &["0", "1", "2"];

pub const ACTIVITY_TYPES: &[&str] = &[
    "Pull Request",
    "Documentation",
    "Design",
    "Note Taking",
    "Community Management",
    "Other",
];

/// Insert every name into a lookup table that has a unique `name` column.
async fn seed_names(pool: &SqlitePool, table: &str, names: &[&str]) -> Result<u64, sqlx::Error> {
    let now = format_timestamp(&chrono::Utc::now());
    let sql = format!(
        "INSERT OR IGNORE INTO {} (name, created_at, updated_at) VALUES (?, ?, ?)",
        table
    );

    let mut inserted = 0;
    for name in names {
        let r = sqlx::query(&sql)
            .bind(*name)
            .bind(&now)
            .bind(&now)
            .execute(pool)
            .await?;
        inserted += r.rows_affected();
    }
    Ok(inserted)
}

/// Run all seed routines. Safe to call multiple times (uses INSERT OR IGNORE).
pub async fn run_seeds(pool: &SqlitePool) -> SeedResult {
    let mut result = SeedResult::default();

    for (table, count) in [
        ("chain_type", seed_names(pool, "chain_type", CHAIN_TYPES).await),
        (
            "contribution_status",
            seed_names(pool, "contribution_status", CONTRIBUTION_STATUSES).await,
        ),
        (
            "guild_membership_status",
            seed_names(pool, "guild_membership_status", MEMBERSHIP_STATUSES).await,
        ),
        (
            "attestation_confidence",
            seed_names(pool, "attestation_confidence", ATTESTATION_CONFIDENCES).await,
        ),
        (
            "activity_type",
            seed_names(pool, "activity_type", ACTIVITY_TYPES).await,
        ),
    ] {
        match count {
            Ok(n) => {
                if n > 0 {
                    debug!(table = table, count = n, "Seeded table");
                    result.tables_seeded.push(format!("{} ({} rows)", table, n));
                }
            }
            Err(e) => {
                let msg = format!("Seed {}: {}", table, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    if !result.tables_seeded.is_empty() {
        info!(tables = ?result.tables_seeded, "Pre-seed data applied");
    }

    result
}
