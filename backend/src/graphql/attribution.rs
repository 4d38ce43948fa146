//! DAO attribution of contributions.
//!
//! A contribution is attributed to at most one DAO from the frontend's point
//! of view: attributing replaces every `guild_contribution` link of the
//! contribution with a single link, and a null DAO clears them.

use async_graphql::{Context, Object, Result, SimpleObject};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult, IntoGraphql};
use crate::graphql::entities::{Contribution, Guild};
use crate::graphql::orm::{DatabaseEntity, EntityQuery, SqlValue, format_timestamp, pool};

/// Outcome of one attribution inside `bulkAttributeContributions`
#[derive(Debug, Clone, SimpleObject)]
pub struct ContributionAttributionResult {
    pub success: bool,
    pub error: Option<String>,
    pub contribution: Option<Contribution>,
}

impl ContributionAttributionResult {
    pub fn ok(contribution: Contribution) -> Self {
        Self {
            success: true,
            error: None,
            contribution: Some(contribution),
        }
    }

    pub fn failed(error: &ApiError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            contribution: None,
        }
    }
}

/// Replace the DAO links of one contribution inside a single transaction.
///
/// The transaction takes the write lock up front (`BEGIN IMMEDIATE`), so
/// concurrent attributions queue on the busy timeout instead of failing
/// to upgrade a read lock.
pub async fn attribute_contribution(
    pool: &SqlitePool,
    contribution_id: i32,
    dao_id: Option<i32>,
) -> ApiResult<Contribution> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM contribution WHERE id = ?")
        .bind(contribution_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(ApiError::not_found(Contribution::ENTITY_NAME));
    }

    if let Some(dao_id) = dao_id {
        let dao: Option<i64> = sqlx::query_scalar("SELECT id FROM guild WHERE id = ?")
            .bind(dao_id)
            .fetch_optional(&mut *tx)
            .await?;
        if dao.is_none() {
            return Err(ApiError::not_found(Guild::ENTITY_NAME));
        }
    }

    sqlx::query("DELETE FROM guild_contribution WHERE contribution_id = ?")
        .bind(contribution_id)
        .execute(&mut *tx)
        .await?;

    let now = format_timestamp(&chrono::Utc::now());
    if let Some(dao_id) = dao_id {
        sqlx::query(
            "INSERT INTO guild_contribution (guild_id, contribution_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(dao_id)
        .bind(contribution_id)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE contribution SET updated_at = ? WHERE id = ?")
        .bind(&now)
        .bind(contribution_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(contribution_id, dao_id = ?dao_id, "Contribution attributed");

    EntityQuery::<Contribution>::new()
        .where_clause("id = ?", vec![SqlValue::Int(i64::from(contribution_id))])
        .fetch_first(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(Contribution::ENTITY_NAME))
}

#[derive(Default)]
pub struct AttributionMutations;

#[Object]
impl AttributionMutations {
    /// Attribute a contribution to a DAO, or clear its attribution when
    /// `daoId` is null
    async fn attribute_contribution_to_dao(
        &self,
        ctx: &Context<'_>,
        contribution_id: i32,
        dao_id: Option<i32>,
    ) -> Result<Contribution> {
        let pool = pool(ctx)?;
        attribute_contribution(pool, contribution_id, dao_id)
            .await
            .gql()
    }

    /// Attribute several contributions to the same DAO. Each one commits on
    /// its own; failures are reported per contribution.
    async fn bulk_attribute_contributions(
        &self,
        ctx: &Context<'_>,
        contribution_ids: Vec<i32>,
        dao_id: Option<i32>,
    ) -> Result<Vec<ContributionAttributionResult>> {
        let pool = pool(ctx)?;
        let mut results = Vec::with_capacity(contribution_ids.len());
        for contribution_id in contribution_ids {
            match attribute_contribution(pool, contribution_id, dao_id).await {
                Ok(contribution) => results.push(ContributionAttributionResult::ok(contribution)),
                Err(e) => {
                    warn!(contribution_id, error = %e, "Attribution failed");
                    results.push(ContributionAttributionResult::failed(&e));
                }
            }
        }
        Ok(results)
    }
}
