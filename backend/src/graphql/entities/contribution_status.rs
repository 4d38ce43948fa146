use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Lifecycle stage of a contribution (staging, pending, minted).
#[derive(
    GraphQLEntity,
    GraphQLRelations,
    GraphQLOperations,
    SimpleObject,
    Clone,
    Debug,
    Serialize,
    Deserialize,
)]
#[graphql(name = "ContributionStatus", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "contribution_status", plural = "ContributionStatuses")]
#[relation(name = "contributions", target = "Contribution", has_many = "status_id")]
pub struct ContributionStatus {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub name: String,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
