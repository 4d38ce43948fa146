use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Co-author of a contribution.
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
#[graphql(name = "Partner", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "partner", plural = "Partners", unique = "user_id, contribution_id")]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
#[relation(name = "contribution", target = "Contribution", belongs_to = "contribution_id")]
pub struct Partner {
    #[primary_key]
    pub id: i32,

    #[foreign_key(table = "user")]
    pub user_id: i32,

    #[foreign_key(table = "contribution", on_delete = "CASCADE")]
    pub contribution_id: i32,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
