use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Network a user address lives on.
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
#[graphql(name = "ChainType", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "chain_type", plural = "ChainTypes")]
#[relation(name = "users", target = "User", has_many = "chain_type_id")]
pub struct ChainType {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub name: String,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
