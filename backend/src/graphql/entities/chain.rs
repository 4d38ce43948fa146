use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

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
#[graphql(name = "Chain", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "chain", plural = "Chains")]
#[relation(name = "contributions", target = "Contribution", has_many = "chain_id")]
pub struct Chain {
    #[primary_key]
    pub id: i32,

    pub name: String,

    #[unique]
    pub chain_id: String,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
