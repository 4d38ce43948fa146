use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Twitter account, optionally linked to a user.
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
#[graphql(name = "TwitterUser", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "twitter_user", plural = "TwitterUsers")]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
#[relation(name = "tweets", target = "TwitterTweet", has_many = "twitter_user_id")]
pub struct TwitterUser {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub username: String,

    pub name: Option<String>,

    pub description: Option<String>,

    #[unique]
    #[foreign_key(table = "user", on_delete = "SET NULL")]
    pub user_id: Option<i32>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
