use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::{BigInt, Timestamp};

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
#[graphql(name = "DiscordUser", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "discord_user", plural = "DiscordUsers")]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
pub struct DiscordUser {
    #[primary_key]
    pub id: i32,

    pub display_name: Option<String>,

    #[unique]
    pub discord_id: BigInt,

    #[foreign_key(table = "user", on_delete = "CASCADE")]
    pub user_id: i32,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
