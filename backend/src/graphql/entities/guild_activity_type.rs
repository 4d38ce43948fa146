use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Activity types a guild accepts.
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
#[graphql(name = "GuildActivityType", complex, rename_fields = "snake_case")]
#[graphql_entity(
    table = "guild_activity_type",
    plural = "GuildActivityTypes",
    unique = "guild_id, activity_type_id"
)]
#[relation(name = "guild", target = "Guild", belongs_to = "guild_id")]
#[relation(name = "activity_type", target = "ActivityType", belongs_to = "activity_type_id")]
pub struct GuildActivityType {
    #[primary_key]
    pub id: i32,

    #[foreign_key(table = "guild", on_delete = "CASCADE")]
    pub guild_id: i32,

    #[foreign_key(table = "activity_type", on_delete = "CASCADE")]
    pub activity_type_id: i32,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
