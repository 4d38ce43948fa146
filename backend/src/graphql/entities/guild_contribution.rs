use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Attribution of a contribution to a guild.
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
#[graphql(name = "GuildContribution", complex, rename_fields = "snake_case")]
#[graphql_entity(
    table = "guild_contribution",
    plural = "GuildContributions",
    unique = "guild_id, contribution_id"
)]
#[relation(name = "guild", target = "Guild", belongs_to = "guild_id")]
#[relation(name = "contribution", target = "Contribution", belongs_to = "contribution_id")]
pub struct GuildContribution {
    #[primary_key]
    pub id: i32,

    #[foreign_key(table = "guild", on_delete = "CASCADE")]
    pub guild_id: i32,

    #[foreign_key(table = "contribution", on_delete = "CASCADE")]
    pub contribution_id: i32,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
