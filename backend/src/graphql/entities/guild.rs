use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::{BigInt, Timestamp};

/// A DAO. Discord channel ids are stored as 64-bit integers.
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
#[graphql(name = "Guild", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "guild", plural = "Guilds")]
#[relation(name = "users", target = "GuildUser", has_many = "guild_id")]
#[relation(name = "contributions", target = "GuildContribution", has_many = "guild_id")]
#[relation(name = "activity_type", target = "GuildActivityType", has_many = "guild_id")]
pub struct Guild {
    #[primary_key]
    pub id: i32,

    pub name: Option<String>,

    pub logo: Option<String>,

    #[unique]
    pub discord_id: Option<BigInt>,

    pub congrats_channel: Option<BigInt>,

    pub contribution_reporting_channel: Option<BigInt>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
