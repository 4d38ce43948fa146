use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// A contributor, identified by an address on a chain type.
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
#[graphql(name = "User", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "user", plural = "Users", unique = "address, chain_type_id")]
#[relation(name = "chain_type", target = "ChainType", belongs_to = "chain_type_id")]
#[relation(name = "contributions", target = "Contribution", has_many = "user_id")]
#[relation(name = "attestations", target = "Attestation", has_many = "user_id")]
#[relation(name = "guild_users", target = "GuildUser", has_many = "user_id")]
#[relation(name = "discord_users", target = "DiscordUser", has_many = "user_id")]
#[relation(name = "linear_users", target = "LinearUser", has_many = "user_id")]
#[relation(name = "contribution_partners", target = "Partner", has_many = "user_id")]
#[relation(name = "twitter_user", target = "TwitterUser", has_one = "user_id")]
pub struct User {
    #[primary_key]
    pub id: i32,

    pub name: Option<String>,

    pub display_name: Option<String>,

    pub address: String,

    #[foreign_key(table = "chain_type")]
    pub chain_type_id: i32,

    pub full_name: Option<String>,

    #[column(default = "1")]
    pub active: bool,

    pub email: Option<String>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
