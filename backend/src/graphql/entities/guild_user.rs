use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Membership of a user in a guild.
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
#[graphql(name = "GuildUser", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "guild_user", plural = "GuildUsers", unique = "user_id, guild_id")]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
#[relation(name = "guild", target = "Guild", belongs_to = "guild_id")]
#[relation(
    name = "membership_status",
    graphql_name = "membershipStatus",
    target = "GuildMembershipStatus",
    belongs_to = "membership_status_id"
)]
pub struct GuildUser {
    #[primary_key]
    pub id: i32,

    #[foreign_key(table = "user", on_delete = "CASCADE")]
    pub user_id: i32,

    #[foreign_key(table = "guild", on_delete = "CASCADE")]
    pub guild_id: i32,

    #[foreign_key(table = "guild_membership_status", on_delete = "SET NULL")]
    pub membership_status_id: Option<i32>,

    #[column(default = "0")]
    pub favorite: bool,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
