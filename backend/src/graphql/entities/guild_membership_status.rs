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
#[graphql(name = "GuildMembershipStatus", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "guild_membership_status", plural = "GuildMembershipStatuses")]
#[relation(name = "guild_users", target = "GuildUser", has_many = "membership_status_id")]
pub struct GuildMembershipStatus {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub name: String,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
