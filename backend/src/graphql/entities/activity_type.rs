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
#[graphql(name = "ActivityType", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "activity_type", plural = "ActivityTypes")]
#[relation(name = "contributions", target = "Contribution", has_many = "activity_type_id")]
#[relation(name = "guilds", target = "GuildActivityType", has_many = "activity_type_id")]
pub struct ActivityType {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub name: String,

    #[column(default = "1")]
    pub active: bool,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
