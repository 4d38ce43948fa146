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
#[graphql(name = "LinearUser", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "linear_user", plural = "LinearUsers")]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
#[relation(name = "assigned_issues", target = "LinearIssue", has_many = "assignee_id")]
pub struct LinearUser {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub linear_id: String,

    pub name: Option<String>,

    pub display_name: Option<String>,

    pub email: Option<String>,

    #[column(default = "1")]
    pub active: bool,

    #[foreign_key(table = "user", on_delete = "SET NULL")]
    pub user_id: Option<i32>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
