use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Issue imported from Linear; may back a contribution.
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
#[graphql(name = "LinearIssue", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "linear_issue", plural = "LinearIssues")]
#[relation(name = "assignee", target = "LinearUser", belongs_to = "assignee_id")]
#[relation(name = "contribution", target = "Contribution", has_one = "linear_issue_id")]
pub struct LinearIssue {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub linear_id: String,

    pub title: Option<String>,

    pub url: Option<String>,

    #[foreign_key(table = "linear_user", on_delete = "SET NULL")]
    pub assignee_id: Option<i32>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
