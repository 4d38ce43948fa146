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
#[graphql(name = "Contribution", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "contribution", plural = "Contributions")]
#[relation(name = "status", target = "ContributionStatus", belongs_to = "status_id")]
#[relation(name = "activity_type", target = "ActivityType", belongs_to = "activity_type_id")]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
#[relation(name = "attestations", target = "Attestation", has_many = "contribution_id")]
#[relation(name = "partners", target = "Partner", has_many = "contribution_id")]
#[relation(name = "guilds", target = "GuildContribution", has_many = "contribution_id")]
#[relation(name = "linear_issue", target = "LinearIssue", belongs_to = "linear_issue_id")]
#[relation(
    name = "twitter_tweet_contributions",
    target = "TwitterTweetContribution",
    has_many = "contribution_id"
)]
#[relation(name = "chain", target = "Chain", belongs_to = "chain_id")]
pub struct Contribution {
    #[primary_key]
    pub id: i32,

    pub name: String,

    #[foreign_key(table = "contribution_status")]
    pub status_id: i32,

    #[foreign_key(table = "activity_type")]
    pub activity_type_id: i32,

    #[foreign_key(table = "user")]
    pub user_id: i32,

    pub date_of_submission: Timestamp,

    pub date_of_engagement: Timestamp,

    pub details: Option<String>,

    pub proof: Option<String>,

    pub on_chain_id: Option<i32>,

    pub tx_hash: Option<String>,

    #[foreign_key(table = "chain", on_delete = "SET NULL")]
    pub chain_id: Option<i32>,

    #[unique]
    #[foreign_key(table = "linear_issue", on_delete = "SET NULL")]
    pub linear_issue_id: Option<i32>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
