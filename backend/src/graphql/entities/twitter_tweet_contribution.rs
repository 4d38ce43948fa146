use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// Links a tweet to the contribution it documents.
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
#[graphql(name = "TwitterTweetContribution", complex, rename_fields = "snake_case")]
#[graphql_entity(
    table = "twitter_tweet_contribution",
    plural = "TwitterTweetContributions",
    unique = "twitter_tweet_id, contribution_id"
)]
#[relation(name = "twitter_tweet", target = "TwitterTweet", belongs_to = "twitter_tweet_id")]
#[relation(name = "contribution", target = "Contribution", belongs_to = "contribution_id")]
pub struct TwitterTweetContribution {
    #[primary_key]
    pub id: i32,

    #[foreign_key(table = "twitter_tweet", on_delete = "CASCADE")]
    pub twitter_tweet_id: i32,

    #[foreign_key(table = "contribution", on_delete = "CASCADE")]
    pub contribution_id: i32,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
