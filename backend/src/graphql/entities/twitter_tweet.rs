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
#[graphql(name = "TwitterTweet", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "twitter_tweet", plural = "TwitterTweets")]
#[relation(name = "twitter_user", target = "TwitterUser", belongs_to = "twitter_user_id")]
#[relation(
    name = "twitter_tweet_contributions",
    target = "TwitterTweetContribution",
    has_many = "twitter_tweet_id"
)]
pub struct TwitterTweet {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub twitter_tweet_id: String,

    pub text: String,

    #[foreign_key(table = "twitter_user", on_delete = "SET NULL")]
    pub twitter_user_id: Option<i32>,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
