//! GraphQL schema definition
//!
//! Every entity contributes a generated `{Entity}CrudQueries` and
//! `{Entity}CrudMutations` object; they are merged into the roots here.

use async_graphql::{EmptySubscription, MergedObject, Schema, extensions::Tracing};

use crate::db::Database;

use super::attribution::AttributionMutations;
use super::entities::*;

/// The GraphQL schema type
pub type ProtocolSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database) -> ProtocolSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .extension(Tracing)
        .data(db)
        .finish()
}

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    ActivityTypeCrudQueries,
    AttestationCrudQueries,
    AttestationConfidenceCrudQueries,
    ChainCrudQueries,
    ChainTypeCrudQueries,
    ContributionCrudQueries,
    ContributionStatusCrudQueries,
    DiscordUserCrudQueries,
    GuildCrudQueries,
    GuildActivityTypeCrudQueries,
    GuildContributionCrudQueries,
    GuildMembershipStatusCrudQueries,
    GuildUserCrudQueries,
    LinearIssueCrudQueries,
    LinearUserCrudQueries,
    PartnerCrudQueries,
    TwitterTweetCrudQueries,
    TwitterTweetContributionCrudQueries,
    TwitterUserCrudQueries,
    UserCrudQueries,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    ActivityTypeCrudMutations,
    AttestationCrudMutations,
    AttestationConfidenceCrudMutations,
    ChainCrudMutations,
    ChainTypeCrudMutations,
    ContributionCrudMutations,
    ContributionStatusCrudMutations,
    DiscordUserCrudMutations,
    GuildCrudMutations,
    GuildActivityTypeCrudMutations,
    GuildContributionCrudMutations,
    GuildMembershipStatusCrudMutations,
    GuildUserCrudMutations,
    LinearIssueCrudMutations,
    LinearUserCrudMutations,
    PartnerCrudMutations,
    TwitterTweetCrudMutations,
    TwitterTweetContributionCrudMutations,
    TwitterUserCrudMutations,
    UserCrudMutations,
    AttributionMutations,
);
