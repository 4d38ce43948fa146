use async_graphql::SimpleObject;
use protocol_macros::{GraphQLEntity, GraphQLOperations, GraphQLRelations};
use serde::{Deserialize, Serialize};

use crate::graphql::scalars::Timestamp;

/// A user vouching for someone else's contribution.
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
#[graphql(name = "Attestation", complex, rename_fields = "snake_case")]
#[graphql_entity(
    table = "attestation",
    plural = "Attestations",
    unique = "user_id, contribution_id"
)]
#[relation(name = "user", target = "User", belongs_to = "user_id")]
#[relation(name = "contribution", target = "Contribution", belongs_to = "contribution_id")]
#[relation(name = "confidence", target = "AttestationConfidence", belongs_to = "confidence_id")]
pub struct Attestation {
    #[primary_key]
    pub id: i32,

    #[foreign_key(table = "user")]
    pub user_id: i32,

    #[foreign_key(table = "contribution", on_delete = "CASCADE")]
    pub contribution_id: i32,

    #[foreign_key(table = "attestation_confidence")]
    pub confidence_id: i32,

    pub date_of_attestation: Timestamp,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
