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
#[graphql(name = "AttestationConfidence", complex, rename_fields = "snake_case")]
#[graphql_entity(table = "attestation_confidence", plural = "AttestationConfidences")]
#[relation(name = "attestations", target = "Attestation", has_many = "confidence_id")]
pub struct AttestationConfidence {
    #[primary_key]
    pub id: i32,

    #[unique]
    pub name: String,

    #[graphql(name = "createdAt")]
    pub created_at: Timestamp,

    #[graphql(name = "updatedAt")]
    pub updated_at: Timestamp,
}
