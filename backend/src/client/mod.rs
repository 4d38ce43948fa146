//! Typed GraphQL client for the protocol API
//!
//! The frontend's data hooks, expressed as Rust: list and attribute
//! contributions ([`ProtocolClient`]), page through them
//! ([`pager::ContributionInfiniteList`]), attribute many at once
//! ([`bulk::BulkDaoAttribution`]) and validate form input ([`forms`]).

pub mod bulk;
pub mod forms;
pub mod pager;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

pub use bulk::{BulkDaoAttribution, BulkOutcome, BulkProgress, ContributionUpdater};
pub use forms::{BulkDaoAttributeFormValues, FieldErrors};
pub use pager::{ContributionInfiniteList, SelectOption, dao_select_options, recent_contributions_for_dao};

/// Error class reported by the server in `extensions.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    ConstraintViolation,
    TransientIo,
    Internal,
}

impl ErrorKind {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("NOT_FOUND") => ErrorKind::NotFound,
            Some("BAD_USER_INPUT") => ErrorKind::Validation,
            Some("CONSTRAINT_VIOLATION") => ErrorKind::ConstraintViolation,
            Some("TRANSIENT_IO") => ErrorKind::TransientIo,
            _ => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a GraphQL response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { kind: ErrorKind, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid form input: {0}")]
    Validation(FieldErrors),
}

impl ClientError {
    /// Error class, with transport failures counted as transient
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::TransientIo,
            ClientError::Api { kind, .. } => *kind,
            ClientError::Decode(_) => ErrorKind::Internal,
            ClientError::Validation(_) => ErrorKind::Validation,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

impl From<GraphqlError> for ClientError {
    fn from(err: GraphqlError) -> Self {
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str);
        ClientError::Api {
            kind: ErrorKind::from_code(code),
            message: err.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaoSummary {
    pub id: i32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaoLink {
    pub guild: DaoSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub name: String,
}

/// Row shape used by the contribution tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionSummary {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub date_of_engagement: DateTime<Utc>,
    pub status: StatusSummary,
    pub guilds: Vec<DaoLink>,
}

const CONTRIBUTION_FIELDS: &str = "id name user_id date_of_engagement status { name } guilds { guild { id name } }";

/// Arguments of a list query; filters and ordering use the API's input shapes.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub filter: Option<Value>,
    pub order_by: Option<Value>,
    pub cursor: Option<i32>,
    pub take: Option<i32>,
    pub skip: Option<i32>,
}

impl ListArgs {
    fn variables(&self) -> Value {
        json!({
            "where": self.filter,
            "orderBy": self.order_by,
            "cursor": self.cursor.map(|id| json!({ "id": id })),
            "take": self.take,
            "skip": self.skip,
        })
    }
}

/// GraphQL client over HTTP
#[derive(Debug, Clone)]
pub struct ProtocolClient {
    http: Client,
    endpoint: String,
}

impl ProtocolClient {
    /// `base_url` is the server root, e.g. `http://localhost:4000`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/graphql", base_url.trim_end_matches('/')),
        }
    }

    /// Run one operation and decode `data`. The first GraphQL error wins.
    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, ClientError> {
        debug!(endpoint = %self.endpoint, "GraphQL request");
        let response: GraphqlResponse<T> = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.errors.into_iter().next() {
            return Err(err.into());
        }
        response
            .data
            .ok_or_else(|| ClientError::Decode("response has neither data nor errors".to_string()))
    }

    pub async fn list_contributions(&self, args: &ListArgs) -> Result<Vec<ContributionSummary>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            contributions: Vec<ContributionSummary>,
        }

        let query = format!(
            "query ListContributions($where: ContributionWhereInput, $orderBy: [ContributionOrderByInput!], \
             $cursor: ContributionWhereUniqueInput, $take: Int, $skip: Int) {{ \
             contributions(where: $where, orderBy: $orderBy, cursor: $cursor, take: $take, skip: $skip) {{ {} }} }}",
            CONTRIBUTION_FIELDS
        );
        let data: Data = self.execute(&query, args.variables()).await?;
        Ok(data.contributions)
    }

    pub async fn list_daos(&self, filter: Option<Value>) -> Result<Vec<DaoSummary>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            guilds: Vec<DaoSummary>,
        }

        let query = "query ListDaos($where: GuildWhereInput) { guilds(where: $where) { id name } }";
        let data: Data = self.execute(query, json!({ "where": filter })).await?;
        Ok(data.guilds)
    }

    /// DAOs the user is a member of
    pub async fn daos_for_user(&self, user_id: i32) -> Result<Vec<DaoSummary>, ClientError> {
        self.list_daos(Some(json!({
            "users": { "some": { "user_id": { "equals": user_id } } }
        })))
        .await
    }

    pub async fn attribute_contribution(
        &self,
        contribution_id: i32,
        dao_id: Option<i32>,
    ) -> Result<ContributionSummary, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            attribute_contribution_to_dao: ContributionSummary,
        }

        let query = format!(
            "mutation Attribute($contributionId: Int!, $daoId: Int) {{ \
             attributeContributionToDao(contributionId: $contributionId, daoId: $daoId) {{ {} }} }}",
            CONTRIBUTION_FIELDS
        );
        let data: Data = self
            .execute(&query, json!({ "contributionId": contribution_id, "daoId": dao_id }))
            .await?;
        Ok(data.attribute_contribution_to_dao)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_codes_map_to_kinds() {
        assert_eq!(ErrorKind::from_code(Some("NOT_FOUND")), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_code(Some("BAD_USER_INPUT")), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_code(None), ErrorKind::Internal);

        let err: ClientError = GraphqlError {
            message: "Contribution not found".into(),
            extensions: Some(json!({ "code": "NOT_FOUND" })),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Contribution not found");
    }

    #[test]
    fn list_args_become_variables() {
        let args = ListArgs {
            cursor: Some(7),
            take: Some(11),
            skip: Some(1),
            ..Default::default()
        };
        assert_eq!(
            args.variables(),
            json!({ "where": null, "orderBy": null, "cursor": { "id": 7 }, "take": 11, "skip": 1 })
        );
    }

    #[test]
    fn endpoint_is_normalised() {
        let client = ProtocolClient::new("http://localhost:4000/");
        assert_eq!(client.endpoint, "http://localhost:4000/graphql");
    }
}
