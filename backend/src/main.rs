//! Protocol API server
//!
//! All operations are exposed via GraphQL at /graphql.

use protocol_api::config::Config;
use protocol_api::db::Database;
use protocol_api::graphql::{AppState, build_schema, serve};
use protocol_api::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init(config.log_format);

    tracing::info!("Starting protocol API");

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.prepare(config.seed_database).await?;

    let schema = build_schema(db.clone());
    tracing::info!("GraphQL schema built");

    serve(config.bind_addr()?, AppState { schema, db }).await
}
