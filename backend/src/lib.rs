//! Protocol API
//!
//! GraphQL API over users, DAOs (guilds), contributions and attestations,
//! plus a typed client for the same API.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod telemetry;
