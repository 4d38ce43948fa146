//! GraphQL API
//!
//! Entities live in [`entities`]; their filter, ordering, create/update and
//! aggregate types and their CRUD operations are generated by the
//! `protocol-macros` derives on top of the [`orm`] layer. Hand-written
//! domain mutations sit next to them ([`attribution`]).

pub mod attribution;
pub mod entities;
pub mod filters;
pub mod orm;
pub mod scalars;
mod schema;
pub mod service;
pub mod update_ops;

pub use schema::{MutationRoot, ProtocolSchema, QueryRoot, build_schema};
pub use service::{AppState, router, serve};
