//! GraphQL ORM Layer
//!
//! Provides traits and utilities for macro-generated GraphQL entities.
//! The `protocol-macros` crate generates implementations of these traits
//! from annotated Rust structs, creating a single source of truth for:
//! - GraphQL types (SimpleObject with snake_case scalar fields)
//! - Filter inputs (WhereInput, WhereUniqueInput, relation filters)
//! - Sort inputs (OrderByInput)
//! - Create/update inputs and aggregate outputs
//! - SQL query generation (parameterized via sqlx)
//! - Row decoding (FromSqlRow)
//! - Relation resolution (one statement per relation field)
//!
//! ```rust,ignore
//! use crate::graphql::entities::{Contribution, ContributionWhereInput};
//! use crate::graphql::filters::IntFilter;
//!
//! let contributions = EntityQuery::<Contribution>::new()
//!     .filter(&ContributionWhereInput {
//!         user_id: Some(IntFilter::equals(user_id)),
//!         ..Default::default()
//!     })
//!     .fetch_all(db.pool())
//!     .await?;
//! ```

mod builder;
pub mod crud;
pub mod relations;
mod traits;

pub use builder::*;
pub use traits::*;

use async_graphql::Context;
use sqlx::SqlitePool;

use crate::db::Database;

/// The store handle registered in schema data.
pub fn database<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Database> {
    ctx.data::<Database>()
}

/// Shorthand for the pool behind [database].
pub fn pool<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a SqlitePool> {
    database(ctx).map(Database::pool)
}
