//! Procedural macros for the protocol API
//!
//! - `#[derive(GraphQLEntity)]` - table metadata, row decoding, filter,
//!   ordering, create/update and aggregate types
//! - `#[derive(GraphQLRelations)]` - relation resolvers and `_count`
//! - `#[derive(GraphQLOperations)]` - per-entity CRUD query/mutation objects

mod entity;
mod model;
mod operations;
mod relations;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use model::EntityModel;

fn derive_with(input: TokenStream, expand: fn(&EntityModel) -> proc_macro2::TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match EntityModel::parse(&input) {
        Ok(entity) => expand(&entity).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Entity metadata and input/output types.
///
/// ```ignore
/// #[derive(GraphQLEntity, SimpleObject, Clone, Debug)]
/// #[graphql_entity(table = "chain", plural = "Chains", default_sort = "id")]
/// pub struct Chain {
///     #[primary_key]
///     pub id: i32,
///     pub name: String,
///     #[unique]
///     pub chain_id: String,
/// }
/// ```
#[proc_macro_derive(
    GraphQLEntity,
    attributes(graphql_entity, primary_key, unique, foreign_key, column, relation)
)]
pub fn derive_graphql_entity(input: TokenStream) -> TokenStream {
    derive_with(input, entity::expand)
}

/// Relation resolvers from struct-level `#[relation(...)]` attributes.
/// The entity must also carry `#[graphql(complex)]`.
#[proc_macro_derive(
    GraphQLRelations,
    attributes(graphql_entity, primary_key, unique, foreign_key, column, relation)
)]
pub fn derive_graphql_relations(input: TokenStream) -> TokenStream {
    derive_with(input, relations::expand)
}

/// `{Entity}CrudQueries` / `{Entity}CrudMutations`.
#[proc_macro_derive(
    GraphQLOperations,
    attributes(graphql_entity, primary_key, unique, foreign_key, column, relation)
)]
pub fn derive_graphql_operations(input: TokenStream) -> TokenStream {
    derive_with(input, operations::expand)
}
