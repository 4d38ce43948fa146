//! `#[derive(GraphQLRelations)]`: a `ComplexObject` impl with one resolver
//! per `#[relation(...)]` plus `_count` for to-many relations.

use proc_macro2::TokenStream;
use quote::quote;

use crate::entity::entity_path;
use crate::model::{EntityModel, RelationKind, RelationModel, suffixed};

pub fn expand(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let pk = &entity.primary_key().ident;
    let resolvers = entity
        .relations
        .iter()
        .map(|relation| resolver(entity, relation));
    let (count_type, count_resolver) = count(entity);

    quote! {
        #count_type

        #[async_graphql::ComplexObject]
        impl #ident {
            #(#resolvers)*
            #count_resolver
        }

        impl #ident {
            fn relation_root(&self) -> i64 {
                i64::from(self.#pk)
            }
        }
    }
}

fn resolver(entity: &EntityModel, relation: &RelationModel) -> TokenStream {
    let this = &entity.ident;
    let name = &relation.ident;
    let gql = syn::LitStr::new(&relation.gql_name, proc_macro2::Span::call_site());
    let target = entity_path(&relation.target);

    match &relation.kind {
        RelationKind::BelongsTo(fk) => {
            let nullable = entity.field(fk).map(|f| f.nullable).unwrap_or(true);
            let doc = format!("{} referenced by `{}`", relation.target, fk);
            if nullable {
                quote! {
                    #[doc = #doc]
                    #[graphql(name = #gql)]
                    async fn #name(
                        &self,
                        ctx: &async_graphql::Context<'_>,
                    ) -> async_graphql::Result<Option<#target>> {
                        let pool = crate::graphql::orm::pool(ctx)?;
                        crate::error::IntoGraphql::gql(
                            crate::graphql::orm::relations::belongs_to::<#this, #target>(
                                pool,
                                self.relation_root(),
                                #fk,
                            )
                            .await,
                        )
                    }
                }
            } else {
                quote! {
                    #[doc = #doc]
                    #[graphql(name = #gql)]
                    async fn #name(
                        &self,
                        ctx: &async_graphql::Context<'_>,
                    ) -> async_graphql::Result<#target> {
                        let pool = crate::graphql::orm::pool(ctx)?;
                        crate::error::IntoGraphql::gql(
                            crate::graphql::orm::relations::belongs_to_required::<#this, #target>(
                                pool,
                                self.relation_root(),
                                #fk,
                            )
                            .await,
                        )
                    }
                }
            }
        }
        RelationKind::HasOne(fk) => {
            let doc = format!("{} whose `{}` points here", relation.target, fk);
            quote! {
                #[doc = #doc]
                #[graphql(name = #gql)]
                async fn #name(
                    &self,
                    ctx: &async_graphql::Context<'_>,
                ) -> async_graphql::Result<Option<#target>> {
                    let pool = crate::graphql::orm::pool(ctx)?;
                    crate::error::IntoGraphql::gql(
                        crate::graphql::orm::relations::has_one::<#this, #target>(
                            pool,
                            self.relation_root(),
                            #fk,
                        )
                        .await,
                    )
                }
            }
        }
        RelationKind::HasMany(fk) => {
            let where_input = entity_path(&suffixed(&relation.target, "WhereInput"));
            let unique_input = entity_path(&suffixed(&relation.target, "WhereUniqueInput"));
            let order_input = entity_path(&suffixed(&relation.target, "OrderByInput"));
            let doc = format!("{} rows whose `{}` points here", relation.target, fk);
            quote! {
                #[doc = #doc]
                #[graphql(name = #gql)]
                #[allow(clippy::too_many_arguments)]
                async fn #name(
                    &self,
                    ctx: &async_graphql::Context<'_>,
                    #[graphql(name = "where")] filter: Option<#where_input>,
                    #[graphql(name = "orderBy")] order_by: Option<Vec<#order_input>>,
                    #[graphql(name = "cursor")] cursor: Option<#unique_input>,
                    #[graphql(name = "take")] take: Option<i32>,
                    #[graphql(name = "skip")] skip: Option<i32>,
                ) -> async_graphql::Result<Vec<#target>> {
                    let pool = crate::graphql::orm::pool(ctx)?;
                    let args = crate::graphql::orm::FindManyArgs {
                        filter,
                        order_by,
                        cursor,
                        take,
                        skip,
                    };
                    crate::error::IntoGraphql::gql(
                        crate::graphql::orm::relations::has_many::<#this, #target, _, _, _>(
                            pool,
                            self.relation_root(),
                            #fk,
                            &args,
                        )
                        .await,
                    )
                }
            }
        }
    }
}

/// `{E}Count` output type and the `_count` resolver.
fn count(entity: &EntityModel) -> (TokenStream, TokenStream) {
    let this = &entity.ident;
    let many: Vec<_> = entity.has_many().collect();
    if many.is_empty() {
        return (quote! {}, quote! {});
    }

    let count_ident = entity.type_ident("Count");
    let count_name = syn::LitStr::new(&count_ident.to_string(), proc_macro2::Span::call_site());

    let fields = many.iter().map(|(relation, _)| {
        let name = &relation.ident;
        let gql = syn::LitStr::new(&relation.gql_name, proc_macro2::Span::call_site());
        quote! {
            #[graphql(name = #gql)]
            pub #name: i64,
        }
    });
    let pairs = many.iter().map(|(relation, fk)| {
        let target = entity_path(&relation.target);
        quote! {
            (<#target as crate::graphql::orm::DatabaseEntity>::TABLE_NAME, #fk)
        }
    });
    let assign = many.iter().enumerate().map(|(i, (relation, _))| {
        let name = &relation.ident;
        quote! { #name: counts[#i], }
    });

    let count_type = quote! {
        #[derive(async_graphql::SimpleObject, Clone, Debug, Default)]
        #[graphql(name = #count_name)]
        pub struct #count_ident {
            #(#fields)*
        }
    };
    let count_resolver = quote! {
        /// Sizes of the to-many relations
        #[graphql(name = "_count")]
        async fn relation_count(
            &self,
            ctx: &async_graphql::Context<'_>,
        ) -> async_graphql::Result<#count_ident> {
            let pool = crate::graphql::orm::pool(ctx)?;
            let counts = crate::error::IntoGraphql::gql(
                crate::graphql::orm::relations::relation_counts::<#this>(
                    pool,
                    self.relation_root(),
                    &[#(#pairs),*],
                )
                .await,
            )?;
            Ok(#count_ident {
                #(#assign)*
            })
        }
    };
    (count_type, count_resolver)
}
