//! `#[derive(GraphQLOperations)]`: `{E}CrudQueries` and `{E}CrudMutations`
//! objects, merged into the schema roots.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::LitStr;

use crate::model::{EntityModel, lower_first, prefixed};

pub fn expand(entity: &EntityModel) -> TokenStream {
    let queries = queries(entity);
    let mutations = mutations(entity);
    quote! {
        #queries
        #mutations
    }
}

fn name(value: String) -> LitStr {
    LitStr::new(&value, Span::call_site())
}

fn queries(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let entity_name = ident.to_string();
    let queries_ident = entity.type_ident("CrudQueries");
    let where_input = entity.type_ident("WhereInput");
    let unique_input = entity.type_ident("WhereUniqueInput");
    let order_input = entity.type_ident("OrderByInput");
    let aggregate = prefixed("Aggregate", ident);

    let find_unique = name(lower_first(&entity_name));
    let find_first = name(format!("findFirst{}", entity_name));
    let find_many = name(lower_first(&entity.plural));
    let aggregate_name = name(format!("aggregate{}", entity_name));

    quote! {
        #[derive(Default)]
        pub struct #queries_ident;

        #[async_graphql::Object]
        impl #queries_ident {
            #[graphql(name = #find_unique)]
            async fn find_unique(
                &self,
                ctx: &async_graphql::Context<'_>,
                #[graphql(name = "where")] filter: #unique_input,
            ) -> async_graphql::Result<Option<#ident>> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::find_unique::<#ident, _>(pool, &filter).await,
                )
            }

            #[graphql(name = #find_first)]
            async fn find_first(
                &self,
                ctx: &async_graphql::Context<'_>,
                #[graphql(name = "where")] filter: Option<#where_input>,
                #[graphql(name = "orderBy")] order_by: Option<Vec<#order_input>>,
                cursor: Option<#unique_input>,
                take: Option<i32>,
                skip: Option<i32>,
            ) -> async_graphql::Result<Option<#ident>> {
                let pool = crate::graphql::orm::pool(ctx)?;
                let args = crate::graphql::orm::FindManyArgs { filter, order_by, cursor, take, skip };
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::find_first::<#ident, _, _, _>(pool, &args).await,
                )
            }

            #[graphql(name = #find_many)]
            async fn find_many(
                &self,
                ctx: &async_graphql::Context<'_>,
                #[graphql(name = "where")] filter: Option<#where_input>,
                #[graphql(name = "orderBy")] order_by: Option<Vec<#order_input>>,
                cursor: Option<#unique_input>,
                take: Option<i32>,
                skip: Option<i32>,
            ) -> async_graphql::Result<Vec<#ident>> {
                let pool = crate::graphql::orm::pool(ctx)?;
                let args = crate::graphql::orm::FindManyArgs { filter, order_by, cursor, take, skip };
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::find_many::<#ident, _, _, _>(pool, &args).await,
                )
            }

            #[graphql(name = #aggregate_name)]
            async fn aggregate(
                &self,
                ctx: &async_graphql::Context<'_>,
                #[graphql(name = "where")] filter: Option<#where_input>,
                #[graphql(name = "orderBy")] order_by: Option<Vec<#order_input>>,
                cursor: Option<#unique_input>,
                take: Option<i32>,
                skip: Option<i32>,
            ) -> async_graphql::Result<#aggregate> {
                let pool = crate::graphql::orm::pool(ctx)?;
                let args = crate::graphql::orm::FindManyArgs { filter, order_by, cursor, take, skip };
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::aggregate::<#ident, #aggregate, _, _, _>(pool, &args)
                        .await,
                )
            }
        }
    }
}

fn mutations(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let entity_name = ident.to_string();
    let mutations_ident = entity.type_ident("CrudMutations");
    let where_input = entity.type_ident("WhereInput");
    let unique_input = entity.type_ident("WhereUniqueInput");
    let create_input = entity.type_ident("CreateInput");
    let update_input = entity.type_ident("UpdateInput");

    let create_one = name(format!("createOne{}", entity_name));
    let create_many = name(format!("createMany{}", entity_name));
    let update_one = name(format!("updateOne{}", entity_name));
    let update_many = name(format!("updateMany{}", entity_name));
    let delete_one = name(format!("deleteOne{}", entity_name));
    let delete_many = name(format!("deleteMany{}", entity_name));

    quote! {
        #[derive(Default)]
        pub struct #mutations_ident;

        #[async_graphql::Object]
        impl #mutations_ident {
            #[graphql(name = #create_one)]
            async fn create_one(
                &self,
                ctx: &async_graphql::Context<'_>,
                data: #create_input,
            ) -> async_graphql::Result<#ident> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::create_one::<#ident, _>(pool, &data).await,
                )
            }

            #[graphql(name = #create_many)]
            async fn create_many(
                &self,
                ctx: &async_graphql::Context<'_>,
                data: Vec<#create_input>,
            ) -> async_graphql::Result<crate::graphql::orm::AffectedRowsOutput> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::create_many::<#ident, _>(pool, &data).await,
                )
            }

            #[graphql(name = #update_one)]
            async fn update_one(
                &self,
                ctx: &async_graphql::Context<'_>,
                data: #update_input,
                #[graphql(name = "where")] filter: #unique_input,
            ) -> async_graphql::Result<Option<#ident>> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::update_one::<#ident, _, _>(pool, &data, &filter)
                        .await
                        .map(Some),
                )
            }

            #[graphql(name = #update_many)]
            async fn update_many(
                &self,
                ctx: &async_graphql::Context<'_>,
                data: #update_input,
                #[graphql(name = "where")] filter: Option<#where_input>,
            ) -> async_graphql::Result<crate::graphql::orm::AffectedRowsOutput> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::update_many::<#ident, _, _>(
                        pool,
                        &data,
                        filter.as_ref(),
                    )
                    .await,
                )
            }

            #[graphql(name = #delete_one)]
            async fn delete_one(
                &self,
                ctx: &async_graphql::Context<'_>,
                #[graphql(name = "where")] filter: #unique_input,
            ) -> async_graphql::Result<Option<#ident>> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::delete_one::<#ident, _>(pool, &filter)
                        .await
                        .map(Some),
                )
            }

            #[graphql(name = #delete_many)]
            async fn delete_many(
                &self,
                ctx: &async_graphql::Context<'_>,
                #[graphql(name = "where")] filter: Option<#where_input>,
            ) -> async_graphql::Result<crate::graphql::orm::AffectedRowsOutput> {
                let pool = crate::graphql::orm::pool(ctx)?;
                crate::error::IntoGraphql::gql(
                    crate::graphql::orm::crud::delete_many::<#ident, _>(pool, filter.as_ref()).await,
                )
            }
        }
    }
}
