//! `#[derive(GraphQLEntity)]`: table metadata, row decoding and every
//! per-entity input/output type (filters, ordering, create/update inputs,
//! aggregates).

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::model::{EntityModel, FieldModel, RelationKind, ScalarKind, prefixed, suffixed};

pub fn expand(entity: &EntityModel) -> TokenStream {
    let parts = [
        database_entity(entity),
        database_schema(entity),
        from_row(entity),
        where_input(entity),
        where_unique_input(entity),
        order_by_input(entity),
        relation_filters(entity),
        create_input(entity),
        update_input(entity),
        aggregates(entity),
    ];
    quote! { #(#parts)* }
}

/// Path of an entity-level item; all entities live in one module.
pub fn entity_path(ident: &Ident) -> TokenStream {
    quote! { crate::graphql::entities::#ident }
}

fn lit(value: &str) -> syn::LitStr {
    syn::LitStr::new(value, proc_macro2::Span::call_site())
}

fn database_entity(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let entity_name = lit(&ident.to_string());
    let table = lit(&entity.table);
    let plural = lit(&entity.plural);
    let pk = entity.primary_key();
    let pk_column = lit(&pk.column());
    let pk_ident = &pk.ident;
    let default_sort = lit(&entity.default_sort);
    let columns = entity.fields.iter().map(|f| lit(&f.column()));

    quote! {
        impl crate::graphql::orm::DatabaseEntity for #ident {
            const ENTITY_NAME: &'static str = #entity_name;
            const TABLE_NAME: &'static str = #table;
            const PLURAL_NAME: &'static str = #plural;
            const PRIMARY_KEY: &'static str = #pk_column;
            const DEFAULT_SORT: &'static str = #default_sort;

            fn column_names() -> &'static [&'static str] {
                &[#(#columns),*]
            }

            fn primary_key_value(&self) -> i64 {
                i64::from(self.#pk_ident)
            }
        }
    }
}

fn database_schema(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let columns = entity.fields.iter().map(|f| {
        let name = lit(&f.column());
        let ty = &f.ty;
        let is_pk = f.primary_key;
        let unique = f.unique;
        let default = match &f.default {
            Some(value) => {
                let value = lit(value);
                quote! { Some(#value) }
            }
            None => quote! { None },
        };
        let foreign_key = match &f.foreign_key {
            Some(fk) => {
                let table = lit(&fk.table);
                let on_delete = lit(&fk.on_delete);
                quote! {
                    Some(crate::graphql::orm::ForeignKeyDef {
                        table: #table,
                        column: "id",
                        on_delete: #on_delete,
                    })
                }
            }
            None => quote! { None },
        };
        quote! {
            crate::graphql::orm::ColumnDef {
                name: #name,
                sql_type: <#ty as crate::graphql::orm::SqlColumn>::SQL_TYPE,
                nullable: <#ty as crate::graphql::orm::SqlColumn>::NULLABLE,
                is_primary_key: #is_pk,
                unique: #unique,
                default: #default,
                foreign_key: #foreign_key,
            }
        }
    });
    let groups = entity.unique_together.iter().map(|group| {
        let names = group.iter().map(|c| lit(c));
        quote! { &[#(#names),*] }
    });

    quote! {
        impl crate::graphql::orm::DatabaseSchema for #ident {
            fn columns() -> &'static [crate::graphql::orm::ColumnDef] {
                static COLUMNS: &[crate::graphql::orm::ColumnDef] = &[#(#columns),*];
                COLUMNS
            }

            fn unique_constraints() -> &'static [&'static [&'static str]] {
                &[#(#groups),*]
            }
        }
    }
}

fn from_row(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let fields = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let column = lit(&f.column());
        let ty = &f.ty;
        quote! {
            #name: <#ty as crate::graphql::orm::SqlColumn>::decode(row, #column)?
        }
    });

    quote! {
        impl crate::graphql::orm::FromSqlRow for #ident {
            fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
                Ok(Self {
                    #(#fields),*
                })
            }
        }
    }
}

fn filter_path(kind: ScalarKind) -> TokenStream {
    let name = format_ident!("{}", kind.filter_type());
    quote! { crate::graphql::filters::#name }
}

/// Correlation between this entity's table and a relation target's table.
fn relation_link(entity: &EntityModel, target: &Ident, kind: &RelationKind) -> TokenStream {
    let this = &entity.ident;
    let target = entity_path(target);
    match kind {
        RelationKind::BelongsTo(fk) => {
            let fk = lit(fk);
            quote! {
                format!(
                    "{}.{} = {}.{}",
                    <#target as crate::graphql::orm::DatabaseEntity>::TABLE_NAME,
                    <#target as crate::graphql::orm::DatabaseEntity>::PRIMARY_KEY,
                    <#this as crate::graphql::orm::DatabaseEntity>::TABLE_NAME,
                    #fk
                )
            }
        }
        RelationKind::HasOne(fk) | RelationKind::HasMany(fk) => {
            let fk = lit(fk);
            quote! {
                format!(
                    "{}.{} = {}.{}",
                    <#target as crate::graphql::orm::DatabaseEntity>::TABLE_NAME,
                    #fk,
                    <#this as crate::graphql::orm::DatabaseEntity>::TABLE_NAME,
                    <#this as crate::graphql::orm::DatabaseEntity>::PRIMARY_KEY
                )
            }
        }
    }
}

fn where_input(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let where_ident = entity.type_ident("WhereInput");
    let gql_name = lit(&where_ident.to_string());

    let column_fields = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let gql = lit(&f.gql_name);
        let filter = filter_path(f.kind);
        quote! {
            #[graphql(name = #gql)]
            pub #name: Option<#filter>,
        }
    });
    let column_sql = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let column = lit(&f.column());
        quote! {
            if let Some(ref filter) = self.#name {
                let (c, v) = crate::graphql::filters::FieldFilter::to_sql(filter, #column);
                conditions.extend(c);
                values.extend(v);
            }
        }
    });

    let relation_fields = entity.relations.iter().map(|r| {
        let name = &r.ident;
        let gql = lit(&r.gql_name);
        let filter = entity_path(&match r.kind {
            RelationKind::HasMany(_) => suffixed(&r.target, "ListRelationFilter"),
            _ => suffixed(&r.target, "RelationFilter"),
        });
        quote! {
            #[graphql(name = #gql)]
            pub #name: Option<Box<#filter>>,
        }
    });
    let relation_sql = entity.relations.iter().map(|r| {
        let name = &r.ident;
        let link = relation_link(entity, &r.target, &r.kind);
        quote! {
            if let Some(ref filter) = self.#name {
                let (c, v) = filter.to_relation_sql(&#link);
                conditions.extend(c);
                values.extend(v);
            }
        }
    });

    let empty_checks = entity
        .fields
        .iter()
        .map(|f| &f.ident)
        .chain(entity.relations.iter().map(|r| &r.ident))
        .map(|name| quote! { && self.#name.is_none() });

    let doc = format!("Filter for {} lists", ident);
    quote! {
        #[doc = #doc]
        #[derive(async_graphql::InputObject, Default, Clone, Debug)]
        #[graphql(name = #gql_name)]
        pub struct #where_ident {
            #[graphql(name = "AND")]
            pub and: Option<Vec<#where_ident>>,
            #[graphql(name = "OR")]
            pub or: Option<Vec<#where_ident>>,
            #[graphql(name = "NOT")]
            pub not: Option<Vec<#where_ident>>,
            #(#column_fields)*
            #(#relation_fields)*
        }

        impl crate::graphql::orm::DatabaseFilter for #where_ident {
            fn to_sql_conditions(
                &self,
            ) -> (Vec<String>, Vec<crate::graphql::orm::SqlValue>) {
                let mut conditions: Vec<String> = Vec::new();
                let mut values: Vec<crate::graphql::orm::SqlValue> = Vec::new();
                #(#column_sql)*
                #(#relation_sql)*
                if let Some(ref and) = self.and {
                    let (groups, v) = crate::graphql::orm::filter_groups(and);
                    conditions.extend(groups);
                    values.extend(v);
                }
                if let Some(ref or) = self.or {
                    let (groups, v) = crate::graphql::orm::filter_groups(or);
                    conditions.push(crate::graphql::orm::or_any(groups));
                    values.extend(v);
                }
                if let Some(ref not) = self.not {
                    let (groups, v) = crate::graphql::orm::filter_groups(not);
                    conditions.extend(groups.into_iter().map(|g| format!("NOT {}", g)));
                    values.extend(v);
                }
                (conditions, values)
            }

            fn is_empty(&self) -> bool {
                self.and.is_none() && self.or.is_none() && self.not.is_none()
                    #(#empty_checks)*
            }
        }
    }
}

fn unique_fields(entity: &EntityModel) -> impl Iterator<Item = &FieldModel> {
    entity.fields.iter().filter(|f| f.primary_key || f.unique)
}

fn where_unique_input(entity: &EntityModel) -> TokenStream {
    let ident = entity.type_ident("WhereUniqueInput");
    let gql_name = lit(&ident.to_string());

    let fields = unique_fields(entity).map(|f| {
        let name = &f.ident;
        let gql = lit(&f.gql_name);
        let inner = &f.inner;
        quote! {
            #[graphql(name = #gql)]
            pub #name: Option<#inner>,
        }
    });
    let sql = unique_fields(entity).map(|f| {
        let name = &f.ident;
        let condition = lit(&format!("{} = ?", f.column()));
        quote! {
            if let Some(ref value) = self.#name {
                conditions.push(#condition.to_string());
                values.push(crate::graphql::orm::SqlColumn::to_sql_value(value));
            }
        }
    });
    let empty_checks = unique_fields(entity).map(|f| {
        let name = &f.ident;
        quote! { && self.#name.is_none() }
    });

    quote! {
        #[derive(async_graphql::InputObject, Default, Clone, Debug)]
        #[graphql(name = #gql_name)]
        pub struct #ident {
            #(#fields)*
        }

        impl crate::graphql::orm::DatabaseFilter for #ident {
            fn to_sql_conditions(
                &self,
            ) -> (Vec<String>, Vec<crate::graphql::orm::SqlValue>) {
                let mut conditions: Vec<String> = Vec::new();
                let mut values: Vec<crate::graphql::orm::SqlValue> = Vec::new();
                #(#sql)*
                (conditions, values)
            }

            fn is_empty(&self) -> bool {
                true #(#empty_checks)*
            }
        }
    }
}

fn order_by_input(entity: &EntityModel) -> TokenStream {
    let ident = entity.type_ident("OrderByInput");
    let gql_name = lit(&ident.to_string());

    let fields = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let gql = lit(&f.gql_name);
        quote! {
            #[graphql(name = #gql)]
            pub #name: Option<crate::graphql::orm::SortOrder>,
        }
    });
    let columns = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let column = lit(&f.column());
        quote! {
            if let Some(dir) = self.#name {
                columns.push((#column, dir));
            }
        }
    });

    quote! {
        #[derive(async_graphql::InputObject, Default, Clone, Debug)]
        #[graphql(name = #gql_name)]
        pub struct #ident {
            #(#fields)*
        }

        impl crate::graphql::orm::DatabaseOrderBy for #ident {
            fn order_columns(&self) -> Vec<(&'static str, crate::graphql::orm::SortOrder)> {
                let mut columns = Vec::new();
                #(#columns)*
                columns
            }
        }
    }
}

/// `{E}RelationFilter` (is / isNot) and `{E}ListRelationFilter`
/// (some / every / none), used by entities that point at this one.
fn relation_filters(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let where_ident = entity.type_ident("WhereInput");
    let single = entity.type_ident("RelationFilter");
    let single_name = lit(&single.to_string());
    let list = entity.type_ident("ListRelationFilter");
    let list_name = lit(&list.to_string());

    quote! {
        #[derive(async_graphql::InputObject, Default, Clone, Debug)]
        #[graphql(name = #single_name)]
        pub struct #single {
            #[graphql(name = "is")]
            pub is: Option<Box<#where_ident>>,
            #[graphql(name = "isNot")]
            pub is_not: Option<Box<#where_ident>>,
        }

        impl #single {
            /// EXISTS conditions correlated through `link`
            pub fn to_relation_sql(
                &self,
                link: &str,
            ) -> (Vec<String>, Vec<crate::graphql::orm::SqlValue>) {
                let table = <#ident as crate::graphql::orm::DatabaseEntity>::TABLE_NAME;
                let mut conditions = Vec::new();
                let mut values = Vec::new();
                if let Some(ref inner) = self.is {
                    let (c, v) = crate::graphql::orm::DatabaseFilter::to_sql_conditions(inner.as_ref());
                    conditions.push(format!(
                        "EXISTS (SELECT 1 FROM {} WHERE {} AND {})",
                        table, link, crate::graphql::orm::and_all(c)
                    ));
                    values.extend(v);
                }
                if let Some(ref inner) = self.is_not {
                    let (c, v) = crate::graphql::orm::DatabaseFilter::to_sql_conditions(inner.as_ref());
                    conditions.push(format!(
                        "NOT EXISTS (SELECT 1 FROM {} WHERE {} AND {})",
                        table, link, crate::graphql::orm::and_all(c)
                    ));
                    values.extend(v);
                }
                (conditions, values)
            }
        }

        #[derive(async_graphql::InputObject, Default, Clone, Debug)]
        #[graphql(name = #list_name)]
        pub struct #list {
            #[graphql(name = "some")]
            pub some: Option<Box<#where_ident>>,
            #[graphql(name = "every")]
            pub every: Option<Box<#where_ident>>,
            #[graphql(name = "none")]
            pub none: Option<Box<#where_ident>>,
        }

        impl #list {
            /// EXISTS conditions correlated through `link`
            pub fn to_relation_sql(
                &self,
                link: &str,
            ) -> (Vec<String>, Vec<crate::graphql::orm::SqlValue>) {
                let table = <#ident as crate::graphql::orm::DatabaseEntity>::TABLE_NAME;
                let mut conditions = Vec::new();
                let mut values = Vec::new();
                if let Some(ref inner) = self.some {
                    let (c, v) = crate::graphql::orm::DatabaseFilter::to_sql_conditions(inner.as_ref());
                    conditions.push(format!(
                        "EXISTS (SELECT 1 FROM {} WHERE {} AND {})",
                        table, link, crate::graphql::orm::and_all(c)
                    ));
                    values.extend(v);
                }
                if let Some(ref inner) = self.every {
                    let (c, v) = crate::graphql::orm::DatabaseFilter::to_sql_conditions(inner.as_ref());
                    conditions.push(format!(
                        "NOT EXISTS (SELECT 1 FROM {} WHERE {} AND NOT {})",
                        table, link, crate::graphql::orm::and_all(c)
                    ));
                    values.extend(v);
                }
                if let Some(ref inner) = self.none {
                    let (c, v) = crate::graphql::orm::DatabaseFilter::to_sql_conditions(inner.as_ref());
                    conditions.push(format!(
                        "NOT EXISTS (SELECT 1 FROM {} WHERE {} AND {})",
                        table, link, crate::graphql::orm::and_all(c)
                    ));
                    values.extend(v);
                }
                (conditions, values)
            }
        }
    }
}

fn create_input(entity: &EntityModel) -> TokenStream {
    let ident = entity.type_ident("CreateInput");
    let gql_name = lit(&ident.to_string());

    let fields = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let gql = lit(&f.gql_name);
        let inner = &f.inner;
        if f.optional_on_create() {
            quote! {
                #[graphql(name = #gql)]
                pub #name: Option<#inner>,
            }
        } else {
            quote! {
                #[graphql(name = #gql)]
                pub #name: #inner,
            }
        }
    });

    let values = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let column = lit(&f.column());
        if f.is_created_at() || f.is_updated_at() {
            quote! {
                values.push((
                    #column,
                    match self.#name {
                        Some(ref value) => crate::graphql::orm::SqlColumn::to_sql_value(value),
                        None => now.clone(),
                    },
                ));
            }
        } else if f.optional_on_create() {
            quote! {
                if let Some(ref value) = self.#name {
                    values.push((#column, crate::graphql::orm::SqlColumn::to_sql_value(value)));
                }
            }
        } else {
            quote! {
                values.push((#column, crate::graphql::orm::SqlColumn::to_sql_value(&self.#name)));
            }
        }
    });

    let now = entity
        .fields
        .iter()
        .any(|f| f.is_created_at() || f.is_updated_at())
        .then(|| quote! { let now = crate::graphql::orm::now_value(); });

    quote! {
        #[derive(async_graphql::InputObject, Clone, Debug)]
        #[graphql(name = #gql_name)]
        pub struct #ident {
            #(#fields)*
        }

        impl crate::graphql::orm::InsertValues for #ident {
            fn insert_values(&self) -> Vec<(&'static str, crate::graphql::orm::SqlValue)> {
                #now
                let mut values = Vec::new();
                #(#values)*
                values
            }
        }
    }
}

fn update_input(entity: &EntityModel) -> TokenStream {
    let ident = entity.type_ident("UpdateInput");
    let gql_name = lit(&ident.to_string());
    let updatable: Vec<&FieldModel> = entity.fields.iter().filter(|f| !f.primary_key).collect();

    let fields = updatable.iter().map(|f| {
        let name = &f.ident;
        let gql = lit(&f.gql_name);
        let envelope = format_ident!("{}", f.kind.update_type(f.nullable));
        quote! {
            #[graphql(name = #gql)]
            pub #name: Option<crate::graphql::update_ops::#envelope>,
        }
    });

    let assignments = updatable.iter().filter(|f| !f.is_updated_at()).map(|f| {
        let name = &f.ident;
        let column = lit(&f.column());
        quote! {
            if let Some(op) = self.#name.as_ref() {
                if let Some((a, v)) = crate::graphql::update_ops::FieldUpdate::assignment(op, #column)? {
                    assignments.push(a);
                    values.extend(v);
                }
            }
        }
    });

    let touch = match entity.field("updated_at") {
        Some(_) => quote! {
            if !assignments.is_empty() || self.updated_at.is_some() {
                let explicit = match self.updated_at.as_ref() {
                    Some(op) => crate::graphql::update_ops::FieldUpdate::assignment(op, "updated_at")?,
                    None => None,
                };
                match explicit {
                    Some((a, v)) => {
                        assignments.push(a);
                        values.extend(v);
                    }
                    None => {
                        assignments.push("updated_at = ?".to_string());
                        values.push(crate::graphql::orm::now_value());
                    }
                }
            }
        },
        None => quote! {},
    };

    quote! {
        #[derive(async_graphql::InputObject, Default, Clone, Debug)]
        #[graphql(name = #gql_name)]
        pub struct #ident {
            #(#fields)*
        }

        impl crate::graphql::orm::UpdateAssignments for #ident {
            fn assignments(
                &self,
            ) -> crate::error::ApiResult<(Vec<String>, Vec<crate::graphql::orm::SqlValue>)> {
                let mut assignments: Vec<String> = Vec::new();
                let mut values: Vec<crate::graphql::orm::SqlValue> = Vec::new();
                #(#assignments)*
                #touch
                Ok((assignments, values))
            }
        }
    }
}

/// Output type of `_sum` for a column kind
fn sum_type(f: &FieldModel) -> TokenStream {
    match f.kind {
        ScalarKind::Int => quote! { Option<i64> },
        ScalarKind::Float => quote! { Option<f64> },
        _ => {
            let inner = &f.inner;
            quote! { Option<#inner> }
        }
    }
}

fn aggregates(entity: &EntityModel) -> TokenStream {
    let ident = &entity.ident;
    let aggregate = prefixed("Aggregate", ident);
    let aggregate_name = lit(&aggregate.to_string());
    let count = entity.type_ident("CountAggregate");
    let count_name = lit(&count.to_string());
    let sum = entity.type_ident("SumAggregate");
    let sum_name = lit(&sum.to_string());
    let avg = entity.type_ident("AvgAggregate");
    let avg_name = lit(&avg.to_string());
    let min = entity.type_ident("MinAggregate");
    let min_name = lit(&min.to_string());
    let max = entity.type_ident("MaxAggregate");
    let max_name = lit(&max.to_string());

    let numeric: Vec<&FieldModel> = entity.fields.iter().filter(|f| f.kind.is_numeric()).collect();

    let mut exprs = vec!["COUNT(*) AS _count__all".to_string()];
    for f in &entity.fields {
        exprs.push(format!("COUNT({0}) AS _count_{0}", f.column()));
    }
    for op in ["sum", "avg", "min", "max"] {
        for f in &numeric {
            exprs.push(format!(
                "{func}({column}) AS _{op}_{column}",
                func = op.to_uppercase(),
                column = f.column(),
            ));
        }
    }
    let exprs = lit(&exprs.join(", "));

    let count_fields = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let gql = lit(&f.gql_name);
        quote! {
            #[graphql(name = #gql)]
            pub #name: i64,
        }
    });
    let count_decode = entity.fields.iter().map(|f| {
        let name = &f.ident;
        let alias = lit(&format!("_count_{}", f.column()));
        quote! { #name: sqlx::Row::try_get(row, #alias)?, }
    });

    let typed_fields = |ty_of: &dyn Fn(&FieldModel) -> TokenStream| {
        numeric
            .iter()
            .map(|f| {
                let name = &f.ident;
                let gql = lit(&f.gql_name);
                let ty = ty_of(f);
                quote! {
                    #[graphql(name = #gql)]
                    pub #name: #ty,
                }
            })
            .collect::<Vec<_>>()
    };
    let typed_decode = |op: &str, ty_of: &dyn Fn(&FieldModel) -> TokenStream| {
        numeric
            .iter()
            .map(|f| {
                let name = &f.ident;
                let alias = lit(&format!("_{}_{}", op, f.column()));
                let ty = ty_of(f);
                quote! {
                    #name: <#ty as crate::graphql::orm::SqlColumn>::decode(row, #alias)?,
                }
            })
            .collect::<Vec<_>>()
    };

    let avg_type = |_: &FieldModel| quote! { Option<f64> };
    let same_type = |f: &FieldModel| {
        let inner = &f.inner;
        quote! { Option<#inner> }
    };

    let sum_fields = typed_fields(&sum_type);
    let sum_decode = typed_decode("sum", &sum_type);
    let avg_fields = typed_fields(&avg_type);
    let avg_decode = typed_decode("avg", &avg_type);
    let min_fields = typed_fields(&same_type);
    let min_decode = typed_decode("min", &same_type);
    let max_fields = typed_fields(&same_type);
    let max_decode = typed_decode("max", &same_type);

    quote! {
        #[derive(async_graphql::SimpleObject, Clone, Debug)]
        #[graphql(name = #count_name)]
        pub struct #count {
            #[graphql(name = "_all")]
            pub _all: i64,
            #(#count_fields)*
        }

        #[derive(async_graphql::SimpleObject, Clone, Debug)]
        #[graphql(name = #sum_name)]
        pub struct #sum {
            #(#sum_fields)*
        }

        #[derive(async_graphql::SimpleObject, Clone, Debug)]
        #[graphql(name = #avg_name)]
        pub struct #avg {
            #(#avg_fields)*
        }

        #[derive(async_graphql::SimpleObject, Clone, Debug)]
        #[graphql(name = #min_name)]
        pub struct #min {
            #(#min_fields)*
        }

        #[derive(async_graphql::SimpleObject, Clone, Debug)]
        #[graphql(name = #max_name)]
        pub struct #max {
            #(#max_fields)*
        }

        #[derive(async_graphql::SimpleObject, Clone, Debug)]
        #[graphql(name = #aggregate_name)]
        pub struct #aggregate {
            #[graphql(name = "_count")]
            pub _count: Option<#count>,
            #[graphql(name = "_sum")]
            pub _sum: Option<#sum>,
            #[graphql(name = "_avg")]
            pub _avg: Option<#avg>,
            #[graphql(name = "_min")]
            pub _min: Option<#min>,
            #[graphql(name = "_max")]
            pub _max: Option<#max>,
        }

        impl crate::graphql::orm::AggregateOutput for #aggregate {
            fn select_exprs() -> String {
                #exprs.to_string()
            }

            fn from_aggregate_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
                Ok(Self {
                    _count: Some(#count {
                        _all: sqlx::Row::try_get(row, "_count__all")?,
                        #(#count_decode)*
                    }),
                    _sum: Some(#sum { #(#sum_decode)* }),
                    _avg: Some(#avg { #(#avg_decode)* }),
                    _min: Some(#min { #(#min_decode)* }),
                    _max: Some(#max { #(#max_decode)* }),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::DeriveInput;

    fn create_tokens(src: &str) -> String {
        let input: DeriveInput = syn::parse_str(src).unwrap();
        create_input(&EntityModel::parse(&input).unwrap()).to_string()
    }

    #[test]
    fn create_input_stamps_only_timestamp_columns() {
        let stamped = create_tokens(
            r#"
            #[graphql_entity(table = "partner", plural = "Partners")]
            struct Partner {
                #[primary_key]
                id: i32,
                #[graphql(name = "createdAt")]
                created_at: Timestamp,
            }
            "#,
        );
        assert!(stamped.contains("now_value"));

        let plain = create_tokens(
            r#"
            #[graphql_entity(table = "tag", plural = "Tags")]
            struct Tag {
                #[primary_key]
                id: i32,
                name: String,
            }
            "#,
        );
        assert!(!plain.contains("now_value"));
        assert!(!plain.contains("let _"));
    }
}
