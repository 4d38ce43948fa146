//! Parsed view of an annotated entity struct, shared by all derives.

use convert_case::{Case, Casing};
use proc_macro2::Span;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
};

/// Column value category; decides filter, update envelope and aggregate types.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    BigInt,
    Float,
    Bool,
    String,
    DateTime,
}

impl ScalarKind {
    fn from_type(ty: &Type) -> Option<Self> {
        let Type::Path(path) = ty else { return None };
        let segment = path.path.segments.last()?;
        match segment.ident.to_string().as_str() {
            "i32" => Some(ScalarKind::Int),
            "i64" | "BigInt" => Some(ScalarKind::BigInt),
            "f64" => Some(ScalarKind::Float),
            "bool" => Some(ScalarKind::Bool),
            "String" => Some(ScalarKind::String),
            "Timestamp" => Some(ScalarKind::DateTime),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::BigInt | ScalarKind::Float)
    }

    /// Filter input type name in `crate::graphql::filters`
    pub fn filter_type(self) -> &'static str {
        match self {
            ScalarKind::Int => "IntFilter",
            ScalarKind::BigInt => "BigIntFilter",
            ScalarKind::Float => "FloatFilter",
            ScalarKind::Bool => "BoolFilter",
            ScalarKind::String => "StringFilter",
            ScalarKind::DateTime => "DateTimeFilter",
        }
    }

    /// Update envelope type name in `crate::graphql::update_ops`
    pub fn update_type(self, nullable: bool) -> String {
        let base = match self {
            ScalarKind::Int => "Int",
            ScalarKind::BigInt => "BigInt",
            ScalarKind::Float => "Float",
            ScalarKind::Bool => "Bool",
            ScalarKind::String => "String",
            ScalarKind::DateTime => "DateTime",
        };
        let prefix = if nullable { "Nullable" } else { "" };
        format!("{}{}FieldUpdateOperationsInput", prefix, base)
    }
}

pub struct ForeignKey {
    pub table: String,
    pub on_delete: String,
}

pub struct FieldModel {
    /// Rust field name, also the SQL column name
    pub ident: Ident,
    pub gql_name: String,
    pub ty: Type,
    /// `ty` with a surrounding `Option` removed
    pub inner: Type,
    pub nullable: bool,
    pub kind: ScalarKind,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<String>,
    pub foreign_key: Option<ForeignKey>,
}

impl FieldModel {
    pub fn column(&self) -> String {
        self.ident.to_string()
    }

    pub fn is_created_at(&self) -> bool {
        self.ident == "created_at"
    }

    pub fn is_updated_at(&self) -> bool {
        self.ident == "updated_at"
    }

    /// May be omitted from a create input
    pub fn optional_on_create(&self) -> bool {
        self.primary_key
            || self.nullable
            || self.default.is_some()
            || self.is_created_at()
            || self.is_updated_at()
    }
}

#[derive(Clone)]
pub enum RelationKind {
    /// FK column on this entity
    BelongsTo(String),
    /// Unique FK column on the target
    HasOne(String),
    /// FK column on the target
    HasMany(String),
}

pub struct RelationModel {
    pub ident: Ident,
    pub gql_name: String,
    pub target: Ident,
    pub kind: RelationKind,
}

pub struct EntityModel {
    pub ident: Ident,
    pub table: String,
    pub plural: String,
    pub default_sort: String,
    pub unique_together: Vec<Vec<String>>,
    pub fields: Vec<FieldModel>,
    pub relations: Vec<RelationModel>,
    pk_index: usize,
}

impl EntityModel {
    pub fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let ident = input.ident.clone();

        let mut table = None;
        let mut plural = None;
        let mut default_sort = None;
        let mut unique_together = Vec::new();
        let mut relations = Vec::new();

        for attr in &input.attrs {
            if attr.path().is_ident("graphql_entity") {
                attr.parse_nested_meta(|meta| {
                    let value: LitStr = meta.value()?.parse()?;
                    if meta.path.is_ident("table") {
                        table = Some(value.value());
                    } else if meta.path.is_ident("plural") {
                        plural = Some(value.value());
                    } else if meta.path.is_ident("default_sort") {
                        default_sort = Some(value.value());
                    } else if meta.path.is_ident("unique") {
                        unique_together.push(split_list(&value.value()));
                    } else {
                        return Err(meta.error("unknown graphql_entity key"));
                    }
                    Ok(())
                })?;
            } else if attr.path().is_ident("relation") {
                relations.push(parse_relation(attr)?);
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .map(parse_field)
                    .collect::<syn::Result<Vec<_>>>()?,
                _ => {
                    return Err(syn::Error::new_spanned(
                        input,
                        "entities must have named fields",
                    ));
                }
            },
            _ => return Err(syn::Error::new_spanned(input, "entities must be structs")),
        };

        let mut keys = fields.iter().enumerate().filter(|(_, f)| f.primary_key);
        let pk_index = match (keys.next(), keys.next()) {
            (Some((index, _)), None) => index,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "exactly one field must be marked #[primary_key]",
                ));
            }
        };

        let table = table.unwrap_or_else(|| ident.to_string().to_case(Case::Snake));
        let plural = plural.unwrap_or_else(|| format!("{}s", ident));
        let default_sort = default_sort.unwrap_or_else(|| "id".to_string());

        Ok(Self {
            ident,
            table,
            plural,
            default_sort,
            unique_together,
            fields,
            relations,
            pk_index,
        })
    }

    pub fn primary_key(&self) -> &FieldModel {
        &self.fields[self.pk_index]
    }

    pub fn field(&self, column: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.ident == column)
    }

    /// `{Entity}{suffix}` in the call-site span
    pub fn type_ident(&self, suffix: &str) -> Ident {
        suffixed(&self.ident, suffix)
    }

    pub fn has_many(&self) -> impl Iterator<Item = (&RelationModel, &str)> {
        self.relations.iter().filter_map(|r| match &r.kind {
            RelationKind::HasMany(fk) => Some((r, fk.as_str())),
            _ => None,
        })
    }
}

pub fn suffixed(ident: &Ident, suffix: &str) -> Ident {
    Ident::new(&format!("{}{}", ident, suffix), ident.span())
}

pub fn prefixed(prefix: &str, ident: &Ident) -> Ident {
    Ident::new(&format!("{}{}", prefix, ident), ident.span())
}

/// lowerCamel form of a PascalCase name
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_relation(attr: &Attribute) -> syn::Result<RelationModel> {
    let mut name = None;
    let mut gql_name = None;
    let mut target = None;
    let mut kind = None;

    attr.parse_nested_meta(|meta| {
        let value: LitStr = meta.value()?.parse()?;
        if meta.path.is_ident("name") {
            name = Some(value.value());
        } else if meta.path.is_ident("graphql_name") {
            gql_name = Some(value.value());
        } else if meta.path.is_ident("target") {
            target = Some(Ident::new(&value.value(), value.span()));
        } else if meta.path.is_ident("belongs_to") {
            kind = Some(RelationKind::BelongsTo(value.value()));
        } else if meta.path.is_ident("has_one") {
            kind = Some(RelationKind::HasOne(value.value()));
        } else if meta.path.is_ident("has_many") {
            kind = Some(RelationKind::HasMany(value.value()));
        } else {
            return Err(meta.error("unknown relation key"));
        }
        Ok(())
    })?;

    let name = name.ok_or_else(|| syn::Error::new_spanned(attr, "relation needs name"))?;
    Ok(RelationModel {
        ident: Ident::new(&name, Span::call_site()),
        gql_name: gql_name.unwrap_or_else(|| name.clone()),
        target: target.ok_or_else(|| syn::Error::new_spanned(attr, "relation needs target"))?,
        kind: kind.ok_or_else(|| {
            syn::Error::new_spanned(attr, "relation needs belongs_to, has_one or has_many")
        })?,
    })
}

fn parse_field(field: &syn::Field) -> syn::Result<FieldModel> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "unnamed field"))?;

    let (inner, nullable) = match option_inner(&field.ty) {
        Some(inner) => (inner.clone(), true),
        None => (field.ty.clone(), false),
    };
    let kind = ScalarKind::from_type(&inner).ok_or_else(|| {
        syn::Error::new_spanned(
            &field.ty,
            "unsupported column type (i32, i64, BigInt, f64, bool, String, Timestamp)",
        )
    })?;

    let mut gql_name = None;
    let mut primary_key = false;
    let mut unique = false;
    let mut default = None;
    let mut foreign_key = None;

    for attr in &field.attrs {
        if attr.path().is_ident("graphql") {
            // Only `name` matters here; async-graphql validates the rest.
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    gql_name = Some(value.value());
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    let _content;
                    syn::parenthesized!(_content in meta.input);
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("primary_key") {
            primary_key = true;
        } else if attr.path().is_ident("unique") {
            unique = true;
        } else if attr.path().is_ident("column") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    let value: LitStr = meta.value()?.parse()?;
                    default = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unknown column key"))
                }
            })?;
        } else if attr.path().is_ident("foreign_key") {
            let mut table = None;
            let mut on_delete = "RESTRICT".to_string();
            attr.parse_nested_meta(|meta| {
                let value: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("table") {
                    table = Some(value.value());
                } else if meta.path.is_ident("on_delete") {
                    on_delete = value.value();
                } else {
                    return Err(meta.error("unknown foreign_key key"));
                }
                Ok(())
            })?;
            let table =
                table.ok_or_else(|| syn::Error::new_spanned(attr, "foreign_key needs table"))?;
            foreign_key = Some(ForeignKey { table, on_delete });
        }
    }

    Ok(FieldModel {
        gql_name: gql_name.unwrap_or_else(|| ident.to_string()),
        ident,
        ty: field.ty.clone(),
        inner,
        nullable,
        kind,
        primary_key,
        unique,
        default,
        foreign_key,
    })
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
