//! Core traits for the GraphQL ORM layer
//!
//! These traits are implemented by the `#[derive(GraphQLEntity)]` macro from
//! `protocol-macros`. Column types are described once through [SqlColumn] so
//! the macro never has to know how a Rust type maps to SQLite.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, ValueRef};

use crate::graphql::scalars::{BigInt, Timestamp};

/// Foreign key reference attached to a column.
#[derive(Debug, Clone)]
pub struct ForeignKeyDef {
    /// Referenced table
    pub table: &'static str,
    /// Referenced column (always the primary key)
    pub column: &'static str,
    /// ON DELETE action (CASCADE, RESTRICT, SET NULL)
    pub on_delete: &'static str,
}

/// Column definition for schema generation.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name in the database
    pub name: &'static str,
    /// SQLite column type (TEXT, INTEGER, REAL)
    pub sql_type: &'static str,
    /// Whether the column can be NULL
    pub nullable: bool,
    /// Whether this is the primary key
    pub is_primary_key: bool,
    /// Single-column UNIQUE constraint
    pub unique: bool,
    /// Default value expression (e.g., "1")
    pub default: Option<&'static str>,
    /// Foreign key, if the column references another table
    pub foreign_key: Option<ForeignKeyDef>,
}

impl ColumnDef {
    /// Generate the column definition SQL
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);

        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if !self.nullable && !self.is_primary_key {
            sql.push_str(" NOT NULL");
        }

        if self.unique && !self.is_primary_key {
            sql.push_str(" UNIQUE");
        }

        if let Some(default) = self.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        if let Some(ref fk) = self.foreign_key {
            sql.push_str(&format!(
                " REFERENCES {}({}) ON DELETE {}",
                fk.table, fk.column, fk.on_delete
            ));
        }

        sql
    }
}

/// Trait for database schema generation and migration.
///
/// Implemented by `#[derive(GraphQLEntity)]` macro.
pub trait DatabaseSchema: DatabaseEntity {
    /// Get all column definitions for this entity's table
    fn columns() -> &'static [ColumnDef];

    /// Multi-column UNIQUE constraints
    fn unique_constraints() -> &'static [&'static [&'static str]] {
        &[]
    }

    /// Generate CREATE TABLE IF NOT EXISTS SQL
    fn create_table_sql() -> String {
        let mut defs: Vec<String> = Self::columns().iter().map(|c| c.to_sql()).collect();
        for group in Self::unique_constraints() {
            defs.push(format!("UNIQUE ({})", group.join(", ")));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            Self::TABLE_NAME,
            defs.join(",\n  ")
        )
    }

    /// Get column names that exist in the entity definition
    fn defined_column_names() -> Vec<&'static str> {
        Self::columns().iter().map(|c| c.name).collect()
    }
}

/// Metadata about a database entity (table).
///
/// Implemented by `#[derive(GraphQLEntity)]` macro.
pub trait DatabaseEntity: Sized + Send + Sync {
    /// The GraphQL type name (e.g., "Contribution")
    const ENTITY_NAME: &'static str;

    /// The SQL table name (e.g., "contribution")
    const TABLE_NAME: &'static str;

    /// The GraphQL plural name (e.g., "Contributions")
    const PLURAL_NAME: &'static str;

    /// The primary key column name (e.g., "id")
    const PRIMARY_KEY: &'static str;

    /// Default sort column for list queries
    const DEFAULT_SORT: &'static str;

    /// Default sort direction
    const DEFAULT_SORT_DIR: SortOrder = SortOrder::Asc;

    /// List of all column names in the table
    fn column_names() -> &'static [&'static str];

    /// Primary key of this row
    fn primary_key_value(&self) -> i64;

    /// Build a SELECT query for all columns
    fn select_sql() -> String {
        let columns = Self::column_names().join(", ");
        format!("SELECT {} FROM {}", columns, Self::TABLE_NAME)
    }
}

/// Trait for applying filters to a SQL query.
///
/// Implemented by the generated `*WhereInput` and `*WhereUniqueInput` structs.
/// Conditions use bare `?` placeholders; values are returned in placeholder order.
pub trait DatabaseFilter: Send + Sync {
    /// Return the WHERE clause fragments and the values to bind.
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>);

    /// Check if the filter has any conditions
    fn is_empty(&self) -> bool;
}

/// Trait for applying sort order to a SQL query.
///
/// Implemented by the generated `*OrderByInput` structs.
pub trait DatabaseOrderBy: Send + Sync {
    /// Columns to sort by, in declaration order
    fn order_columns(&self) -> Vec<(&'static str, SortOrder)>;
}

/// Trait for decoding a database row into an entity.
pub trait FromSqlRow: Sized {
    /// Decode a SQLite row into this entity type
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Column/value pairs for an INSERT. Implemented by `*CreateInput`.
pub trait InsertValues: Send + Sync {
    fn insert_values(&self) -> Vec<(&'static str, SqlValue)>;
}

/// SET assignments for an UPDATE. Implemented by `*UpdateInput`.
pub trait UpdateAssignments: Send + Sync {
    /// Assignment fragments (`col = ?`, `col = col + ?`) and their values.
    fn assignments(&self) -> crate::error::ApiResult<(Vec<String>, Vec<SqlValue>)>;
}

/// Output of `aggregate<Entity>`. Implemented by `Aggregate*`.
pub trait AggregateOutput: Sized + Send {
    /// Comma separated aggregate expressions over the rows of a subquery
    fn select_exprs() -> String;

    fn from_aggregate_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Mapping between a Rust field type and a SQLite column.
pub trait SqlColumn: Sized {
    const SQL_TYPE: &'static str;
    const NULLABLE: bool = false;

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error>;

    fn to_sql_value(&self) -> SqlValue;
}

impl SqlColumn for i32 {
    const SQL_TYPE: &'static str = "INTEGER";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        row.try_get(column)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Int(i64::from(*self))
    }
}

impl SqlColumn for i64 {
    const SQL_TYPE: &'static str = "INTEGER";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        row.try_get(column)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Int(*self)
    }
}

impl SqlColumn for BigInt {
    const SQL_TYPE: &'static str = "INTEGER";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        row.try_get::<i64, _>(column).map(BigInt)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Int(self.0)
    }
}

impl SqlColumn for f64 {
    const SQL_TYPE: &'static str = "REAL";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        row.try_get(column)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Float(*self)
    }
}

impl SqlColumn for bool {
    const SQL_TYPE: &'static str = "INTEGER";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        row.try_get(column)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

impl SqlColumn for String {
    const SQL_TYPE: &'static str = "TEXT";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        row.try_get(column)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::String(self.clone())
    }
}

/// Timestamps are stored as RFC 3339 text with millisecond precision so that
/// lexical order matches chronological order.
impl SqlColumn for Timestamp {
    const SQL_TYPE: &'static str = "TEXT";

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        let raw: String = row.try_get(column)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            })
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::String(format_timestamp(self))
    }
}

impl<T: SqlColumn> SqlColumn for Option<T> {
    const SQL_TYPE: &'static str = T::SQL_TYPE;
    const NULLABLE: bool = true;

    fn decode(row: &SqliteRow, column: &str) -> Result<Self, sqlx::Error> {
        if row.try_get_raw(column)?.is_null() {
            return Ok(None);
        }
        T::decode(row, column).map(Some)
    }

    fn to_sql_value(&self) -> SqlValue {
        match self {
            Some(value) => value.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

/// Canonical text form of a stored timestamp.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in the stored timestamp form.
pub fn now_value() -> SqlValue {
    SqlValue::String(format_timestamp(&Utc::now()))
}

/// Sort direction for ORDER BY clauses.
#[derive(async_graphql::Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[graphql(name = "SortOrder", rename_items = "lowercase")]
pub enum SortOrder {
    /// Ascending order (A-Z, 1-9, oldest-newest)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest-oldest)
    Desc,
}

impl SortOrder {
    /// Convert to SQL order string
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Comparison operator for rows that come strictly after a value
    pub fn after_operator(&self) -> &'static str {
        match self {
            SortOrder::Asc => ">",
            SortOrder::Desc => "<",
        }
    }
}

/// Represents a SQL value that can be bound to a query.
///
/// Used by filters to collect values for parameterized queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl SqlValue {
    /// Bind this value to a sqlx query builder
    pub fn bind_to_query<'q>(
        &'q self,
        query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(if *b { 1i32 } else { 0i32 }),
            SqlValue::Null => query.bind(None::<String>),
        }
    }
}

/// Bind every value in order.
pub fn bind_all<'q>(
    sql: &'q str,
    values: &'q [SqlValue],
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    values
        .iter()
        .fold(sqlx::query(sql), |query, value| value.bind_to_query(query))
}

/// Result of a bulk write (`createMany*`, `updateMany*`, `deleteMany*`).
#[derive(async_graphql::SimpleObject, Clone, Debug, Default, PartialEq, Eq)]
#[graphql(name = "AffectedRowsOutput")]
pub struct AffectedRowsOutput {
    #[graphql(name = "count")]
    pub count: i64,
}

/// Join conditions with AND; an empty list matches every row.
pub fn and_all(conditions: Vec<String>) -> String {
    if conditions.is_empty() {
        "1 = 1".to_string()
    } else {
        format!("({})", conditions.join(" AND "))
    }
}

/// Join groups with OR; an empty list matches no row.
pub fn or_any(groups: Vec<String>) -> String {
    if groups.is_empty() {
        "1 = 0".to_string()
    } else {
        format!("({})", groups.join(" OR "))
    }
}

/// Conditions from a list of nested filters, one AND group per filter.
pub fn filter_groups<F: DatabaseFilter>(filters: &[F]) -> (Vec<String>, Vec<SqlValue>) {
    let mut groups = Vec::with_capacity(filters.len());
    let mut values = Vec::new();
    for filter in filters {
        let (conditions, filter_values) = filter.to_sql_conditions();
        groups.push(and_all(conditions));
        values.extend(filter_values);
    }
    (groups, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_def_renders_constraints() {
        let col = ColumnDef {
            name: "guild_id",
            sql_type: "INTEGER",
            nullable: false,
            is_primary_key: false,
            unique: false,
            default: None,
            foreign_key: Some(ForeignKeyDef {
                table: "guild",
                column: "id",
                on_delete: "CASCADE",
            }),
        };
        assert_eq!(
            col.to_sql(),
            "guild_id INTEGER NOT NULL REFERENCES guild(id) ON DELETE CASCADE"
        );
    }

    #[test]
    fn column_def_primary_key_skips_not_null() {
        let col = ColumnDef {
            name: "id",
            sql_type: "INTEGER",
            nullable: false,
            is_primary_key: true,
            unique: true,
            default: None,
            foreign_key: None,
        };
        assert_eq!(col.to_sql(), "id INTEGER PRIMARY KEY");
    }

    #[test]
    fn empty_groups() {
        assert_eq!(and_all(vec![]), "1 = 1");
        assert_eq!(or_any(vec![]), "1 = 0");
        assert_eq!(
            and_all(vec!["a = ?".into(), "b = ?".into()]),
            "(a = ? AND b = ?)"
        );
    }

    #[test]
    fn timestamps_sort_lexically() {
        let earlier = DateTime::parse_from_rfc3339("2023-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2023-11-02T03:04:05.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&earlier), "2023-01-02T03:04:05.000Z");
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }
}
