//! SQL Query Builder for GraphQL ORM
//!
//! Provides a type-safe query builder that works with `DatabaseEntity` types
//! and uses parameterized queries via sqlx to prevent SQL injection.
//!
//! Placeholders are bare `?`; the builder keeps bind values in the order
//! their placeholders appear in the generated text.

use std::marker::PhantomData;

use sqlx::SqlitePool;

use super::traits::{
    DatabaseEntity, DatabaseFilter, DatabaseOrderBy, FromSqlRow, SortOrder, SqlValue, and_all,
    bind_all, or_any,
};
use crate::error::{ApiError, ApiResult};

/// Arguments shared by every list-shaped read (`findMany`, `findFirst`,
/// `aggregate`, to-many relations).
#[derive(Debug, Clone)]
pub struct FindManyArgs<W, U, O> {
    pub filter: Option<W>,
    pub order_by: Option<Vec<O>>,
    pub cursor: Option<U>,
    pub take: Option<i32>,
    pub skip: Option<i32>,
}

impl<W, U, O> Default for FindManyArgs<W, U, O> {
    fn default() -> Self {
        Self {
            filter: None,
            order_by: None,
            cursor: None,
            take: None,
            skip: None,
        }
    }
}

/// A query builder for database entities.
///
/// Builds parameterized SQL queries for SELECT, UPDATE and DELETE with
/// filtering, sorting, cursor and offset pagination.
pub struct EntityQuery<E: DatabaseEntity> {
    _phantom: PhantomData<E>,
    where_clauses: Vec<String>,
    values: Vec<SqlValue>,
    order: Vec<(&'static str, SortOrder)>,
    cursor: Option<(Vec<String>, Vec<SqlValue>)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl<E: DatabaseEntity + FromSqlRow> EntityQuery<E> {
    /// Create a new query builder for the entity type.
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
            where_clauses: Vec::new(),
            values: Vec::new(),
            order: Vec::new(),
            cursor: None,
            limit: None,
            offset: None,
        }
    }

    /// Apply every part of a [FindManyArgs].
    pub fn apply<W, U, O>(self, args: &FindManyArgs<W, U, O>) -> ApiResult<Self>
    where
        W: DatabaseFilter,
        U: DatabaseFilter,
        O: DatabaseOrderBy,
    {
        let mut query = self;
        if let Some(ref filter) = args.filter {
            query = query.filter(filter);
        }
        if let Some(ref order_by) = args.order_by {
            query = query.order_by(order_by);
        }
        if let Some(ref cursor) = args.cursor {
            query = query.cursor(cursor)?;
        }
        query.take(args.take)?.skip(args.skip)
    }

    /// Add a filter to the query.
    pub fn filter<F: DatabaseFilter>(mut self, filter: &F) -> Self {
        if !filter.is_empty() {
            let (conditions, values) = filter.to_sql_conditions();
            self.where_clauses.extend(conditions);
            self.values.extend(values);
        }
        self
    }

    /// Add a raw WHERE clause condition.
    pub fn where_clause(mut self, condition: impl Into<String>, values: Vec<SqlValue>) -> Self {
        self.where_clauses.push(condition.into());
        self.values.extend(values);
        self
    }

    /// Add sorting to the query. Entries apply in list order.
    pub fn order_by<O: DatabaseOrderBy>(mut self, orders: &[O]) -> Self {
        for order in orders {
            self.order.extend(order.order_columns());
        }
        self
    }

    /// Start the result set at the row identified by `cursor` (inclusive).
    pub fn cursor<U: DatabaseFilter>(mut self, cursor: &U) -> ApiResult<Self> {
        if cursor.is_empty() {
            return Err(ApiError::validation("cursor must identify a row"));
        }
        self.cursor = Some(cursor.to_sql_conditions());
        Ok(self)
    }

    /// Limit the number of rows returned.
    pub fn take(mut self, take: Option<i32>) -> ApiResult<Self> {
        if let Some(take) = take {
            if take < 0 {
                return Err(ApiError::validation("take must not be negative"));
            }
            self.limit = Some(i64::from(take));
        }
        Ok(self)
    }

    /// Skip the first rows of the result set.
    pub fn skip(mut self, skip: Option<i32>) -> ApiResult<Self> {
        if let Some(skip) = skip {
            if skip < 0 {
                return Err(ApiError::validation("skip must not be negative"));
            }
            self.offset = Some(i64::from(skip));
        }
        Ok(self)
    }

    /// Set limit directly.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requested ordering, falling back to the entity default, always ending
    /// with the primary key so pagination is deterministic.
    pub fn resolved_order(&self) -> Vec<(&'static str, SortOrder)> {
        let mut order = if self.order.is_empty() {
            vec![(E::DEFAULT_SORT, E::DEFAULT_SORT_DIR)]
        } else {
            self.order.clone()
        };
        if !order.iter().any(|(column, _)| *column == E::PRIMARY_KEY) {
            order.push((E::PRIMARY_KEY, SortOrder::Asc));
        }
        order
    }

    /// ORDER BY body, optionally qualifying columns with a table alias.
    pub fn order_sql(&self, alias: Option<&str>) -> String {
        self.resolved_order()
            .iter()
            .map(|(column, dir)| match alias {
                Some(alias) => format!("{}.{} {}", alias, column, dir.to_sql()),
                None => format!("{} {}", column, dir.to_sql()),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Rows at or after the cursor row in the resolved order.
    ///
    /// Lexicographic comparison over the order columns: a row qualifies when
    /// it equals the cursor on every leading column and sorts after it on the
    /// next one, or is the cursor row itself.
    fn cursor_condition(&self) -> Option<(String, Vec<SqlValue>)> {
        let (unique_conditions, unique_values) = self.cursor.as_ref()?;
        let locate = and_all(unique_conditions.clone());
        let cursor_value =
            |column: &str| format!("(SELECT {} FROM {} WHERE {})", column, E::TABLE_NAME, locate);

        let order = self.resolved_order();
        let mut branches = Vec::new();
        let mut values = Vec::new();

        for (i, (column, dir)) in order.iter().enumerate() {
            let mut parts = Vec::new();
            for (prefix, _) in &order[..i] {
                parts.push(format!("{} = {}", prefix, cursor_value(prefix)));
                values.extend(unique_values.iter().cloned());
            }
            parts.push(format!(
                "{} {} {}",
                column,
                dir.after_operator(),
                cursor_value(column)
            ));
            values.extend(unique_values.iter().cloned());
            branches.push(and_all(parts));
        }

        branches.push(format!(
            "{} = {}",
            E::PRIMARY_KEY,
            cursor_value(E::PRIMARY_KEY)
        ));
        values.extend(unique_values.iter().cloned());

        Some((or_any(branches), values))
    }

    /// WHERE clause (without the keyword) and its values.
    pub fn where_sql(&self) -> (String, Vec<SqlValue>) {
        let mut conditions = self.where_clauses.clone();
        let mut values = self.values.clone();
        if let Some((condition, cursor_values)) = self.cursor_condition() {
            conditions.push(condition);
            values.extend(cursor_values);
        }
        (and_all(conditions), values)
    }

    fn limit_sql(&self) -> String {
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) if offset > 0 => {
                format!(" LIMIT {} OFFSET {}", limit, offset)
            }
            (Some(limit), _) => format!(" LIMIT {}", limit),
            (None, Some(offset)) if offset > 0 => format!(" LIMIT -1 OFFSET {}", offset),
            _ => String::new(),
        }
    }

    /// Build the SELECT statement.
    pub fn build_sql(&self) -> (String, Vec<SqlValue>) {
        let (where_sql, values) = self.where_sql();
        let sql = format!(
            "{} WHERE {} ORDER BY {}{}",
            E::select_sql(),
            where_sql,
            self.order_sql(None),
            self.limit_sql()
        );
        (sql, values)
    }

    /// Build a DELETE statement for bulk delete by filter.
    pub fn build_delete_sql(&self) -> (String, Vec<SqlValue>) {
        let (where_sql, values) = self.where_sql();
        (
            format!("DELETE FROM {} WHERE {}", E::TABLE_NAME, where_sql),
            values,
        )
    }

    /// Build an UPDATE statement for bulk update by filter.
    pub fn build_update_sql(
        &self,
        assignments: Vec<String>,
        assignment_values: Vec<SqlValue>,
    ) -> (String, Vec<SqlValue>) {
        let (where_sql, where_values) = self.where_sql();
        let mut values = assignment_values;
        values.extend(where_values);
        (
            format!(
                "UPDATE {} SET {} WHERE {}",
                E::TABLE_NAME,
                assignments.join(", "),
                where_sql
            ),
            values,
        )
    }

    /// Execute the query and return all matching entities.
    pub async fn fetch_all(self, pool: &SqlitePool) -> ApiResult<Vec<E>> {
        let (sql, values) = self.build_sql();
        tracing::debug!(sql = %sql, entity = E::ENTITY_NAME, "Executing entity query");

        let rows = bind_all(&sql, &values).fetch_all(pool).await?;
        rows.iter()
            .map(|row| E::from_row(row).map_err(ApiError::from))
            .collect()
    }

    /// Execute the query and return the first entity.
    pub async fn fetch_first(self, pool: &SqlitePool) -> ApiResult<Option<E>> {
        let query = match self.limit {
            Some(0) => return Ok(None),
            _ => self.limit(1),
        };
        Ok(query.fetch_all(pool).await?.into_iter().next())
    }
}

impl<E: DatabaseEntity + FromSqlRow> Default for EntityQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute an INSERT/UPDATE/DELETE with bound values.
pub async fn execute_with_binds(
    sql: &str,
    values: &[SqlValue],
    pool: &SqlitePool,
) -> ApiResult<u64> {
    tracing::debug!(sql = %sql, "Executing statement");
    let result = bind_all(sql, values).execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqliteRow;

    struct Widget;

    impl DatabaseEntity for Widget {
        const ENTITY_NAME: &'static str = "Widget";
        const TABLE_NAME: &'static str = "widget";
        const PLURAL_NAME: &'static str = "Widgets";
        const PRIMARY_KEY: &'static str = "id";
        const DEFAULT_SORT: &'static str = "id";

        fn column_names() -> &'static [&'static str] {
            &["id", "name"]
        }

        fn primary_key_value(&self) -> i64 {
            0
        }
    }

    impl FromSqlRow for Widget {
        fn from_row(_row: &SqliteRow) -> Result<Self, sqlx::Error> {
            Ok(Widget)
        }
    }

    struct ById(i64);

    impl DatabaseFilter for ById {
        fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
            (vec!["id = ?".into()], vec![SqlValue::Int(self.0)])
        }

        fn is_empty(&self) -> bool {
            false
        }
    }

    struct ByNameDesc;

    impl DatabaseOrderBy for ByNameDesc {
        fn order_columns(&self) -> Vec<(&'static str, SortOrder)> {
            vec![("name", SortOrder::Desc)]
        }
    }

    #[test]
    fn default_order_is_primary_key() {
        let (sql, values) = EntityQuery::<Widget>::new().build_sql();
        assert_eq!(sql, "SELECT id, name FROM widget WHERE 1 = 1 ORDER BY id ASC");
        assert!(values.is_empty());
    }

    #[test]
    fn primary_key_breaks_ties() {
        let query = EntityQuery::<Widget>::new()
            .order_by(&[ByNameDesc])
            .take(Some(5))
            .unwrap()
            .skip(Some(10))
            .unwrap();
        let (sql, _) = query.build_sql();
        assert_eq!(
            sql,
            "SELECT id, name FROM widget WHERE 1 = 1 ORDER BY name DESC, id ASC LIMIT 5 OFFSET 10"
        );
    }

    #[test]
    fn negative_take_is_rejected() {
        let err = EntityQuery::<Widget>::new().take(Some(-1)).err();
        assert!(matches!(err, Some(ApiError::Validation(_))));
    }

    #[test]
    fn cursor_binds_locator_per_subselect() {
        let query = EntityQuery::<Widget>::new()
            .order_by(&[ByNameDesc])
            .cursor(&ById(7))
            .unwrap();
        let (sql, values) = query.build_sql();
        assert_eq!(
            sql,
            "SELECT id, name FROM widget WHERE (((name < (SELECT name FROM widget WHERE (id = ?))) \
             OR (name = (SELECT name FROM widget WHERE (id = ?)) AND id > (SELECT id FROM widget WHERE (id = ?))) \
             OR id = (SELECT id FROM widget WHERE (id = ?)))) ORDER BY name DESC, id ASC"
        );
        assert_eq!(values, vec![SqlValue::Int(7); 4]);
    }

    #[test]
    fn skip_without_take_uses_unbounded_limit() {
        let (sql, _) = EntityQuery::<Widget>::new()
            .skip(Some(3))
            .unwrap()
            .build_sql();
        assert!(sql.ends_with("ORDER BY id ASC LIMIT -1 OFFSET 3"));
    }
}
