//! Relation resolution for macro-generated entity fields.
//!
//! Each call issues exactly one statement. The statement starts from a
//! `root` CTE holding the parent row, so an empty result means the parent
//! is gone and the resolver answers `NotFound` instead of an empty relation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool, ValueRef};

use super::builder::{EntityQuery, FindManyArgs};
use super::traits::{DatabaseEntity, DatabaseFilter, DatabaseOrderBy, FromSqlRow, SqlValue, bind_all};
use crate::error::{ApiError, ApiResult};

/// `rel.a AS a, rel.b AS b, ...`
fn aliased_columns<T: DatabaseEntity>() -> String {
    T::column_names()
        .iter()
        .map(|column| format!("rel.{} AS {}", column, column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decode a joined row, `None` when the LEFT JOIN found nothing.
fn decode_joined<T: DatabaseEntity + FromSqlRow>(row: &SqliteRow) -> ApiResult<Option<T>> {
    if row.try_get_raw(T::PRIMARY_KEY)?.is_null() {
        return Ok(None);
    }
    Ok(Some(T::from_row(row)?))
}

async fn fetch_rooted<P: DatabaseEntity>(
    pool: &SqlitePool,
    sql: &str,
    values: &[SqlValue],
) -> ApiResult<Vec<SqliteRow>> {
    tracing::debug!(sql = %sql, parent = P::ENTITY_NAME, "Resolving relation");
    let rows = bind_all(sql, values).fetch_all(pool).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found(P::ENTITY_NAME));
    }
    Ok(rows)
}

/// To-one relation through a foreign key stored on the parent.
pub async fn belongs_to<P, T>(pool: &SqlitePool, root_id: i64, fk_column: &str) -> ApiResult<Option<T>>
where
    P: DatabaseEntity,
    T: DatabaseEntity + FromSqlRow,
{
    let sql = format!(
        "WITH root AS (SELECT {fk} AS fk FROM {parent} WHERE {parent_pk} = ?) \
         SELECT root.fk AS __root_fk, {columns} FROM root \
         LEFT JOIN {target} AS rel ON rel.{target_pk} = root.fk",
        fk = fk_column,
        parent = P::TABLE_NAME,
        parent_pk = P::PRIMARY_KEY,
        columns = aliased_columns::<T>(),
        target = T::TABLE_NAME,
        target_pk = T::PRIMARY_KEY,
    );
    let rows = fetch_rooted::<P>(pool, &sql, &[SqlValue::Int(root_id)]).await?;
    decode_joined(&rows[0])
}

/// Required to-one relation. A dangling foreign key is a store inconsistency.
pub async fn belongs_to_required<P, T>(pool: &SqlitePool, root_id: i64, fk_column: &str) -> ApiResult<T>
where
    P: DatabaseEntity,
    T: DatabaseEntity + FromSqlRow,
{
    belongs_to::<P, T>(pool, root_id, fk_column)
        .await?
        .ok_or_else(|| {
            ApiError::Internal(format!(
                "{}.{} references a missing {}",
                P::ENTITY_NAME,
                fk_column,
                T::ENTITY_NAME
            ))
        })
}

/// To-many relation through a foreign key stored on the target.
pub async fn has_many<P, T, W, U, O>(
    pool: &SqlitePool,
    root_id: i64,
    fk_column: &str,
    args: &FindManyArgs<W, U, O>,
) -> ApiResult<Vec<T>>
where
    P: DatabaseEntity,
    T: DatabaseEntity + FromSqlRow,
    W: DatabaseFilter,
    U: DatabaseFilter,
    O: DatabaseOrderBy,
{
    let inner = EntityQuery::<T>::new()
        .where_clause(format!("{} = ?", fk_column), vec![SqlValue::Int(root_id)])
        .apply(args)?;
    let rows = rooted_children::<P, T>(pool, root_id, &inner).await?;
    rows.iter()
        .filter_map(|row| decode_joined::<T>(row).transpose())
        .collect()
}

/// To-one relation through a unique foreign key stored on the target.
pub async fn has_one<P, T>(pool: &SqlitePool, root_id: i64, fk_column: &str) -> ApiResult<Option<T>>
where
    P: DatabaseEntity,
    T: DatabaseEntity + FromSqlRow,
{
    let inner = EntityQuery::<T>::new()
        .where_clause(format!("{} = ?", fk_column), vec![SqlValue::Int(root_id)])
        .limit(1);
    let rows = rooted_children::<P, T>(pool, root_id, &inner).await?;
    decode_joined(&rows[0])
}

async fn rooted_children<P, T>(
    pool: &SqlitePool,
    root_id: i64,
    inner: &EntityQuery<T>,
) -> ApiResult<Vec<SqliteRow>>
where
    P: DatabaseEntity,
    T: DatabaseEntity + FromSqlRow,
{
    let (inner_sql, inner_values) = inner.build_sql();
    let sql = format!(
        "WITH root AS (SELECT {parent_pk} AS pk FROM {parent} WHERE {parent_pk} = ?) \
         SELECT root.pk AS __root_pk, {columns} FROM root \
         LEFT JOIN ({inner_sql}) AS rel ON 1 = 1 \
         ORDER BY {order}",
        parent_pk = P::PRIMARY_KEY,
        parent = P::TABLE_NAME,
        columns = aliased_columns::<T>(),
        inner_sql = inner_sql,
        order = inner.order_sql(Some("rel")),
    );
    let mut values = vec![SqlValue::Int(root_id)];
    values.extend(inner_values);
    fetch_rooted::<P>(pool, &sql, &values).await
}

/// Sizes of several to-many relations of one parent, in one statement.
///
/// `relations` holds `(target_table, fk_column)` pairs; counts come back in
/// the same order.
pub async fn relation_counts<P: DatabaseEntity>(
    pool: &SqlitePool,
    root_id: i64,
    relations: &[(&str, &str)],
) -> ApiResult<Vec<i64>> {
    let counts = relations
        .iter()
        .enumerate()
        .map(|(i, (table, fk))| {
            format!(
                "(SELECT COUNT(*) FROM {} WHERE {}.{} = __parent.{}) AS count_{}",
                table,
                table,
                fk,
                P::PRIMARY_KEY,
                i
            )
        })
        .collect::<Vec<_>>();
    let sql = format!(
        "SELECT {} FROM {} AS __parent WHERE __parent.{} = ?",
        if counts.is_empty() {
            "1".to_string()
        } else {
            counts.join(", ")
        },
        P::TABLE_NAME,
        P::PRIMARY_KEY
    );
    let rows = fetch_rooted::<P>(pool, &sql, &[SqlValue::Int(root_id)]).await?;
    (0..relations.len())
        .map(|i| {
            rows[0]
                .try_get::<i64, _>(format!("count_{}", i).as_str())
                .map_err(ApiError::from)
        })
        .collect()
}
