//! Generic CRUD execution behind the `*CrudQueries` / `*CrudMutations`
//! objects generated by `#[derive(GraphQLOperations)]`.

use sqlx::SqlitePool;

use super::builder::{EntityQuery, FindManyArgs, execute_with_binds};
use super::traits::{
    AffectedRowsOutput, AggregateOutput, DatabaseEntity, DatabaseFilter, DatabaseOrderBy,
    FromSqlRow, InsertValues, SqlValue, UpdateAssignments, bind_all,
};
use crate::error::{ApiError, ApiResult};

fn require_unique<U: DatabaseFilter>(entity: &str, filter: &U) -> ApiResult<()> {
    if filter.is_empty() {
        return Err(ApiError::validation(format!(
            "{}WhereUniqueInput needs at least one field",
            entity
        )));
    }
    Ok(())
}

fn returning<E: DatabaseEntity>() -> String {
    E::column_names().join(", ")
}

/// `INSERT INTO t (a, b) VALUES (?, ?)` and its values.
fn insert_sql<E: DatabaseEntity, C: InsertValues>(data: &C) -> (String, Vec<SqlValue>) {
    let (columns, values): (Vec<&str>, Vec<SqlValue>) = data.insert_values().into_iter().unzip();
    let sql = if columns.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", E::TABLE_NAME)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE_NAME,
            columns.join(", "),
            vec!["?"; columns.len()].join(", ")
        )
    };
    (sql, values)
}

pub async fn find_unique<E, U>(pool: &SqlitePool, filter: &U) -> ApiResult<Option<E>>
where
    E: DatabaseEntity + FromSqlRow,
    U: DatabaseFilter,
{
    require_unique(E::ENTITY_NAME, filter)?;
    EntityQuery::<E>::new().filter(filter).fetch_first(pool).await
}

pub async fn find_first<E, W, U, O>(
    pool: &SqlitePool,
    args: &FindManyArgs<W, U, O>,
) -> ApiResult<Option<E>>
where
    E: DatabaseEntity + FromSqlRow,
    W: DatabaseFilter,
    U: DatabaseFilter,
    O: DatabaseOrderBy,
{
    EntityQuery::<E>::new().apply(args)?.fetch_first(pool).await
}

pub async fn find_many<E, W, U, O>(pool: &SqlitePool, args: &FindManyArgs<W, U, O>) -> ApiResult<Vec<E>>
where
    E: DatabaseEntity + FromSqlRow,
    W: DatabaseFilter,
    U: DatabaseFilter,
    O: DatabaseOrderBy,
{
    EntityQuery::<E>::new().apply(args)?.fetch_all(pool).await
}

/// Aggregates over the rows selected by `args` (after cursor/take/skip).
pub async fn aggregate<E, A, W, U, O>(pool: &SqlitePool, args: &FindManyArgs<W, U, O>) -> ApiResult<A>
where
    E: DatabaseEntity + FromSqlRow,
    A: AggregateOutput,
    W: DatabaseFilter,
    U: DatabaseFilter,
    O: DatabaseOrderBy,
{
    let (inner, values) = EntityQuery::<E>::new().apply(args)?.build_sql();
    let sql = format!("SELECT {} FROM ({}) AS agg", A::select_exprs(), inner);
    tracing::debug!(sql = %sql, entity = E::ENTITY_NAME, "Executing aggregate query");

    let row = bind_all(&sql, &values).fetch_one(pool).await?;
    Ok(A::from_aggregate_row(&row)?)
}

pub async fn create_one<E, C>(pool: &SqlitePool, data: &C) -> ApiResult<E>
where
    E: DatabaseEntity + FromSqlRow,
    C: InsertValues,
{
    let (insert, values) = insert_sql::<E, C>(data);
    let sql = format!("{} RETURNING {}", insert, returning::<E>());
    tracing::debug!(sql = %sql, entity = E::ENTITY_NAME, "Creating record");

    let row = bind_all(&sql, &values).fetch_one(pool).await?;
    Ok(E::from_row(&row)?)
}

/// Insert every row in one transaction; any failure rolls back the batch.
pub async fn create_many<E, C>(pool: &SqlitePool, data: &[C]) -> ApiResult<AffectedRowsOutput>
where
    E: DatabaseEntity,
    C: InsertValues,
{
    let mut tx = pool.begin().await?;
    let mut count = 0;
    for item in data {
        let (sql, values) = insert_sql::<E, C>(item);
        count += bind_all(&sql, &values).execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;

    tracing::debug!(entity = E::ENTITY_NAME, count, "Created records");
    Ok(AffectedRowsOutput {
        count: count as i64,
    })
}

pub async fn update_one<E, D, U>(pool: &SqlitePool, data: &D, filter: &U) -> ApiResult<E>
where
    E: DatabaseEntity + FromSqlRow,
    D: UpdateAssignments,
    U: DatabaseFilter,
{
    require_unique(E::ENTITY_NAME, filter)?;
    let (assignments, assignment_values) = data.assignments()?;
    if assignments.is_empty() {
        return find_unique::<E, U>(pool, filter)
            .await?
            .ok_or_else(|| ApiError::not_found(E::ENTITY_NAME));
    }

    let (update, values) = EntityQuery::<E>::new()
        .filter(filter)
        .build_update_sql(assignments, assignment_values);
    let sql = format!("{} RETURNING {}", update, returning::<E>());
    tracing::debug!(sql = %sql, entity = E::ENTITY_NAME, "Updating record");

    match bind_all(&sql, &values).fetch_optional(pool).await? {
        Some(row) => Ok(E::from_row(&row)?),
        None => Err(ApiError::not_found(E::ENTITY_NAME)),
    }
}

pub async fn update_many<E, D, W>(pool: &SqlitePool, data: &D, filter: Option<&W>) -> ApiResult<AffectedRowsOutput>
where
    E: DatabaseEntity + FromSqlRow,
    D: UpdateAssignments,
    W: DatabaseFilter,
{
    let (assignments, assignment_values) = data.assignments()?;
    if assignments.is_empty() {
        return Ok(AffectedRowsOutput::default());
    }
    let mut query = EntityQuery::<E>::new();
    if let Some(filter) = filter {
        query = query.filter(filter);
    }
    let (sql, values) = query.build_update_sql(assignments, assignment_values);
    let count = execute_with_binds(&sql, &values, pool).await?;
    Ok(AffectedRowsOutput {
        count: count as i64,
    })
}

pub async fn delete_one<E, U>(pool: &SqlitePool, filter: &U) -> ApiResult<E>
where
    E: DatabaseEntity + FromSqlRow,
    U: DatabaseFilter,
{
    require_unique(E::ENTITY_NAME, filter)?;
    let (delete, values) = EntityQuery::<E>::new().filter(filter).build_delete_sql();
    let sql = format!("{} RETURNING {}", delete, returning::<E>());
    tracing::debug!(sql = %sql, entity = E::ENTITY_NAME, "Deleting record");

    match bind_all(&sql, &values).fetch_optional(pool).await? {
        Some(row) => Ok(E::from_row(&row)?),
        None => Err(ApiError::not_found(E::ENTITY_NAME)),
    }
}

pub async fn delete_many<E, W>(pool: &SqlitePool, filter: Option<&W>) -> ApiResult<AffectedRowsOutput>
where
    E: DatabaseEntity + FromSqlRow,
    W: DatabaseFilter,
{
    let mut query = EntityQuery::<E>::new();
    if let Some(filter) = filter {
        query = query.filter(filter);
    }
    let (sql, values) = query.build_delete_sql();
    let count = execute_with_binds(&sql, &values, pool).await?;
    Ok(AffectedRowsOutput {
        count: count as i64,
    })
}
