//! SQLite document store
//!
//! One table per collection, `(id TEXT PRIMARY KEY, body TEXT)`, with
//! predicates evaluated through `json_extract`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;

use super::{Collection, DocumentStore, Filter, Query, SortOrder, sanitize_patch, validate_field};
use crate::db::{RepoError, RepoResult};

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// SQLite-backed [`DocumentStore`]
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database with WAL mode and apply migrations
    ///
    /// Accepts `sqlite://path/to/file.db`, `sqlite:path` or `sqlite::memory:`.
    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        if let Some(parent) = file_path(database_url).and_then(|p| p.parent())
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepoError::Database(format!("Failed to create database directory: {e}"))
            })?;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RepoError::Database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .optimize_on_close(true, None);

        // :memory: databases are per-connection
        let max_connections = if file_path(database_url).is_some() { 5 } else { 1 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

fn file_path(database_url: &str) -> Option<&std::path::Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let rest = rest.split('?').next().unwrap_or_default();
    if rest.is_empty() || rest == ":memory:" {
        None
    } else {
        Some(std::path::Path::new(rest))
    }
}

/// `json_extract(body, '$.field')`
fn push_field(qb: &mut QueryBuilder<'_, Sqlite>, field: &str) -> RepoResult<()> {
    validate_field(field)?;
    qb.push("json_extract(body, '$.");
    qb.push(field);
    qb.push("')");
    Ok(())
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) -> RepoResult<()> {
    match value {
        Value::String(s) => {
            qb.push_bind(s.clone());
        }
        Value::Bool(b) => {
            qb.push_bind(i64::from(*b));
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                qb.push_bind(i);
            } else {
                qb.push_bind(n.as_f64().unwrap_or_default());
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(RepoError::Validation(format!(
                "unsupported filter value: {value}"
            )));
        }
    }
    Ok(())
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &[Filter]) -> RepoResult<()> {
    for filter in filters {
        qb.push(" AND ");
        match filter {
            Filter::Eq(field, Value::Null) => {
                push_field(qb, field)?;
                qb.push(" IS NULL");
            }
            Filter::Eq(field, value) => {
                push_field(qb, field)?;
                qb.push(" = ");
                push_value(qb, value)?;
            }
            Filter::In(field, values) if values.is_empty() => {
                validate_field(field)?;
                qb.push("0");
            }
            Filter::In(field, values) => {
                push_field(qb, field)?;
                qb.push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    push_value(qb, value)?;
                }
                qb.push(")");
            }
            Filter::Gte(field, value) => {
                push_field(qb, field)?;
                qb.push(" >= ");
                push_value(qb, value)?;
            }
        }
    }
    Ok(())
}

fn parse_body(body: &str) -> RepoResult<Value> {
    serde_json::from_str(body).map_err(|e| RepoError::Database(format!("corrupt document: {e}")))
}

/// Map unique-index violations to [`RepoError::Duplicate`]
fn map_write_error(err: sqlx::Error, collection: Collection) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        let field = collection.unique_fields().first().copied().unwrap_or("id");
        return RepoError::Duplicate(field.to_string());
    }
    RepoError::from(err)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: Collection, mut doc: Value) -> RepoResult<Value> {
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| RepoError::Validation("document must be a JSON object".into()))?;
        let id = match obj.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = shared::util::new_id();
                obj.insert("id".into(), Value::String(id.clone()));
                id
            }
        };

        let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
        qb.push(collection.table());
        qb.push(" (id, body) VALUES (");
        qb.push_bind(id);
        qb.push(", json(");
        qb.push_bind(doc.to_string());
        qb.push("))");

        qb.build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, collection))?;
        Ok(doc)
    }

    async fn find(&self, collection: Collection, query: &Query) -> RepoResult<Vec<Value>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT body FROM ");
        qb.push(collection.table());
        qb.push(" WHERE 1 = 1");
        push_filters(&mut qb, &query.filters)?;

        qb.push(" ORDER BY ");
        for (field, order) in &query.sort {
            push_field(&mut qb, field)?;
            qb.push(match order {
                SortOrder::Asc => " ASC, ",
                SortOrder::Desc => " DESC, ",
            });
        }
        qb.push("rowid ASC");

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let bodies: Vec<String> = qb
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;
        bodies.iter().map(|b| parse_body(b)).collect()
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> RepoResult<Option<Value>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT body FROM ");
        qb.push(collection.table());
        qb.push(" WHERE id = ");
        qb.push_bind(id.to_string());

        let body: Option<String> = qb
            .build_query_scalar::<String>()
            .fetch_optional(&self.pool)
            .await?;
        body.as_deref().map(parse_body).transpose()
    }

    async fn update_where(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Value,
    ) -> RepoResult<Option<Value>> {
        let patch = sanitize_patch(patch)?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
        qb.push(collection.table());
        qb.push(" SET body = json_patch(body, json(");
        qb.push_bind(patch.to_string());
        qb.push(")) WHERE id = ");
        qb.push_bind(id.to_string());
        push_filters(&mut qb, guards)?;
        qb.push(" RETURNING body");

        let body: Option<String> = qb
            .build_query_scalar::<String>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, collection))?;
        body.as_deref().map(parse_body).transpose()
    }

    async fn update_many(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Value,
    ) -> RepoResult<u64> {
        let patch = sanitize_patch(patch)?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
        qb.push(collection.table());
        qb.push(" SET body = json_patch(body, json(");
        qb.push_bind(patch.to_string());
        qb.push(")) WHERE 1 = 1");
        push_filters(&mut qb, filters)?;

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, collection))?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> RepoResult<bool> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM ");
        qb.push(collection.table());
        qb.push(" WHERE id = ");
        qb.push_bind(id.to_string());

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: Collection, filters: &[Filter]) -> RepoResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        qb.push(collection.table());
        qb.push(" WHERE 1 = 1");
        push_filters(&mut qb, filters)?;

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path() {
        assert_eq!(
            file_path("sqlite://data/menu.db"),
            Some(std::path::Path::new("data/menu.db"))
        );
        assert_eq!(
            file_path("sqlite:menu.db?mode=rwc"),
            Some(std::path::Path::new("menu.db"))
        );
        assert_eq!(file_path("sqlite::memory:"), None);
        assert_eq!(file_path("postgres://x"), None);
    }

    #[test]
    fn test_filter_sql() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT body FROM orders WHERE 1 = 1");
        push_filters(
            &mut qb,
            &[
                Filter::eq("restaurantId", "r1"),
                Filter::eq("notes", Value::Null),
                Filter::is_in("status", ["pending", "ready"]),
                Filter::In("id".into(), vec![]),
            ],
        )
        .unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT body FROM orders WHERE 1 = 1 \
             AND json_extract(body, '$.restaurantId') = ? \
             AND json_extract(body, '$.notes') IS NULL \
             AND json_extract(body, '$.status') IN (?, ?) \
             AND 0"
        );
    }

    #[test]
    fn test_rejects_unsafe_field() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT 1");
        assert!(push_filters(&mut qb, &[Filter::eq("a'); DROP TABLE x; --", 1)]).is_err());
    }
}
