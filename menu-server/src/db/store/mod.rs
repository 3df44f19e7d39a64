//! Document Store
//!
//! Every collection holds JSON documents keyed by an opaque string `id`.
//! Repositories talk to an `Arc<dyn DocumentStore>` so the SQLite backend
//! and the in-memory backend are interchangeable.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::Value;

use super::RepoResult;

/// Persistent collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Restaurants,
    Categories,
    MenuItems,
    Orders,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Restaurants,
        Collection::Categories,
        Collection::MenuItems,
        Collection::Orders,
        Collection::Users,
    ];

    pub const fn table(&self) -> &'static str {
        match self {
            Collection::Restaurants => "restaurants",
            Collection::Categories => "categories",
            Collection::MenuItems => "menuitems",
            Collection::Orders => "orders",
            Collection::Users => "users",
        }
    }

    /// Top-level fields with a unique index
    pub const fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Restaurants => &["slug"],
            Collection::Orders => &["orderNumber"],
            Collection::Users => &["email"],
            Collection::Categories | Collection::MenuItems => &[],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Field predicate. Field names are camelCase document paths, dotted for
/// nested fields (`settings.isActive`).
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value`; `Value::Null` also matches a missing field
    Eq(String, Value),
    /// `field` is one of the values; an empty list matches nothing
    In(String, Vec<Value>),
    /// `field >= value`
    Gte(String, Value),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gte(field.into(), value.into())
    }

    pub fn field(&self) -> &str {
        match self {
            Filter::Eq(f, _) | Filter::In(f, _) | Filter::Gte(f, _) => f,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Find query. Results always fall back to insertion order for ties.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub sort: Vec<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort.push((field.into(), SortOrder::Asc));
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort.push((field.into(), SortOrder::Desc));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// JSON document store
///
/// Patches follow JSON merge-patch semantics (RFC 7396) and never change
/// the document `id`. Writes that violate a unique field fail with
/// [`RepoError::Duplicate`](super::RepoError::Duplicate).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, assigning an `id` when it has none
    async fn insert(&self, collection: Collection, doc: Value) -> RepoResult<Value>;

    async fn find(&self, collection: Collection, query: &Query) -> RepoResult<Vec<Value>>;

    async fn find_by_id(&self, collection: Collection, id: &str) -> RepoResult<Option<Value>>;

    /// Merge `patch` into the document if it exists and every guard matches.
    ///
    /// Returns the updated document, or `None` when nothing matched. The
    /// check and the write happen atomically.
    async fn update_where(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Value,
    ) -> RepoResult<Option<Value>>;

    /// Merge `patch` into every matching document, returning the count
    async fn update_many(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Value,
    ) -> RepoResult<u64>;

    async fn delete_by_id(&self, collection: Collection, id: &str) -> RepoResult<bool>;

    async fn count(&self, collection: Collection, filters: &[Filter]) -> RepoResult<u64>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> RepoResult<()>;

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> RepoResult<Option<Value>> {
        self.update_where(collection, id, &[], patch).await
    }
}

/// Validate a patch and drop any `id` it carries
pub(crate) fn sanitize_patch(mut patch: Value) -> RepoResult<Value> {
    match patch.as_object_mut() {
        Some(obj) => {
            obj.remove("id");
            Ok(patch)
        }
        None => Err(super::RepoError::Validation(
            "patch must be a JSON object".into(),
        )),
    }
}

/// Check a field path: letters, digits, `_` and `.` separators only
pub(crate) fn validate_field(field: &str) -> RepoResult<()> {
    let valid = !field.is_empty()
        && !field.starts_with('.')
        && !field.ends_with('.')
        && !field.contains("..")
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(super::RepoError::Validation(format!(
            "invalid field path: {field:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_validation() {
        assert!(validate_field("restaurantId").is_ok());
        assert!(validate_field("settings.isActive").is_ok());
        assert!(validate_field("").is_err());
        assert!(validate_field("a..b").is_err());
        assert!(validate_field("x') OR 1=1 --").is_err());
    }

    #[test]
    fn test_sanitize_patch_strips_id() {
        let patch = sanitize_patch(json!({"id": "x", "name": "n"})).unwrap();
        assert_eq!(patch, json!({"name": "n"}));
        assert!(sanitize_patch(json!([1, 2])).is_err());
    }

    #[test]
    fn test_query_builder() {
        let q = Query::new()
            .filter(Filter::eq("restaurantId", "r1"))
            .sort_desc("createdAt")
            .limit(10);
        assert_eq!(q.filters.len(), 1);
        assert_eq!(q.sort, vec![("createdAt".to_string(), SortOrder::Desc)]);
        assert_eq!(q.limit, Some(10));
    }
}
