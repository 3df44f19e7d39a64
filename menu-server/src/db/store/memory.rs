//! In-memory document store
//!
//! Mirrors [`SqliteStore`](super::SqliteStore) semantics: insertion order
//! breaks sort ties, `null` sorts before numbers and numbers before strings,
//! and unique fields are enforced on every write.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{Collection, DocumentStore, Filter, Query, SortOrder, sanitize_patch, validate_field};
use crate::db::{RepoError, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve a dotted field path; missing fields read as `None`
fn lookup<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(doc, |current, key| current.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

/// Comparison rank: null < numbers (booleans as 0/1) < strings < others
fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) | Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) | Value::Object(_) => 3,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match rank(a).cmp(&rank(b)) {
        Ordering::Equal => {}
        other => return other,
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

fn matches(doc: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, Value::Null) => lookup(doc, field).is_none(),
        Filter::Eq(field, expected) => {
            lookup(doc, field).is_some_and(|v| compare(v, expected) == Ordering::Equal)
        }
        Filter::In(field, values) => lookup(doc, field)
            .is_some_and(|v| values.iter().any(|e| compare(v, e) == Ordering::Equal)),
        Filter::Gte(field, bound) => {
            lookup(doc, field).is_some_and(|v| compare(v, bound) != Ordering::Less)
        }
    }
}

fn check_filters(filters: &[Filter]) -> RepoResult<()> {
    for filter in filters {
        validate_field(filter.field())?;
        let values: &[Value] = match filter {
            Filter::Eq(_, Value::Null) => &[],
            Filter::Eq(_, v) | Filter::Gte(_, v) => std::slice::from_ref(v),
            Filter::In(_, vs) => vs,
        };
        if let Some(bad) = values
            .iter()
            .find(|v| matches!(v, Value::Null | Value::Array(_) | Value::Object(_)))
        {
            return Err(RepoError::Validation(format!(
                "unsupported filter value: {bad}"
            )));
        }
    }
    Ok(())
}

fn matches_all(doc: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches(doc, f))
}

/// JSON merge patch (RFC 7396)
fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_obj) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_obj) = target {
        for (key, value) in patch_obj {
            if value.is_null() {
                target_obj.remove(key);
            } else {
                merge_patch(
                    target_obj.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Fail if `candidate` would collide with another document on a unique field
fn check_unique(
    collection: Collection,
    docs: &[Value],
    candidate: &Value,
    skip_index: Option<usize>,
) -> RepoResult<()> {
    for field in collection.unique_fields() {
        let Some(value) = lookup(candidate, field) else {
            continue;
        };
        let clash = docs.iter().enumerate().any(|(i, other)| {
            Some(i) != skip_index
                && lookup(other, field).is_some_and(|v| compare(v, value) == Ordering::Equal)
        });
        if clash {
            return Err(RepoError::Duplicate((*field).to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, mut doc: Value) -> RepoResult<Value> {
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| RepoError::Validation("document must be a JSON object".into()))?;
        if !obj
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty())
        {
            obj.insert("id".into(), Value::String(shared::util::new_id()));
        }

        let mut guard = self.collections.write();
        let docs = guard.entry(collection).or_default();
        if docs.iter().any(|d| doc_id(d) == doc_id(&doc)) {
            return Err(RepoError::Duplicate("id".into()));
        }
        check_unique(collection, docs, &doc, None)?;
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find(&self, collection: Collection, query: &Query) -> RepoResult<Vec<Value>> {
        check_filters(&query.filters)?;
        for (field, _) in &query.sort {
            validate_field(field)?;
        }

        let guard = self.collections.read();
        let mut results: Vec<Value> = guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| matches_all(d, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(guard);

        // stable sort keeps insertion order for ties
        results.sort_by(|a, b| {
            for (field, order) in &query.sort {
                let av = lookup(a, field).unwrap_or(&Value::Null);
                let bv = lookup(b, field).unwrap_or(&Value::Null);
                let ord = match order {
                    SortOrder::Asc => compare(av, bv),
                    SortOrder::Desc => compare(bv, av),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> RepoResult<Option<Value>> {
        let guard = self.collections.read();
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| doc_id(d) == Some(id)).cloned()))
    }

    async fn update_where(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Value,
    ) -> RepoResult<Option<Value>> {
        let patch = sanitize_patch(patch)?;
        check_filters(guards)?;

        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(None);
        };
        let Some(index) = docs
            .iter()
            .position(|d| doc_id(d) == Some(id) && matches_all(d, guards))
        else {
            return Ok(None);
        };

        let mut updated = docs[index].clone();
        merge_patch(&mut updated, &patch);
        check_unique(collection, docs, &updated, Some(index))?;
        docs[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn update_many(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Value,
    ) -> RepoResult<u64> {
        let patch = sanitize_patch(patch)?;
        check_filters(filters)?;

        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(0);
        };

        let mut next = docs.clone();
        let mut count = 0;
        for doc in next.iter_mut().filter(|d| matches_all(d, filters)) {
            merge_patch(doc, &patch);
            count += 1;
        }
        for (i, doc) in next.iter().enumerate() {
            check_unique(collection, &next, doc, Some(i))?;
        }
        *docs = next;
        Ok(count)
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> RepoResult<bool> {
        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| doc_id(d) != Some(id));
        Ok(docs.len() != before)
    }

    async fn count(&self, collection: Collection, filters: &[Filter]) -> RepoResult<u64> {
        check_filters(filters)?;
        let guard = self.collections.read();
        Ok(guard
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches_all(d, filters)).count() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_patch() {
        let mut doc = json!({"a": 1, "nested": {"x": 1, "y": 2}, "drop": true});
        merge_patch(&mut doc, &json!({"a": 2, "nested": {"y": 3}, "drop": null}));
        assert_eq!(doc, json!({"a": 2, "nested": {"x": 1, "y": 3}}));
    }

    #[test]
    fn test_compare_ranks() {
        assert_eq!(compare(&json!(null), &json!(0)), Ordering::Less);
        assert_eq!(compare(&json!(10), &json!("a")), Ordering::Less);
        assert_eq!(compare(&json!(1), &json!(1.0)), Ordering::Equal);
        assert_eq!(compare(&json!(true), &json!(1)), Ordering::Equal);
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_enforces_unique() {
        let store = MemoryStore::new();
        let doc = store
            .insert(Collection::Restaurants, json!({"slug": "asala"}))
            .await
            .unwrap();
        assert_eq!(doc["id"].as_str().map(str::len), Some(32));

        let err = store
            .insert(Collection::Restaurants, json!({"slug": "asala"}))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(f) if f == "slug"));
    }

    #[tokio::test]
    async fn test_find_filters_sort_limit() {
        let store = MemoryStore::new();
        for (id, r, created, status) in [
            ("o1", "r1", 10, "pending"),
            ("o2", "r1", 30, "ready"),
            ("o3", "r2", 20, "pending"),
            ("o4", "r1", 30, "pending"),
        ] {
            store
                .insert(
                    Collection::Orders,
                    json!({"id": id, "restaurantId": r, "createdAt": created, "status": status}),
                )
                .await
                .unwrap();
        }

        let q = Query::new()
            .filter(Filter::eq("restaurantId", "r1"))
            .sort_desc("createdAt");
        let ids: Vec<_> = store
            .find(Collection::Orders, &q)
            .await
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["o2", "o4", "o1"]);

        let q = Query::new()
            .filter(Filter::is_in("status", ["pending"]))
            .filter(Filter::gte("createdAt", 20))
            .limit(1);
        let found = store.find(Collection::Orders, &q).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], "o3");

        let none = Query::new().filter(Filter::In("status".into(), vec![]));
        assert!(store.find(Collection::Orders, &none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_where_guard() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Orders, json!({"id": "o1", "status": "pending"}))
            .await
            .unwrap();

        let missed = store
            .update_where(
                Collection::Orders,
                "o1",
                &[Filter::eq("status", "ready")],
                json!({"status": "delivered"}),
            )
            .await
            .unwrap();
        assert!(missed.is_none());

        let updated = store
            .update_where(
                Collection::Orders,
                "o1",
                &[Filter::eq("status", "pending")],
                json!({"status": "confirmed", "id": "hijack"}),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, json!({"id": "o1", "status": "confirmed"}));
    }

    #[tokio::test]
    async fn test_update_many_and_count() {
        let store = MemoryStore::new();
        for id in ["u1", "u2", "u3"] {
            let role = if id == "u3" { "restaurant_staff" } else { "restaurant_admin" };
            store
                .insert(
                    Collection::Users,
                    json!({"id": id, "email": format!("{id}@x.test"), "role": role, "isActive": false}),
                )
                .await
                .unwrap();
        }
        let n = store
            .update_many(
                Collection::Users,
                &[Filter::eq("role", "restaurant_admin")],
                json!({"isActive": true}),
            )
            .await
            .unwrap();
        assert_eq!(n, 2);
        let active = store
            .count(Collection::Users, &[Filter::eq("isActive", true)])
            .await
            .unwrap();
        assert_eq!(active, 2);
        assert!(store.delete_by_id(Collection::Users, "u3").await.unwrap());
        assert!(!store.delete_by_id(Collection::Users, "u3").await.unwrap());
    }
}
