//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DocumentStore` port. It backs the
//! service when no `DATABASE_URL` is configured and is the store used by the
//! test suites.

use async_trait::async_trait;
use futureme_core::identity::{self, DocumentId};
use futureme_core::ports::{Collection, DocumentStore, StoreResult};
use futureme_core::{Document, Fields, Filter, FindOptions, SortOrder};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Documents kept per collection in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, record: &Fields) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(Document::new(id, record.clone()));
        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &options.sort {
            // Stable sort keeps insertion order among equal keys; reversing for
            // descending order therefore puts the latest insert first on ties.
            docs.sort_by(|a, b| match (a.get(&sort.field), b.get(&sort.field)) {
                (Some(x), Some(y)) => x.sort_cmp(y),
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
            if sort.order == SortOrder::Descending {
                docs.reverse();
            }
        }
        if let Some(limit) = options.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(&doc.fields)))
            .cloned())
    }

    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        mut fields: Fields,
    ) -> StoreResult<Option<Document>> {
        identity::stamp_modified(&mut fields, identity::now());

        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return Ok(None);
        };
        doc.fields.extend(fields);
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() < before)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(collection, _)| collection.name().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futureme_core::{Sort, Value};

    fn fields(owner: &str, title: &str, rank: i64) -> Fields {
        let mut fields = Fields::new();
        fields.insert("user_id".into(), owner.into());
        fields.insert("title".into(), title.into());
        fields.insert("rank".into(), Value::Int(rank));
        identity::stamp_created(&mut fields, identity::now());
        fields
    }

    #[tokio::test]
    async fn inserted_documents_are_found_by_identity_and_filter() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Goal, &fields("u1", "a", 1))
            .await
            .unwrap();
        store
            .insert(Collection::Goal, &fields("u2", "b", 2))
            .await
            .unwrap();

        let found = store
            .find(
                Collection::Goal,
                &Filter::all().eq("user_id", "u1"),
                FindOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);

        let none = store
            .find_one(Collection::Vision, &Filter::all())
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn find_sorts_and_limits() {
        let store = MemoryStore::new();
        for (title, rank) in [("b", 2), ("c", 3), ("a", 1)] {
            store
                .insert(Collection::Goal, &fields("u1", title, rank))
                .await
                .unwrap();
        }

        let top = store
            .find(
                Collection::Goal,
                &Filter::all(),
                FindOptions::sorted(Sort::descending("rank")).limit(2),
            )
            .await
            .unwrap();
        let titles: Vec<_> = top.iter().map(|d| d.get("title").unwrap().clone()).collect();
        assert_eq!(titles, vec![Value::from("c"), Value::from("b")]);
    }

    #[tokio::test]
    async fn descending_ties_put_latest_insert_first() {
        let store = MemoryStore::new();
        let first = store
            .insert(Collection::Goal, &fields("u1", "first", 1))
            .await
            .unwrap();
        let second = store
            .insert(Collection::Goal, &fields("u1", "second", 1))
            .await
            .unwrap();

        let docs = store
            .find(
                Collection::Goal,
                &Filter::all(),
                FindOptions::sorted(Sort::descending("rank")),
            )
            .await
            .unwrap();
        assert_eq!(docs[0].id, second);
        assert_eq!(docs[1].id, first);
    }

    #[tokio::test]
    async fn update_merges_and_protects_created_at() {
        let store = MemoryStore::new();
        let original = fields("u1", "a", 1);
        let id = store.insert(Collection::Goal, &original).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        let mut patch = Fields::new();
        patch.insert("rank".into(), Value::Int(9));
        patch.insert("created_at".into(), Value::Timestamp(identity::now()));
        let updated = store
            .update(Collection::Goal, id, patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.get("rank"), Some(&Value::Int(9)));
        assert_eq!(updated.get("title"), original.get("title"));
        assert_eq!(updated.get("created_at"), original.get("created_at"));
        let stamp = |f: Option<&Value>| f.and_then(Value::as_timestamp).unwrap();
        assert!(stamp(updated.get("updated_at")) > stamp(original.get("updated_at")));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_documents() {
        let store = MemoryStore::new();
        let ghost = DocumentId::generate();
        assert!(store
            .update(Collection::Goal, ghost, Fields::new())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(Collection::Goal, ghost).await.unwrap());

        let id = store
            .insert(Collection::Goal, &fields("u1", "a", 1))
            .await
            .unwrap();
        assert!(store.delete(Collection::Goal, id).await.unwrap());
        assert!(!store.delete(Collection::Goal, id).await.unwrap());
    }

    #[tokio::test]
    async fn collection_names_lists_non_empty_collections() {
        let store = MemoryStore::new();
        assert!(store.collection_names().await.unwrap().is_empty());
        store
            .insert(Collection::Vision, &fields("u1", "v", 0))
            .await
            .unwrap();
        store
            .insert(Collection::User, &fields("u1", "x", 0))
            .await
            .unwrap();
        assert_eq!(
            store.collection_names().await.unwrap(),
            vec!["user".to_string(), "vision".to_string()]
        );
    }
}
