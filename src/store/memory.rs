use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::store::{Document, DocumentStore, Query, Write, WriteOp};
use crate::{Error, Result};

/// Document store held in process memory.
///
/// Collections keep insertion order, so equal sort keys come back in the
/// order documents were created. Every commit bumps a change counter that
/// live subscriptions wait on.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    version: watch::Sender<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            collections: RwLock::new(HashMap::new()),
            version,
        }
    }

    /// Seed a collection before the store is shared
    pub fn with_documents(self, collection: &str, docs: Vec<Document>) -> Self {
        let mut collections = self.collections.into_inner();
        collections.entry(collection.to_string()).or_default().extend(docs);
        Self {
            collections: RwLock::new(collections),
            version: self.version,
        }
    }

    fn timestamp_now() -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn check(collections: &HashMap<String, Vec<Document>>, write: &Write) -> Result<()> {
        let exists = collections
            .get(&write.collection)
            .map_or(false, |docs| docs.iter().any(|d| d.id == write.id));

        match (&write.op, exists) {
            (WriteOp::Create(_), true) => Err(Error::AlreadyExists {
                collection: write.collection.clone(),
                id: write.id.clone(),
            }),
            (WriteOp::Update(_), false) => Err(Error::NotFound {
                collection: write.collection.clone(),
                id: write.id.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn apply(collections: &mut HashMap<String, Vec<Document>>, write: Write) {
        let docs = collections.entry(write.collection).or_default();
        let stamp = Self::timestamp_now();

        match write.op {
            WriteOp::Create(mut fields) => {
                for field in write.server_timestamps {
                    fields.insert(field, stamp.clone());
                }
                docs.push(Document::new(write.id, fields));
            }
            WriteOp::Update(fields) => {
                if let Some(doc) = docs.iter_mut().find(|d| d.id == write.id) {
                    doc.fields.extend(fields);
                    for field in write.server_timestamps {
                        doc.fields.insert(field, stamp.clone());
                    }
                }
            }
            WriteOp::Delete => docs.retain(|d| d.id != write.id),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn run_query(&self, query: &Query) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(&query.collection)
            .map(|docs| docs.iter().filter(|d| query.matches(d)).cloned().collect())
            .unwrap_or_default();

        docs.sort_by(|a, b| query.compare(a, b));
        Ok(docs)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        let mut collections = self.collections.write().await;

        for write in &writes {
            Self::check(&collections, write)?;
        }

        let count = writes.len();
        for write in writes {
            Self::apply(&mut collections, write);
        }
        drop(collections);

        self.version.send_modify(|v| *v += 1);
        debug!("Committed {} writes to memory store", count);
        Ok(())
    }

    fn changes(&self) -> Option<watch::Receiver<u64>> {
        Some(self.version.subscribe())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Direction, Fields};
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let store = MemoryStore::new();

        store
            .commit(vec![Write::create("properties", "p1", fields(json!({"order": 1})))
                .with_server_timestamp("createdAt")])
            .await
            .unwrap();

        let doc = store.get("properties", "p1").await.unwrap().unwrap();
        assert!(doc.get_str("createdAt").is_some());

        store
            .commit(vec![Write::update("properties", "p1", fields(json!({"order": 4})))])
            .await
            .unwrap();
        let doc = store.get("properties", "p1").await.unwrap().unwrap();
        assert_eq!(doc.fields["order"], json!(4));

        store.commit(vec![Write::delete("properties", "p1")]).await.unwrap();
        assert!(store.get("properties", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_is_atomic() {
        let store = MemoryStore::new()
            .with_documents("properties", vec![Document::new("a", fields(json!({"order": 0})))]);

        let result = store
            .commit(vec![
                Write::update("properties", "a", fields(json!({"order": 7}))),
                Write::update("properties", "missing", fields(json!({"order": 8}))),
            ])
            .await;

        assert!(matches!(result, Err(Error::NotFound { .. })));
        let doc = store.get("properties", "a").await.unwrap().unwrap();
        assert_eq!(doc.fields["order"], json!(0));
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let store = MemoryStore::new();
        let write = Write::create("leads", "l1", Fields::new());

        store.commit(vec![write.clone()]).await.unwrap();
        assert!(matches!(
            store.commit(vec![write]).await,
            Err(Error::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let store = MemoryStore::new().with_documents(
            "properties",
            vec![
                Document::new("a", fields(json!({"isPublished": true, "statusCategory": "READY", "order": 2}))),
                Document::new("b", fields(json!({"isPublished": false, "statusCategory": "READY", "order": 1}))),
                Document::new("c", fields(json!({"isPublished": true, "statusCategory": "2026", "order": 5}))),
                Document::new("d", fields(json!({"isPublished": true, "statusCategory": "READY", "order": 0}))),
            ],
        );

        let query = Query::collection("properties")
            .where_eq("isPublished", true)
            .order_by("statusCategory", Direction::Ascending)
            .order_by("order", Direction::Ascending);
        let ids: Vec<String> = store
            .run_query(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();

        assert_eq!(ids, vec!["c", "d", "a"]);
    }
}
