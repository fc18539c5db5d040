//! Process-local document store. Same semantics as the PostgreSQL backend: insertion order,
//! duplicate-id rejection, top-level field overwrite on update.

use super::{check_collection_name, Collection, Document, DocumentStore, StoreError};
use crate::filter::Filter;
use crate::id::RecordId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Arc<MemoryCollection>>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

pub struct MemoryCollection {
    name: String,
    docs: RwLock<Vec<(RecordId, Document)>>,
    closed: Arc<AtomicBool>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".into())
}

impl MemoryCollection {
    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("store closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<(RecordId, Document)>, StoreError> {
        self.check_open()?;
        let docs = self.docs.read().map_err(poisoned)?;
        Ok(docs
            .iter()
            .filter(|(id, doc)| filter.matches(id, doc))
            .cloned()
            .collect())
    }

    async fn insert_one(&self, id: RecordId, doc: Document) -> Result<(), StoreError> {
        self.check_open()?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        if docs.iter().any(|(existing, _)| *existing == id) {
            return Err(StoreError::DuplicateId(id));
        }
        docs.push((id, doc));
        Ok(())
    }

    async fn update_one(&self, id: RecordId, fields: Document) -> Result<u64, StoreError> {
        self.check_open()?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        match docs.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, doc)) => {
                for (k, v) in fields {
                    doc.insert(k, v);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: RecordId) -> Result<u64, StoreError> {
        self.check_open()?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        match docs.iter().position(|(existing, _)| *existing == id) {
            Some(i) => {
                docs.remove(i);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn collection(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError> {
        check_collection_name(name)?;
        let mut collections = self.collections.write().map_err(poisoned)?;
        let col: Arc<dyn Collection> = collections
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(MemoryCollection {
                    name: name.to_string(),
                    docs: RwLock::new(Vec::new()),
                    closed: self.closed.clone(),
                })
            })
            .clone();
        Ok(col)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("store closed".into()));
        }
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn same_name_yields_same_collection() {
        let store = MemoryStore::new();
        let a = store.collection("alunos").await.unwrap();
        let id = RecordId::generate();
        a.insert_one(id, doc(json!({"nome": "Ana"}))).await.unwrap();
        let b = store.collection("alunos").await.unwrap();
        assert!(b.find_one(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn find_keeps_insertion_order() {
        let store = MemoryStore::new();
        let col = store.collection("cursos").await.unwrap();
        let ids: Vec<_> = (0..5).map(|_| RecordId::generate()).collect();
        for (i, id) in ids.iter().enumerate() {
            col.insert_one(*id, doc(json!({ "n": i }))).await.unwrap();
        }
        let found: Vec<_> = col.find(&Filter::all()).await.unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(found, ids);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        let col = store.collection("cursos").await.unwrap();
        let id = RecordId::generate();
        col.insert_one(id, Document::new()).await.unwrap();
        let err = col.insert_one(id, Document::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(d) if d == id));
    }

    #[tokio::test]
    async fn update_overwrites_only_given_fields() {
        let store = MemoryStore::new();
        let col = store.collection("cursos").await.unwrap();
        let id = RecordId::generate();
        col.insert_one(id, doc(json!({"a": 1, "b": 2}))).await.unwrap();
        assert_eq!(col.update_one(id, doc(json!({"b": 3}))).await.unwrap(), 1);
        assert_eq!(col.find_one(id).await.unwrap(), Some(doc(json!({"a": 1, "b": 3}))));
        assert_eq!(col.update_one(RecordId::generate(), Document::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn closed_store_refuses_calls() {
        let store = MemoryStore::new();
        let col = store.collection("cursos").await.unwrap();
        store.close().await;
        assert!(store.ping().await.is_err());
        assert!(matches!(col.find(&Filter::all()).await, Err(StoreError::Unavailable(_))));
    }
}
