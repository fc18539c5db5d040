//! Generic resource repository: find-many, find-one, insert-many, merge-update and delete
//! against one collection.
//!
//! The repository holds no mutable state. Every operation is one store round-trip except
//! `update`, which reads then writes with no guard in between (last writer wins).
//! Cancellation is by drop: when the caller's future is dropped (client gone, request
//! deadline hit) the in-flight store call is dropped with it.

use super::RecordValidator;
use crate::error::RepoError;
use crate::filter::{Filter, FilterBuilder};
use crate::id::RecordId;
use crate::resources::Resource;
use crate::store::{Collection, Document, DocumentStore, StoreError};
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Repository<T> {
    collection: Arc<dyn Collection>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            collection: self.collection.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Resource> Repository<T> {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Repository {
            collection,
            _marker: PhantomData,
        }
    }

    /// Open the named collection on `store` and wrap it.
    pub async fn open(store: &dyn DocumentStore, collection: &str) -> Result<Self, StoreError> {
        Ok(Self::new(store.collection(collection).await?))
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// All records matching `filter`, in the store's natural order.
    pub async fn list(&self, filter: &Filter) -> Result<Vec<T>, RepoError> {
        let docs = self
            .collection
            .find(filter)
            .await
            .map_err(|e| self.read_failed(e))?;
        docs.into_iter()
            .map(|(id, doc)| decode::<T>(id, doc))
            .collect()
    }

    /// `list` with the filter built from raw query pairs.
    pub async fn list_by_query(&self, params: &[(String, String)]) -> Result<Vec<T>, RepoError> {
        let filter = FilterBuilder::from_query(params, T::schema())?;
        self.list(&filter).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T, RepoError> {
        let record_id = RecordId::decode(id)?;
        let doc = self.find_document(record_id).await?;
        decode(record_id, doc)
    }

    /// Validate every record, then persist them one by one under fresh identifiers.
    ///
    /// Caller-supplied identifiers are discarded. A validation failure writes nothing; a store
    /// failure stops the batch and leaves the records already written in place.
    pub async fn insert_many(&self, records: Vec<T>) -> Result<Vec<RecordId>, RepoError> {
        let mut docs = Vec::with_capacity(records.len());
        for record in &records {
            let doc = record.to_document().map_err(|e| RepoError::DecodeFailed {
                resource: T::NAME,
                id: "(new)".into(),
                reason: e.to_string(),
            })?;
            RecordValidator::validate(&doc, T::schema())?;
            docs.push(doc);
        }

        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = RecordId::generate();
            if let Err(e) = self.collection.insert_one(id, doc).await {
                tracing::error!(collection = %self.collection_name(), inserted = ids.len(), error = %e, "unable to insert");
                return Err(RepoError::InsertFailed {
                    collection: self.collection_name().to_string(),
                    inserted: ids.len(),
                    source: e,
                });
            }
            tracing::debug!(collection = %self.collection_name(), %id, "inserted");
            ids.push(id);
        }
        Ok(ids)
    }

    /// Merge `patch` into the stored record and write the result back.
    ///
    /// Only schema fields are taken from the patch; `_id`, unknown keys and `null` values are
    /// ignored. The merged record is validated in full before the write.
    pub async fn update(&self, id: &str, patch: &Document) -> Result<T, RepoError> {
        let record_id = RecordId::decode(id)?;
        let mut merged = self.find_document(record_id).await?;
        for name in T::schema().field_names() {
            if let Some(v) = patch.get(name).filter(|v| !v.is_null()) {
                merged.insert(name.to_string(), v.clone());
            }
        }
        RecordValidator::validate(&merged, T::schema())?;
        let record = decode::<T>(record_id, merged.clone())?;

        let matched = self
            .collection
            .update_one(record_id, merged)
            .await
            .map_err(|e| {
                tracing::error!(collection = %self.collection_name(), %record_id, error = %e, "unable to update the {}", T::NAME);
                RepoError::UpdateFailed {
                    resource: T::NAME,
                    id: id.to_string(),
                    source: e,
                }
            })?;
        if matched == 0 {
            // Deleted between our read and write.
            return Err(RepoError::NotFound {
                resource: T::NAME,
                id: id.to_string(),
            });
        }
        Ok(record)
    }

    /// Delete by identifier. Returns the number of records removed; zero is not an error here.
    pub async fn delete(&self, id: &str) -> Result<u64, RepoError> {
        let record_id = RecordId::decode(id)?;
        self.collection.delete_one(record_id).await.map_err(|e| {
            tracing::error!(collection = %self.collection_name(), %record_id, error = %e, "unable to delete the {}", T::NAME);
            RepoError::DeleteFailed {
                resource: T::NAME,
                id: id.to_string(),
                source: e,
            }
        })
    }

    async fn find_document(&self, id: RecordId) -> Result<Document, RepoError> {
        self.collection
            .find_one(id)
            .await
            .map_err(|e| self.read_failed(e))?
            .ok_or_else(|| RepoError::NotFound {
                resource: T::NAME,
                id: id.to_string(),
            })
    }

    /// A stored body that is not a document is a decode failure; anything else is the query's.
    fn read_failed(&self, e: StoreError) -> RepoError {
        tracing::error!(collection = %self.collection_name(), error = %e, "unable to read {}s", T::NAME);
        match &e {
            StoreError::MalformedDocument { id, .. } => RepoError::DecodeFailed {
                resource: T::NAME,
                id: id.to_string(),
                reason: e.to_string(),
            },
            _ => RepoError::QueryFailed {
                collection: self.collection_name().to_string(),
                source: e,
            },
        }
    }
}

fn decode<T: Resource>(id: RecordId, doc: Document) -> Result<T, RepoError> {
    T::from_document(id, doc).map_err(|e| {
        tracing::error!(%id, error = %e, "unable to decode {}", T::NAME);
        RepoError::DecodeFailed {
            resource: T::NAME,
            id: id.to_string(),
            reason: e.to_string(),
        }
    })
}
