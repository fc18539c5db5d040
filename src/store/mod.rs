//! Document store seam: collections of JSON documents keyed by [`RecordId`].
//!
//! The identifier lives beside the document, never inside it. Each call is a single request
//! against the backend; consistency is whatever the backend gives per document.

mod memory;
mod postgres;

pub use memory::{MemoryCollection, MemoryStore};
pub use postgres::{ensure_database_exists, PgCollection, PgDocumentStore};

use crate::filter::Filter;
use crate::id::RecordId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Stored document body: a JSON object without the identifier field.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("duplicate identifier {0}")]
    DuplicateId(RecordId),
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("document {id} is not a JSON object (found {found})")]
    MalformedDocument { id: RecordId, found: &'static str },
}

/// Scoped handle to one collection.
#[async_trait]
pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    /// All documents matching `filter`, in the collection's natural (insertion) order.
    async fn find(&self, filter: &Filter) -> Result<Vec<(RecordId, Document)>, StoreError>;

    async fn find_one(&self, id: RecordId) -> Result<Option<Document>, StoreError> {
        let mut found = self.find(&Filter::by_id(id)).await?;
        Ok(found.pop().map(|(_, doc)| doc))
    }

    async fn insert_one(&self, id: RecordId, doc: Document) -> Result<(), StoreError>;

    /// Overwrite the given top-level fields of one document. Returns the matched count (0 or 1).
    async fn update_one(&self, id: RecordId, fields: Document) -> Result<u64, StoreError>;

    /// Returns the deleted count (0 or 1).
    async fn delete_one(&self, id: RecordId) -> Result<u64, StoreError>;
}

/// Store client. Opened once at startup, shared, and closed at shutdown.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Handle to the named collection, creating its backing storage if needed.
    async fn collection(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

/// Collection names become table names; keep them to plain identifiers.
pub fn check_collection_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_plain_identifiers() {
        assert!(check_collection_name("alunos").is_ok());
        assert!(check_collection_name("_disciplinas_2").is_ok());
        assert!(check_collection_name("").is_err());
        assert!(check_collection_name("2cursos").is_err());
        assert!(check_collection_name("alunos; DROP TABLE x").is_err());
    }
}
