//! Shared application state: the store client and one repository per resource type.

use crate::config::{AppConfig, CollectionNames, StoreBackend};
use crate::resources::{Course, Discipline, Student, Teacher};
use crate::service::Repository;
use crate::store::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub students: Repository<Student>,
    pub teachers: Repository<Teacher>,
    pub courses: Repository<Course>,
    pub disciplines: Repository<Discipline>,
}

impl AppState {
    /// Open every resource collection on an already connected store.
    pub async fn open(store: Arc<dyn DocumentStore>, names: &CollectionNames) -> Result<Self, StoreError> {
        Ok(AppState {
            students: Repository::open(store.as_ref(), &names.students).await?,
            teachers: Repository::open(store.as_ref(), &names.teachers).await?,
            courses: Repository::open(store.as_ref(), &names.courses).await?,
            disciplines: Repository::open(store.as_ref(), &names.disciplines).await?,
            store,
        })
    }
}

/// Build the store client selected by `STORE_BACKEND`.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Postgres => Arc::new(
            PgDocumentStore::connect(config.database.clone(), config.max_connections, &config.db_schema)
                .await?,
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
