//! Campus API: CRUD over students, teachers, courses and disciplines backed by a document store.

pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod id;
pub mod resources;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, CollectionNames, StoreBackend};
pub use error::{AppError, ConfigError, RepoError};
pub use filter::{Filter, FilterBuilder};
pub use id::{RecordId, ID_FIELD};
pub use resources::{Course, Discipline, Resource, Student, Teacher};
pub use routes::{app_router, common_routes, resource_routes};
pub use service::{RecordValidator, Repository};
pub use state::{connect_store, AppState};
pub use store::{Collection, Document, DocumentStore, MemoryStore, PgDocumentStore, StoreError};
