//! PostgreSQL document store: one JSONB table per collection inside the schema from `DB_SCHEMA`.

use super::{check_collection_name, Collection, Document, DocumentStore, StoreError};
use crate::filter::Filter;
use crate::id::RecordId;
use crate::sql::{
    create_collection_table, create_schema, delete_by_id, insert_document, qualified_table,
    select_matching, update_fields, QueryBuf,
};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    /// Create the database if missing, open the pool and make sure the schema exists.
    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
        schema: &str,
    ) -> Result<Self, StoreError> {
        ensure_database_exists(&options).await?;
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::from_pool(pool, schema).await
    }

    pub async fn from_pool(pool: PgPool, schema: &str) -> Result<Self, StoreError> {
        check_collection_name(schema)?;
        sqlx::query(&create_schema(schema)).execute(&pool).await?;
        Ok(PgDocumentStore {
            pool,
            schema: schema.to_string(),
        })
    }
}

pub struct PgCollection {
    pool: PgPool,
    name: String,
    table: String,
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    q: &QueryBuf,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

/// Rows written by this crate always hold objects; anything else was written around it.
fn document_from_row(id: Uuid, doc: Value) -> Result<(RecordId, Document), StoreError> {
    let id = RecordId::from(id);
    match doc {
        Value::Object(m) => Ok((id, m)),
        other => Err(StoreError::MalformedDocument {
            id,
            found: match other {
                Value::Null => "null",
                Value::Bool(_) => "boolean",
                Value::Number(_) => "number",
                Value::String(_) => "string",
                Value::Array(_) => "array",
                Value::Object(_) => "object",
            },
        }),
    }
}

impl PgCollection {
    async fn execute(&self, q: QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let res = bind_all(sqlx::query(&q.sql), &q).execute(&self.pool).await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl Collection for PgCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<(RecordId, Document)>, StoreError> {
        let q = select_matching(&self.table, filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, (Uuid, Value)>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|(id, doc)| document_from_row(id, doc))
            .collect()
    }

    async fn insert_one(&self, id: RecordId, doc: Document) -> Result<(), StoreError> {
        match self.execute(insert_document(&self.table, id, doc)).await {
            Err(StoreError::Db(sqlx::Error::Database(e))) if e.is_unique_violation() => {
                Err(StoreError::DuplicateId(id))
            }
            other => other.map(|_| ()),
        }
    }

    async fn update_one(&self, id: RecordId, fields: Document) -> Result<u64, StoreError> {
        self.execute(update_fields(&self.table, id, fields)).await
    }

    async fn delete_one(&self, id: RecordId) -> Result<u64, StoreError> {
        self.execute(delete_by_id(&self.table, id)).await
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn collection(&self, name: &str) -> Result<Arc<dyn Collection>, StoreError> {
        check_collection_name(name)?;
        let table = qualified_table(&self.schema, name);
        sqlx::query(&create_collection_table(&table))
            .execute(&self.pool)
            .await?;
        Ok(Arc::new(PgCollection {
            pool: self.pool.clone(),
            name: name.to_string(),
            table,
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Create the target database if it does not exist yet. Connects to the `postgres`
/// maintenance database with the same credentials to run CREATE DATABASE.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), StoreError> {
    let db_name = match options.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn: sqlx::PgConnection = admin_options(options).connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn admin_options(options: &PgConnectOptions) -> PgConnectOptions {
    options.clone().database("postgres")
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_connection_keeps_server_and_credentials() {
        let options = PgConnectOptions::new()
            .host("db")
            .port(6543)
            .username("app")
            .password("p@ss/w:rd")
            .database("desafio");
        let admin = admin_options(&options);
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "db");
        assert_eq!(admin.get_port(), 6543);
        assert_eq!(admin.get_username(), "app");
    }

    #[test]
    fn non_object_document_is_reported() {
        let id = Uuid::new_v4();
        let err = document_from_row(id, serde_json::json!(["nome"])).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedDocument { id: bad, found: "array" } if bad == RecordId::from(id)
        ));
        let (got, doc) = document_from_row(id, serde_json::json!({"nome": "Ana"})).unwrap();
        assert_eq!(got, RecordId::from(id));
        assert_eq!(doc.get("nome"), Some(&Value::String("Ana".into())));
    }

    #[test]
    fn identifiers_are_double_quoted() {
        assert_eq!(quote_ident("desafio"), "\"desafio\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
