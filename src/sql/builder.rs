//! Builds parameterized statements for collection tables.
//!
//! Each collection is one table `(seq BIGSERIAL, id UUID PRIMARY KEY, doc JSONB NOT NULL)`.
//! Parameters are sent as text and cast in SQL.

use super::PgBindValue;
use crate::filter::Filter;
use crate::id::RecordId;
use crate::store::Document;
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: collection and schema names are checked at config load).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))
}

pub fn create_collection_table(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            seq BIGSERIAL NOT NULL,
            id UUID PRIMARY KEY,
            doc JSONB NOT NULL
        )
        "#,
        table
    )
}

/// SELECT id, doc for every document matching the filter, in insertion order.
/// Field conditions become one JSONB containment test.
pub fn select_matching(table: &str, filter: &Filter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(id) = filter.id() {
        let n = q.push_param(PgBindValue::Uuid(id.as_uuid()));
        where_parts.push(format!("id = ${}::uuid", n));
    }
    if !filter.conditions().is_empty() {
        let n = q.push_param(PgBindValue::Json(Value::Object(filter.conditions().clone())));
        where_parts.push(format!("doc @> ${}::jsonb", n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!("SELECT id, doc FROM {}{} ORDER BY seq", table, where_clause);
    q
}

pub fn insert_document(table: &str, id: RecordId, doc: Document) -> QueryBuf {
    let mut q = QueryBuf::new();
    let id_n = q.push_param(PgBindValue::Uuid(id.as_uuid()));
    let doc_n = q.push_param(PgBindValue::Json(Value::Object(doc)));
    q.sql = format!(
        "INSERT INTO {} (id, doc) VALUES (${}::uuid, ${}::jsonb)",
        table, id_n, doc_n
    );
    q
}

/// Top-level field overwrite: `doc || fields`.
pub fn update_fields(table: &str, id: RecordId, fields: Document) -> QueryBuf {
    let mut q = QueryBuf::new();
    let id_n = q.push_param(PgBindValue::Uuid(id.as_uuid()));
    let doc_n = q.push_param(PgBindValue::Json(Value::Object(fields)));
    q.sql = format!(
        "UPDATE {} SET doc = doc || ${}::jsonb WHERE id = ${}::uuid",
        table, doc_n, id_n
    );
    q
}

pub fn delete_by_id(table: &str, id: RecordId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::Uuid(id.as_uuid()));
    q.sql = format!("DELETE FROM {} WHERE id = ${}::uuid", table, n);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const T: &str = "\"desafio\".\"alunos\"";

    #[test]
    fn qualified_table_quotes_both_parts() {
        assert_eq!(qualified_table("desafio", "alunos"), T);
        assert_eq!(qualified_table("a\"b", "c"), "\"a\"\"b\".\"c\"");
    }

    #[test]
    fn empty_filter_selects_everything_in_order() {
        let q = select_matching(T, &Filter::all());
        assert_eq!(q.sql, format!("SELECT id, doc FROM {} ORDER BY seq", T));
        assert!(q.params.is_empty());
    }

    #[test]
    fn id_and_fields_are_parameterized() {
        let id = RecordId::generate();
        let filter = Filter::by_id(id).eq("nome", json!("Ana"));
        let q = select_matching(T, &filter);
        assert_eq!(
            q.sql,
            format!("SELECT id, doc FROM {} WHERE id = $1::uuid AND doc @> $2::jsonb ORDER BY seq", T)
        );
        assert!(matches!(&q.params[0], PgBindValue::Uuid(u) if *u == id.as_uuid()));
        assert!(matches!(&q.params[1], PgBindValue::Json(v) if *v == json!({"nome": "Ana"})));
    }

    #[test]
    fn update_merges_top_level_fields() {
        let id = RecordId::generate();
        let fields = json!({"nome": "Ana Maria"}).as_object().cloned().unwrap();
        let q = update_fields(T, id, fields);
        assert_eq!(q.sql, format!("UPDATE {} SET doc = doc || $2::jsonb WHERE id = $1::uuid", T));
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn delete_binds_only_the_id() {
        let q = delete_by_id(T, RecordId::generate());
        assert_eq!(q.sql, format!("DELETE FROM {} WHERE id = $1::uuid", T));
        assert_eq!(q.params.len(), 1);
    }
}
