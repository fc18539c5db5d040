//! Query-string to store filter translation.
//!
//! Only schema fields and `_id` are filterable. Values are coerced to the field's declared
//! kind; `_id` goes through [`RecordId::decode`]. When a key repeats, its first value wins.

use crate::error::RepoError;
use crate::id::{RecordId, ID_FIELD};
use crate::schema::{FieldKind, Schema};
use crate::store::Document;
use serde_json::{Map, Value};

/// Conjunction of exact-equality conditions, optionally pinned to one identifier.
/// An empty filter matches every document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    id: Option<RecordId>,
    fields: Map<String, Value>,
}

impl Filter {
    pub fn all() -> Self {
        Filter::default()
    }

    pub fn by_id(id: RecordId) -> Self {
        Filter {
            id: Some(id),
            fields: Map::new(),
        }
    }

    /// Add an equality condition on a document field.
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    /// Field equality conditions as a JSON object (usable as a containment pattern).
    pub fn conditions(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.fields.is_empty()
    }

    pub fn matches(&self, id: &RecordId, doc: &Document) -> bool {
        if let Some(want) = &self.id {
            if want != id {
                return false;
            }
        }
        self.fields.iter().all(|(k, v)| doc.get(k) == Some(v))
    }
}

pub struct FilterBuilder;

impl FilterBuilder {
    /// Build a filter from raw query pairs against a resource schema.
    pub fn from_query(params: &[(String, String)], schema: &Schema) -> Result<Filter, RepoError> {
        let mut filter = Filter::all();
        let mut seen_id = false;
        for (key, raw) in params {
            if key == ID_FIELD {
                if !seen_id {
                    filter.id = Some(RecordId::decode(raw)?);
                    seen_id = true;
                }
                continue;
            }
            if filter.fields.contains_key(key) {
                continue;
            }
            let spec = schema
                .field(key)
                .ok_or_else(|| RepoError::InvalidFilter(format!("unknown field '{}'", key)))?;
            let value = coerce(spec.kind, key, raw)?;
            filter.fields.insert(key.clone(), value);
        }
        Ok(filter)
    }
}

fn coerce(kind: FieldKind, key: &str, raw: &str) -> Result<Value, RepoError> {
    match kind {
        FieldKind::Text => Ok(Value::String(raw.to_string())),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| RepoError::InvalidFilter(format!("{} must be an integer, got '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use serde_json::json;

    static SCHEMA: Schema = Schema {
        fields: &[FieldSpec::integer("matricula"), FieldSpec::text("nome")],
    };

    fn pairs(p: &[(&str, &str)]) -> Vec<(String, String)> {
        p.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let f = FilterBuilder::from_query(&[], &SCHEMA).unwrap();
        assert!(f.is_empty());
        let doc = json!({"nome": "Ana"}).as_object().cloned().unwrap();
        assert!(f.matches(&RecordId::generate(), &doc));
    }

    #[test]
    fn values_are_coerced_to_field_kind() {
        let f = FilterBuilder::from_query(&pairs(&[("matricula", "7"), ("nome", "Ana")]), &SCHEMA).unwrap();
        assert_eq!(f.conditions().get("matricula"), Some(&json!(7)));
        assert_eq!(f.conditions().get("nome"), Some(&json!("Ana")));
    }

    #[test]
    fn first_value_of_repeated_key_wins() {
        let f = FilterBuilder::from_query(&pairs(&[("nome", "Ana"), ("nome", "Bia")]), &SCHEMA).unwrap();
        assert_eq!(f.conditions().get("nome"), Some(&json!("Ana")));
    }

    #[test]
    fn id_is_decoded_not_compared_as_text() {
        let id = RecordId::generate();
        let f = FilterBuilder::from_query(&pairs(&[("_id", &id.to_string())]), &SCHEMA).unwrap();
        assert_eq!(f.id(), Some(id));
        assert!(f.conditions().is_empty());
    }

    #[test]
    fn malformed_id_fails_with_invalid_identifier() {
        let err = FilterBuilder::from_query(&pairs(&[("_id", "abc")]), &SCHEMA).unwrap_err();
        assert!(matches!(err, RepoError::InvalidIdentifier(_)));
    }

    #[test]
    fn unknown_field_and_bad_integer_are_rejected() {
        let err = FilterBuilder::from_query(&pairs(&[("cor", "azul")]), &SCHEMA).unwrap_err();
        assert!(matches!(err, RepoError::InvalidFilter(_)));
        let err = FilterBuilder::from_query(&pairs(&[("matricula", "um")]), &SCHEMA).unwrap_err();
        assert!(matches!(err, RepoError::InvalidFilter(_)));
    }

    #[test]
    fn matches_requires_every_condition() {
        let id = RecordId::generate();
        let doc = json!({"matricula": 7, "nome": "Ana"}).as_object().cloned().unwrap();
        assert!(Filter::all().eq("matricula", json!(7)).matches(&id, &doc));
        assert!(!Filter::all().eq("matricula", json!(7)).eq("nome", json!("Bia")).matches(&id, &doc));
        assert!(!Filter::by_id(RecordId::generate()).matches(&id, &doc));
        assert!(Filter::by_id(id).matches(&id, &doc));
    }
}
