//! Resource types served by the API. Each one is a typed record plus a static field schema.

mod course;
mod discipline;
mod student;
mod teacher;

pub use course::Course;
pub use discipline::Discipline;
pub use student::Student;
pub use teacher::Teacher;

use crate::id::{RecordId, ID_FIELD};
use crate::schema::Schema;
use crate::store::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A record type stored in its own collection and exposed under `/{PATH}`.
///
/// Serialized form uses the wire field names and renders the identifier as `_id`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular name for messages and logs.
    const NAME: &'static str;
    /// HTTP path segment; also the default collection name.
    const PATH: &'static str;

    fn schema() -> &'static Schema;

    /// Document body for the store: every field except the identifier.
    fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(mut m) => {
                m.remove(ID_FIELD);
                Ok(m)
            }
            _ => Err(serde::ser::Error::custom("record must serialize to an object")),
        }
    }

    fn from_document(id: RecordId, mut doc: Document) -> Result<Self, serde_json::Error> {
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        serde_json::from_value(Value::Object(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_drops_identifier_and_keeps_wire_names() {
        let s = Student {
            id: Some(RecordId::generate()),
            enrollment: 1,
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            phone: 1199999999,
        };
        let doc = s.to_document().unwrap();
        assert_eq!(
            Value::Object(doc),
            json!({"matricula": 1, "nome": "Ana", "sobrenome": "Silva", "telefone": 1199999999})
        );
    }

    #[test]
    fn from_document_restores_identifier() {
        let id = RecordId::generate();
        let doc = json!({"nome": "Cálculo", "cargaHoraria": 60}).as_object().cloned().unwrap();
        let d = Discipline::from_document(id, doc).unwrap();
        assert_eq!(d.id, Some(id));
        assert_eq!(d.workload_hours, 60);
    }

    #[test]
    fn unsaved_record_serializes_without_identifier() {
        let c = Course {
            id: None,
            name: "Física".into(),
        };
        assert_eq!(serde_json::to_value(&c).unwrap(), json!({"nome": "Física"}));
    }

    #[test]
    fn schemas_only_name_serialized_fields() {
        fn check<T: Resource>(sample: T) {
            let doc = sample.to_document().unwrap();
            for name in T::schema().field_names() {
                assert!(doc.contains_key(name), "{} lacks {}", T::NAME, name);
            }
            assert_eq!(doc.len(), T::schema().fields.len());
        }
        check(Student {
            id: None,
            enrollment: 1,
            first_name: "a".into(),
            last_name: "b".into(),
            phone: 1,
        });
        check(Teacher {
            id: None,
            registration: 1,
            first_name: "a".into(),
            last_name: "b".into(),
            phone: 1,
        });
        check(Course {
            id: None,
            name: "a".into(),
        });
        check(Discipline {
            id: None,
            name: "a".into(),
            workload_hours: 1,
        });
    }
}
