use super::Resource;
use crate::id::RecordId;
use crate::schema::{FieldSpec, Schema};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "registro")]
    pub registration: i64,
    #[serde(rename = "nome")]
    pub first_name: String,
    #[serde(rename = "sobrenome")]
    pub last_name: String,
    #[serde(rename = "telefone")]
    pub phone: i64,
}

// Typed but unconstrained: teacher records carry no length or range limits.
static SCHEMA: Schema = Schema {
    fields: &[
        FieldSpec::integer("registro"),
        FieldSpec::text("nome"),
        FieldSpec::text("sobrenome"),
        FieldSpec::integer("telefone"),
    ],
};

impl Resource for Teacher {
    const NAME: &'static str = "teacher";
    const PATH: &'static str = "professores";

    fn schema() -> &'static Schema {
        &SCHEMA
    }
}
