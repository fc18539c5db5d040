use super::Resource;
use crate::id::RecordId;
use crate::schema::{FieldSpec, Schema};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "matricula")]
    pub enrollment: i64,
    #[serde(rename = "nome")]
    pub first_name: String,
    #[serde(rename = "sobrenome")]
    pub last_name: String,
    /// Up to 10 digits (area code included).
    #[serde(rename = "telefone")]
    pub phone: i64,
}

static SCHEMA: Schema = Schema {
    fields: &[
        FieldSpec::integer("matricula").required(),
        FieldSpec::text("nome").required().max_length(20),
        FieldSpec::text("sobrenome").required().max_length(20),
        FieldSpec::integer("telefone").required().max_digits(10),
    ],
};

impl Resource for Student {
    const NAME: &'static str = "student";
    const PATH: &'static str = "alunos";

    fn schema() -> &'static Schema {
        &SCHEMA
    }
}
