use super::Resource;
use crate::id::RecordId;
use crate::schema::{FieldSpec, Schema};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome")]
    pub name: String,
}

static SCHEMA: Schema = Schema {
    fields: &[FieldSpec::text("nome")],
};

impl Resource for Course {
    const NAME: &'static str = "course";
    const PATH: &'static str = "cursos";

    fn schema() -> &'static Schema {
        &SCHEMA
    }
}
