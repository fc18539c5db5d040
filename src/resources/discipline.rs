use super::Resource;
use crate::id::RecordId;
use crate::schema::{FieldSpec, Schema};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Discipline {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome")]
    pub name: String,
    /// Total workload in hours.
    #[serde(rename = "cargaHoraria")]
    pub workload_hours: i64,
}

static SCHEMA: Schema = Schema {
    fields: &[
        FieldSpec::text("nome"),
        FieldSpec::integer("cargaHoraria"),
    ],
};

impl Resource for Discipline {
    const NAME: &'static str = "discipline";
    const PATH: &'static str = "disciplinas";

    fn schema() -> &'static Schema {
        &SCHEMA
    }
}
