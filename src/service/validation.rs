//! Record validation against a resource schema.

use crate::schema::{ConstraintKind, FieldKind, FieldSpec, Schema, ValidationError};
use serde_json::{Map, Value};

pub struct RecordValidator;

impl RecordValidator {
    /// Validate a full record. Fields are checked in schema order; the first violation is returned.
    /// Keys outside the schema are not inspected.
    pub fn validate(record: &Map<String, Value>, schema: &Schema) -> Result<(), ValidationError> {
        for spec in schema.fields {
            let val = record.get(spec.name).filter(|v| !v.is_null());
            match val {
                None if spec.required => return Err(violation(spec, ConstraintKind::Required)),
                None => {}
                Some(v) => validate_field(spec, v)?,
            }
        }
        Ok(())
    }
}

fn violation(spec: &FieldSpec, kind: ConstraintKind) -> ValidationError {
    ValidationError {
        field: spec.name.to_string(),
        kind,
    }
}

fn validate_field(spec: &FieldSpec, v: &Value) -> Result<(), ValidationError> {
    match spec.kind {
        FieldKind::Text => {
            let s = v
                .as_str()
                .ok_or_else(|| violation(spec, ConstraintKind::Type(FieldKind::Text)))?;
            if spec.required && s.is_empty() {
                return Err(violation(spec, ConstraintKind::Required));
            }
            if let Some(max) = spec.max_length {
                if s.chars().count() > max {
                    return Err(violation(spec, ConstraintKind::MaxLength(max)));
                }
            }
        }
        FieldKind::Integer => {
            let n = v
                .as_i64()
                .ok_or_else(|| violation(spec, ConstraintKind::Type(FieldKind::Integer)))?;
            if let Some(max) = spec.max_magnitude {
                if n.unsigned_abs() > max.unsigned_abs() {
                    return Err(violation(spec, ConstraintKind::MaxMagnitude(max)));
                }
            }
        }
    }
    Ok(())
}
