//! Per-resource field schemas: the declared shape and constraints of each record type.

use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
        }
    }
}

/// One declared field. Built in `const` context by the resource modules.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    /// Wire name (JSON key and document key).
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Maximum length in characters (text fields).
    pub max_length: Option<usize>,
    /// Maximum absolute value (integer fields).
    pub max_magnitude: Option<i64>,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Text,
            required: false,
            max_length: None,
            max_magnitude: None,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Integer,
            required: false,
            max_length: None,
            max_magnitude: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub const fn max_magnitude(mut self, n: i64) -> Self {
        self.max_magnitude = Some(n);
        self
    }

    /// Integer fields bounded by a number of decimal digits (e.g. phone numbers).
    pub const fn max_digits(self, digits: u32) -> Self {
        self.max_magnitude(10i64.pow(digits) - 1)
    }
}

/// Ordered field list of a resource type. Validation walks it in declaration order.
#[derive(Debug)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Required,
    Type(FieldKind),
    MaxLength(usize),
    MaxMagnitude(i64),
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Required => "required",
            ConstraintKind::Type(_) => "type",
            ConstraintKind::MaxLength(_) => "max_length",
            ConstraintKind::MaxMagnitude(_) => "max_magnitude",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Required => write!(f, "is required"),
            ConstraintKind::Type(kind) => write!(f, "must be {}", kind.as_str()),
            ConstraintKind::MaxLength(n) => write!(f, "must be at most {} characters", n),
            ConstraintKind::MaxMagnitude(n) => write!(f, "must be at most {} in magnitude", n),
        }
    }
}

/// First violated constraint of a record.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{field} {kind}")]
pub struct ValidationError {
    pub field: String,
    pub kind: ConstraintKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_digits_bounds_magnitude() {
        let f = FieldSpec::integer("telefone").max_digits(10);
        assert_eq!(f.max_magnitude, Some(9_999_999_999));
    }

    #[test]
    fn validation_error_message_names_field() {
        let e = ValidationError {
            field: "nome".into(),
            kind: ConstraintKind::MaxLength(20),
        };
        assert_eq!(e.to_string(), "nome must be at most 20 characters");
    }
}
