//! Record identifiers: store-native UUIDs, rendered as hyphenated strings on the wire.

use crate::error::RepoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Wire name of the identifier field in documents, filters and payloads.
pub const ID_FIELD: &str = "_id";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Fresh random identifier. Called once per inserted record.
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4())
    }

    /// Parse an external identifier. Anything that is not a UUID fails with `InvalidIdentifier`.
    pub fn decode(external: &str) -> Result<Self, RepoError> {
        Uuid::try_parse(external)
            .map(RecordId)
            .map_err(|_| RepoError::InvalidIdentifier(external.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RecordId {
    fn from(u: Uuid) -> Self {
        RecordId(u)
    }
}

impl FromStr for RecordId {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::decode(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}
