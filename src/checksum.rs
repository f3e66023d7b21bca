//! Checksum utilities for metanode definitions

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::SchemaDefinition;

/// SHA256 checksum of a definition or manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a string
    pub fn from_text(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Compute checksum from a definition's canonical form
    ///
    /// The canonical form is the JSON encoding of `(name, fields)`, so
    /// separators inside names cannot collide with the structure.
    pub fn from_definition(def: &SchemaDefinition) -> Self {
        let canonical = serde_json::to_string(&(&def.name, &def.fields)).unwrap_or_default();
        Self::from_text(&canonical)
    }

    /// Combine several checksums into one, order-sensitive
    pub fn combine<'a>(checksums: impl IntoIterator<Item = &'a Checksum>) -> Self {
        let combined: Vec<&str> = checksums.into_iter().map(|c| c.as_str()).collect();
        Self::from_text(&combined.join(","))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that a definition matches this checksum
    pub fn verify(&self, def: &SchemaDefinition) -> bool {
        *self == Self::from_definition(def)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}
