//! Metanode schema types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checksum::Checksum;

/// Kind of a field declared on a metanode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form string property
    String,
    /// Reference to a node whose metanode is `target` (a "link filter")
    Link { target: String },
}

impl FieldKind {
    /// Short label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Link { .. } => "link",
        }
    }
}

/// A single property declared on a metanode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDeclaration {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::String,
        }
    }

    pub fn link(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Link {
                target: target.into(),
            },
        }
    }

    /// Target metanode if this is a link field
    pub fn link_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Link { target } => Some(target),
            FieldKind::String => None,
        }
    }
}

impl fmt::Display for FieldDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldKind::String => write!(f, "{}: string", self.name),
            FieldKind::Link { target } => write!(f, "{}: link -> {}", self.name, target),
        }
    }
}

/// Lifecycle state of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionState {
    /// Accepting fields, not yet visible
    #[default]
    Open,
    /// Sealed; visible to lookups and usable as a link target
    Finalized,
}

/// A metanode definition: a named, ordered list of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Unique name of the metanode (e.g., "JiraConnection")
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDeclaration>,
    /// Lifecycle state
    #[serde(skip)]
    pub(crate) state: DefinitionState,
}

impl SchemaDefinition {
    pub(crate) fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            state: DefinitionState::Open,
        }
    }

    pub fn state(&self) -> DefinitionState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == DefinitionState::Finalized
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// All link fields on this definition
    pub fn links(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.fields.iter().filter(|f| f.link_target().is_some())
    }

    /// Compute the checksum for this definition
    pub fn checksum(&self) -> Checksum {
        Checksum::from_definition(self)
    }
}
