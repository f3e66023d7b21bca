//! Metanode Registry
//!
//! Two-phase registration of metanode definitions: open a definition, append
//! fields, then finalize it. Only finalized definitions are visible to
//! lookups and usable as link targets. Once registration is over the
//! registry is frozen into a read-only [`SchemaCatalog`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::catalog::SchemaCatalog;
use crate::error::{MetaError, Result};
use crate::schema::{DefinitionState, FieldDeclaration, SchemaDefinition};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Token for an open definition, returned by [`SchemaRegistry::begin_definition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaHandle {
    registry: u64,
    index: usize,
}

/// The registration-phase metanode registry
#[derive(Debug)]
pub struct SchemaRegistry {
    /// Identity used to reject handles from other registries
    id: u64,
    /// Definitions in registration order
    definitions: Vec<SchemaDefinition>,
    /// Name -> position in `definitions`
    by_name: HashMap<String, usize>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            definitions: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Open a new definition named `name`
    pub fn begin_definition(&mut self, name: &str) -> Result<SchemaHandle> {
        check_name(name, "schema name")?;
        if self.by_name.contains_key(name) {
            return Err(MetaError::DuplicateName {
                name: name.to_string(),
            });
        }

        let index = self.definitions.len();
        self.definitions.push(SchemaDefinition::open(name));
        self.by_name.insert(name.to_string(), index);
        debug!(schema = name, "opened definition");

        Ok(SchemaHandle {
            registry: self.id,
            index,
        })
    }

    /// Append a string field to an open definition
    pub fn add_string_field(&mut self, handle: SchemaHandle, field_name: &str) -> Result<()> {
        self.check_new_field(handle, field_name)?;
        self.push_field(handle, FieldDeclaration::string(field_name));
        Ok(())
    }

    /// Append a link field restricted to nodes of metanode `target`
    ///
    /// `target` must already be finalized at call time.
    pub fn add_link_field(
        &mut self,
        handle: SchemaHandle,
        field_name: &str,
        target: &str,
    ) -> Result<()> {
        let schema = self.check_new_field(handle, field_name)?;
        if self.lookup(target).is_none() {
            return Err(MetaError::UnknownTarget {
                schema,
                field: field_name.to_string(),
                target: target.to_string(),
            });
        }
        self.push_field(handle, FieldDeclaration::link(field_name, target));
        Ok(())
    }

    /// Seal an open definition, making it visible
    pub fn finalize_definition(&mut self, handle: SchemaHandle) -> Result<()> {
        let def = self.open_definition(handle)?;
        if def.fields.is_empty() {
            return Err(MetaError::EmptyDefinition {
                name: def.name.clone(),
            });
        }

        let def = &mut self.definitions[handle.index];
        def.state = DefinitionState::Finalized;
        info!(schema = %def.name, fields = def.fields.len(), "registered metanode");
        Ok(())
    }

    /// Open, populate and finalize a definition in one go
    ///
    /// ```
    /// # use jiratree_metanodes::SchemaRegistry;
    /// let mut registry = SchemaRegistry::new();
    /// registry.define("Server", |def| {
    ///     def.string("Host")?.string("Port")?;
    ///     Ok(())
    /// }).unwrap();
    /// assert!(registry.lookup("Server").is_some());
    /// ```
    pub fn define<F>(&mut self, name: &str, build: F) -> Result<()>
    where
        F: FnOnce(&mut DefinitionBuilder<'_>) -> Result<()>,
    {
        let handle = self.begin_definition(name)?;
        let mut builder = DefinitionBuilder {
            registry: self,
            handle,
        };
        build(&mut builder)?;
        self.finalize_definition(handle)
    }

    /// Get a finalized definition by name
    pub fn lookup(&self, name: &str) -> Option<&SchemaDefinition> {
        self.by_name
            .get(name)
            .map(|&i| &self.definitions[i])
            .filter(|def| def.is_finalized())
    }

    /// Finalized definitions, in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.definitions.iter().filter(|def| def.is_finalized())
    }

    /// Names of definitions that are still open
    pub fn pending(&self) -> Vec<&str> {
        self.definitions
            .iter()
            .filter(|def| !def.is_finalized())
            .map(|def| def.name.as_str())
            .collect()
    }

    /// Number of registered names, open or finalized
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// End the registration phase
    ///
    /// Fails if any definition was opened but never finalized.
    pub fn freeze(self) -> Result<SchemaCatalog> {
        let pending = self.pending();
        if !pending.is_empty() {
            return Err(MetaError::UnfinishedDefinition {
                names: pending.into_iter().map(String::from).collect(),
            });
        }
        debug!(schemas = self.definitions.len(), "froze registry");
        Ok(SchemaCatalog::new(self.definitions))
    }

    /// Resolve a handle to its definition, rejecting foreign or sealed handles
    fn open_definition(&self, handle: SchemaHandle) -> Result<&SchemaDefinition> {
        if handle.registry != self.id {
            return Err(MetaError::InvalidHandle {
                schema: format!("#{}", handle.index),
                reason: "handle belongs to another registry".to_string(),
            });
        }
        let def = self
            .definitions
            .get(handle.index)
            .ok_or_else(|| MetaError::InvalidHandle {
                schema: format!("#{}", handle.index),
                reason: "no such definition".to_string(),
            })?;
        if def.is_finalized() {
            return Err(MetaError::InvalidHandle {
                schema: def.name.clone(),
                reason: "definition is already finalized".to_string(),
            });
        }
        Ok(def)
    }

    /// Validate a new field against its definition; returns the schema name
    fn check_new_field(&self, handle: SchemaHandle, field_name: &str) -> Result<String> {
        let def = self.open_definition(handle)?;
        check_name(field_name, "field name")?;
        if def.has_field(field_name) {
            return Err(MetaError::DuplicateField {
                schema: def.name.clone(),
                field: field_name.to_string(),
            });
        }
        Ok(def.name.clone())
    }

    fn push_field(&mut self, handle: SchemaHandle, field: FieldDeclaration) {
        let def = &mut self.definitions[handle.index];
        debug!(schema = %def.name, field = %field, "added field");
        def.fields.push(field);
    }
}

fn check_name(name: &str, context: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MetaError::InvalidName {
            context: context.to_string(),
        });
    }
    Ok(())
}

/// Field builder handed to the closure in [`SchemaRegistry::define`]
pub struct DefinitionBuilder<'a> {
    registry: &'a mut SchemaRegistry,
    handle: SchemaHandle,
}

impl DefinitionBuilder<'_> {
    pub fn string(&mut self, field_name: &str) -> Result<&mut Self> {
        self.registry.add_string_field(self.handle, field_name)?;
        Ok(self)
    }

    pub fn link(&mut self, field_name: &str, target: &str) -> Result<&mut Self> {
        self.registry.add_link_field(self.handle, field_name, target)?;
        Ok(self)
    }
}
