//! Plugin lifecycle driver
//!
//! Runs a plugin's registration phase against a fresh registry and freezes
//! the result. Registration is all-or-nothing: the first error aborts
//! startup and the partial registry is dropped.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::SchemaCatalog;
use crate::error::Result;
use crate::plugin::{Plugin, PluginDescriptor};
use crate::registry::SchemaRegistry;

/// A plugin whose metanodes are registered and frozen
#[derive(Debug, Clone)]
pub struct LoadedPlugin {
    pub descriptor: PluginDescriptor,
    pub catalog: Arc<SchemaCatalog>,
}

/// Initialize `plugin` and freeze its metanodes
pub fn startup<P: Plugin + ?Sized>(plugin: &P) -> Result<LoadedPlugin> {
    let descriptor = plugin.descriptor();
    info!(
        plugin = %descriptor.name,
        version = %descriptor.version,
        "initializing plugin"
    );

    let mut registry = SchemaRegistry::new();
    let catalog = plugin
        .init(&mut registry)
        .and_then(|()| registry.freeze())
        .map_err(|e| {
            debug!(
                plugin = %descriptor.name,
                registration = e.is_registration_error(),
                "plugin initialization failed: {}", e
            );
            e
        })?;

    info!(plugin = %descriptor.name, schemas = catalog.len(), "plugin ready");
    Ok(LoadedPlugin {
        descriptor,
        catalog: Arc::new(catalog),
    })
}

/// Run the plugin's cleanup hook and release its catalog
pub fn shutdown<P: Plugin + ?Sized>(plugin: &P, loaded: LoadedPlugin) -> Result<()> {
    plugin.cleanup()?;
    info!(plugin = %loaded.descriptor.name, "plugin unloaded");
    Ok(())
}
