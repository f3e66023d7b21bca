//! Plugin Contract
//!
//! The host application drives a plugin through five entry points:
//! `Name`, `Version` and `Signature` are exposed as a [`PluginDescriptor`],
//! while `Init` and `Cleanup` are the lifecycle hooks of the [`Plugin`]
//! trait. The host hands the registry to `init` explicitly; there is no
//! global registry.

pub mod jira;

pub use jira::JiraTreePlugin;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::version::PluginVersion;

/// Opaque license blob the host checks before calling `init`
///
/// Carried verbatim; never parsed or verified here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(blob: impl Into<String>) -> Self {
        Self(blob.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Keep the blob out of debug logs
impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({} bytes)", self.0.len())
    }
}

/// Identity a plugin reports to its host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: PluginVersion,
    pub signature: Signature,
}

/// A metanode plugin
pub trait Plugin {
    /// Name, version and signature
    fn descriptor(&self) -> PluginDescriptor;

    /// Publish the plugin's metanodes into `registry`
    ///
    /// Any error is a fatal startup defect.
    fn init(&self, registry: &mut SchemaRegistry) -> Result<()>;

    /// Release plugin resources on unload
    fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}
