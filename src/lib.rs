//! JiraTree Metanodes
//!
//! Metanode ("schema") registration for the JiraTree plugin: typed string
//! properties plus filtered links between metanodes, registered once at
//! plugin startup and read-only afterwards.
//!
//! ## Lifecycle
//!
//! ```text
//! SchemaRegistry::new()
//!   └─ begin_definition("JiraConnection")   Open
//!        ├─ add_string_field("URL")
//!        ├─ ...
//!        └─ finalize_definition()           Finalized, visible, linkable
//!   └─ freeze()                             SchemaCatalog (immutable, Arc-shareable)
//! ```
//!
//! [`host::startup`] drives a [`Plugin`] through this sequence and aborts on
//! the first registration error.
//!
//! ```
//! use jiratree_metanodes::{host, JiraTreePlugin};
//!
//! let loaded = host::startup(&JiraTreePlugin).unwrap();
//! let project = loaded.catalog.get("JiraProject").unwrap();
//! assert_eq!(project.field_names(), vec!["Connection", "Key", "JQL"]);
//! ```

pub mod catalog;
pub mod checksum;
pub mod config;
pub mod error;
pub mod host;
pub mod plugin;
pub mod registry;
pub mod schema;
pub mod version;

pub use catalog::{CatalogManifest, LinkRef, SchemaCatalog, SearchResult};
pub use checksum::Checksum;
pub use config::MetanodesConfig;
pub use error::{MetaError, Result};
pub use host::{startup, shutdown, LoadedPlugin};
pub use plugin::{JiraTreePlugin, Plugin, PluginDescriptor, Signature};
pub use registry::{DefinitionBuilder, SchemaHandle, SchemaRegistry};
pub use schema::{DefinitionState, FieldDeclaration, FieldKind, SchemaDefinition};
pub use version::PluginVersion;
