//! JiraTree metanodes
//!
//! Models a connection to a Jira instance and a project within it, so end
//! users can build `JiraConnection` -> `JiraProject` node hierarchies.

use tracing::info;

use super::{Plugin, PluginDescriptor, Signature};
use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::version::PluginVersion;

pub const PLUGIN_NAME: &str = "JiraTree-Metanodes";
pub const PLUGIN_VERSION: PluginVersion = PluginVersion::new(1, 0, 0);

pub const JIRA_CONNECTION: &str = "JiraConnection";
/// Base URL of the Jira REST API, e.g. `site.atlassian.net/rest/api/2/`
pub const FIELD_URL: &str = "URL";
pub const FIELD_USERNAME: &str = "Username";
pub const FIELD_API_TOKEN: &str = "APIToken";

pub const JIRA_PROJECT: &str = "JiraProject";
/// Link restricted to `JiraConnection` nodes
pub const FIELD_CONNECTION: &str = "Connection";
pub const FIELD_KEY: &str = "Key";
/// JQL replacing the default project query
pub const FIELD_JQL: &str = "JQL";

const LICENSE_SIGNATURE: &str = "<VRTREE_API><company>Virtalis</company><feature>jiratree.dll</feature><feature>JiraTree-Metanodes</feature><feature>SCC_PLUGIN</feature></VRTREE_API>560900f5981b0b3d471cb7ad18fbbceec046f5b749869ce0c2dc161f5df3776b15ac616c14b2b513f1212c3b328553768eaf921a0aa6d55b6a03501e07707f8deea702a71de5a1fe0f958cf4611102c10a9e317060e0218e201de9e1ccb3743b0f67c818557d6d311694c6dfc0d2d3b8847ce578ac667ca1583d2f50b770c227";

/// The JiraTree plugin
#[derive(Debug, Clone, Copy, Default)]
pub struct JiraTreePlugin;

impl Plugin for JiraTreePlugin {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor {
            name: PLUGIN_NAME.to_string(),
            version: PLUGIN_VERSION,
            signature: Signature::new(LICENSE_SIGNATURE),
        }
    }

    fn init(&self, registry: &mut SchemaRegistry) -> Result<()> {
        let connection = registry.begin_definition(JIRA_CONNECTION)?;
        registry.add_string_field(connection, FIELD_URL)?;
        registry.add_string_field(connection, FIELD_USERNAME)?;
        registry.add_string_field(connection, FIELD_API_TOKEN)?;
        registry.finalize_definition(connection)?;

        let project = registry.begin_definition(JIRA_PROJECT)?;
        registry.add_link_field(project, FIELD_CONNECTION, JIRA_CONNECTION)?;
        registry.add_string_field(project, FIELD_KEY)?;
        registry.add_string_field(project, FIELD_JQL)?;
        registry.finalize_definition(project)?;

        info!(plugin = PLUGIN_NAME, "metanodes registered");
        Ok(())
    }
}
