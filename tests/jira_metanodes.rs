//! End-to-end tests for JiraTree metanode registration
//!
//! Drives the registry the way the host does at plugin startup.

use std::sync::Arc;
use std::thread;

use jiratree_metanodes::config::OutputFormat;
use jiratree_metanodes::plugin::jira::{
    FIELD_API_TOKEN, FIELD_CONNECTION, FIELD_JQL, FIELD_KEY, FIELD_URL, FIELD_USERNAME,
    JIRA_CONNECTION, JIRA_PROJECT,
};
use jiratree_metanodes::{
    host, CatalogManifest, FieldDeclaration, FieldKind, JiraTreePlugin, MetaError, Plugin,
    SchemaRegistry,
};
use tempfile::tempdir;

// =============================================================================
// Registration scenarios
// =============================================================================

#[test]
fn test_jira_connection_scenario() {
    let mut registry = SchemaRegistry::new();
    let h = registry.begin_definition("JiraConnection").unwrap();
    registry.add_string_field(h, "URL").unwrap();
    registry.add_string_field(h, "Username").unwrap();
    registry.add_string_field(h, "APIToken").unwrap();
    registry.finalize_definition(h).unwrap();

    let def = registry.lookup("JiraConnection").unwrap();
    assert_eq!(
        def.fields,
        vec![
            FieldDeclaration::string("URL"),
            FieldDeclaration::string("Username"),
            FieldDeclaration::string("APIToken"),
        ]
    );
}

#[test]
fn test_jira_project_link_needs_finalized_connection() {
    let mut registry = SchemaRegistry::new();
    let conn = registry.begin_definition("JiraConnection").unwrap();
    registry.add_string_field(conn, "URL").unwrap();

    let project = registry.begin_definition("JiraProject").unwrap();
    let err = registry
        .add_link_field(project, "Connection", "JiraConnection")
        .unwrap_err();
    assert!(matches!(err, MetaError::UnknownTarget { .. }));
    assert!(err.to_string().contains("JiraConnection"));

    registry.finalize_definition(conn).unwrap();
    registry
        .add_link_field(project, "Connection", "JiraConnection")
        .unwrap();
    registry.add_string_field(project, "Key").unwrap();
    registry.finalize_definition(project).unwrap();

    let def = registry.lookup("JiraProject").unwrap();
    assert_eq!(def.field_names(), vec!["Connection", "Key"]);
}

#[test]
fn test_link_target_must_exist_at_call_time() {
    let mut registry = SchemaRegistry::new();
    let project = registry.begin_definition("JiraProject").unwrap();
    assert!(matches!(
        registry.add_link_field(project, "Connection", "JiraConnection"),
        Err(MetaError::UnknownTarget { .. })
    ));

    // Registering the target later does not retroactively add the link
    registry
        .define("JiraConnection", |d| {
            d.string("URL")?;
            Ok(())
        })
        .unwrap();
    assert!(matches!(
        registry.finalize_definition(project),
        Err(MetaError::EmptyDefinition { .. })
    ));
}

// =============================================================================
// Plugin lifecycle
// =============================================================================

#[test]
fn test_startup_registers_jira_metanodes() {
    let loaded = host::startup(&JiraTreePlugin).unwrap();
    let catalog = &loaded.catalog;

    assert_eq!(catalog.names(), vec![JIRA_CONNECTION, JIRA_PROJECT]);

    let connection = catalog.get(JIRA_CONNECTION).unwrap();
    assert_eq!(
        connection.field_names(),
        vec![FIELD_URL, FIELD_USERNAME, FIELD_API_TOKEN]
    );

    let project = catalog.get(JIRA_PROJECT).unwrap();
    assert_eq!(project.field_names(), vec![FIELD_CONNECTION, FIELD_KEY, FIELD_JQL]);
    assert_eq!(
        project.fields[0].kind,
        FieldKind::Link {
            target: JIRA_CONNECTION.to_string()
        }
    );

    assert_eq!(catalog.dependents(JIRA_CONNECTION), vec![JIRA_PROJECT]);
    assert!(catalog.dependents(JIRA_PROJECT).is_empty());

    host::shutdown(&JiraTreePlugin, loaded).unwrap();
}

#[test]
fn test_startup_is_repeatable() {
    // Nothing survives between loads; each startup re-registers from scratch
    let first = host::startup(&JiraTreePlugin).unwrap();
    let second = host::startup(&JiraTreePlugin).unwrap();
    assert_eq!(first.catalog.names(), second.catalog.names());
    assert_eq!(
        first.catalog.get(JIRA_PROJECT).unwrap().checksum(),
        second.catalog.get(JIRA_PROJECT).unwrap().checksum()
    );
}

#[test]
fn test_catalog_shared_across_threads() {
    let loaded = host::startup(&JiraTreePlugin).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&loaded.catalog);
            thread::spawn(move || catalog.get(JIRA_PROJECT).map(|d| d.fields.len()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(3));
    }
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_manifest_export() {
    let loaded = host::startup(&JiraTreePlugin).unwrap();
    let manifest = loaded.catalog.manifest(&loaded.descriptor);

    assert_eq!(manifest.plugin, "JiraTree-Metanodes");
    assert_eq!(manifest.version, "1.0.0");
    assert_eq!(manifest.stats.total_schemas, 2);
    assert_eq!(manifest.stats.total_fields, 6);
    assert_eq!(manifest.stats.link_fields, 1);
    assert!(manifest.verify_all());

    let dir = tempdir().unwrap();
    let path = dir.path().join("metanodes.json");
    manifest.save(&path, OutputFormat::Pretty).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let read_back = CatalogManifest::load(&path).unwrap();
    assert!(read_back.verify_all());
    assert_eq!(
        read_back.get_schema(JIRA_PROJECT).unwrap().fields[0],
        FieldDeclaration::link(FIELD_CONNECTION, JIRA_CONNECTION)
    );
    assert!(content.contains("\"kind\": \"link\""));
}

#[test]
fn test_tampered_manifest_fails_verification() {
    let loaded = host::startup(&JiraTreePlugin).unwrap();
    let mut manifest = loaded.catalog.manifest(&loaded.descriptor);
    manifest.schemas[0].fields.pop();
    assert!(!manifest.verify_all());
}

#[test]
fn test_merged_field_names_fail_verification() {
    let loaded = host::startup(&JiraTreePlugin).unwrap();
    let mut manifest = loaded.catalog.manifest(&loaded.descriptor);

    // Fold Key and JQL into one field whose name spells out both
    let project = manifest
        .schemas
        .iter_mut()
        .find(|s| s.name == JIRA_PROJECT)
        .unwrap();
    project.fields.truncate(1);
    project
        .fields
        .push(FieldDeclaration::string("Key:string\nJQL"));

    assert!(!manifest.verify_all());
}

#[test]
fn test_graph_export() {
    let loaded = host::startup(&JiraTreePlugin).unwrap();
    let dot = loaded.catalog.to_dot();
    assert!(dot.contains("\"JiraProject\" -> \"JiraConnection\" [label=\"Connection\"];"));
    assert_eq!(dot.matches("->").count(), 1);
}

#[test]
fn test_descriptor_matches_catalog_manifest() {
    let descriptor = JiraTreePlugin.descriptor();
    let loaded = host::startup(&JiraTreePlugin).unwrap();
    assert_eq!(loaded.descriptor, descriptor);
    assert!(!descriptor.signature.is_empty());
}

#[test]
fn test_manifest_load_errors() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        CatalogManifest::load(dir.path().join("missing.json")),
        Err(MetaError::Io(_))
    ));

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    assert!(matches!(
        CatalogManifest::load(&garbage),
        Err(MetaError::Json(_))
    ));
}
