//! Frozen metanode catalog
//!
//! Read-only view produced by [`SchemaRegistry::freeze`](crate::SchemaRegistry::freeze).
//! It has no mutating API and is safe to share between threads behind an `Arc`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::config::OutputFormat;
use crate::error::{MetaError, Result};
use crate::plugin::PluginDescriptor;
use crate::schema::{FieldDeclaration, SchemaDefinition};

/// Immutable set of finalized metanodes, in registration order
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    definitions: Vec<SchemaDefinition>,
    by_name: HashMap<String, usize>,
}

/// One link field: `source.field -> target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub source: String,
    pub field: String,
    pub target: String,
}

/// Fuzzy search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub fields: usize,
    pub score: i64,
}

impl SchemaCatalog {
    pub(crate) fn new(definitions: Vec<SchemaDefinition>) -> Self {
        let by_name = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.clone(), i))
            .collect();
        Self {
            definitions,
            by_name,
        }
    }

    /// Get a metanode by name
    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    /// Get a metanode by name, or `NotFound`
    pub fn require(&self, name: &str) -> Result<&SchemaDefinition> {
        self.get(name).ok_or_else(|| MetaError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Every link field across the catalog
    pub fn links(&self) -> Vec<LinkRef> {
        self.definitions
            .iter()
            .flat_map(|def| {
                def.links().filter_map(move |field| {
                    field.link_target().map(|target| LinkRef {
                        source: def.name.clone(),
                        field: field.name.clone(),
                        target: target.to_string(),
                    })
                })
            })
            .collect()
    }

    /// Metanodes that hold a link to `name`
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        let (graph, index) = self.link_graph();
        let Some(&node) = index.get(name) else {
            return Vec::new();
        };

        let mut dependents: Vec<&str> = graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| graph[edge.source()])
            .collect();
        dependents.sort_by_key(|n| self.by_name.get(*n).copied());
        dependents.dedup();
        dependents
    }

    /// Search metanodes by name (fuzzy)
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<(i64, &SchemaDefinition)> = self
            .definitions
            .iter()
            .filter_map(|def| matcher.fuzzy_match(&def.name, query).map(|s| (s, def)))
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.0.cmp(&a.0));

        results
            .into_iter()
            .take(limit)
            .map(|(score, def)| SearchResult {
                name: def.name.clone(),
                fields: def.fields.len(),
                score,
            })
            .collect()
    }

    /// Link graph: one node per metanode, one edge per link field
    pub fn link_graph(&self) -> (DiGraph<&str, &str>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for def in &self.definitions {
            index.insert(def.name.as_str(), graph.add_node(def.name.as_str()));
        }
        for def in &self.definitions {
            for field in def.links() {
                if let Some(target) = field.link_target() {
                    // Targets were finalized before the link was added
                    if let Some(&to) = index.get(target) {
                        graph.add_edge(index[def.name.as_str()], to, field.name.as_str());
                    }
                }
            }
        }

        (graph, index)
    }

    /// Export the link graph to DOT format
    pub fn to_dot(&self) -> String {
        let (graph, _) = self.link_graph();
        let mut output = String::new();

        output.push_str("digraph Metanodes {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=record, fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        for def in &self.definitions {
            let fields: Vec<String> = def
                .fields
                .iter()
                .map(|f| format!("{} : {}", escape_record(&f.name), f.kind.label()))
                .collect();
            output.push_str(&format!(
                "  \"{}\" [label=\"{{{}|{}}}\"];\n",
                escape_id(&def.name),
                escape_record(&def.name),
                fields.join("\\l")
            ));
        }

        output.push('\n');

        for edge in graph.edge_references() {
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape_id(graph[edge.source()]),
                escape_id(graph[edge.target()]),
                escape_id(edge.weight())
            ));
        }

        output.push_str("}\n");
        output
    }

    /// Snapshot the catalog for export
    pub fn manifest(&self, descriptor: &PluginDescriptor) -> CatalogManifest {
        let schemas: Vec<ManifestEntry> = self
            .definitions
            .iter()
            .map(|def| ManifestEntry {
                name: def.name.clone(),
                fields: def.fields.clone(),
                checksum: def.checksum(),
            })
            .collect();
        let manifest_checksum = Checksum::combine(schemas.iter().map(|s| &s.checksum));

        CatalogManifest {
            plugin: descriptor.name.clone(),
            version: descriptor.version.to_string(),
            generated_at: Utc::now(),
            stats: ManifestStats {
                total_schemas: schemas.len(),
                total_fields: schemas.iter().map(|s| s.fields.len()).sum(),
                link_fields: self.links().len(),
            },
            schemas,
            manifest_checksum,
        }
    }
}

/// Escape a string for use inside a quoted DOT identifier
fn escape_id(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a string for a DOT record label, where braces, bars and angle
/// brackets are structural
fn escape_record(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in escape_id(s).chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Exported description of every registered metanode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// Plugin that registered the metanodes
    pub plugin: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub schemas: Vec<ManifestEntry>,
    /// Checksum over all entry checksums, in order
    pub manifest_checksum: Checksum,
    pub stats: ManifestStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
    pub checksum: Checksum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestStats {
    pub total_schemas: usize,
    pub total_fields: usize,
    pub link_fields: usize,
}

impl CatalogManifest {
    /// Write the manifest as JSON
    pub fn save(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let content = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Read a manifest written by [`CatalogManifest::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Get an entry by name
    pub fn get_schema(&self, name: &str) -> Option<&ManifestEntry> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Recompute every checksum and compare
    pub fn verify_all(&self) -> bool {
        let entries_ok = self.schemas.iter().all(|entry| {
            let mut def = SchemaDefinition::open(entry.name.clone());
            def.fields = entry.fields.clone();
            entry.checksum.verify(&def)
        });
        let combined = Checksum::combine(self.schemas.iter().map(|s| &s.checksum));
        entries_ok && combined == self.manifest_checksum
    }
}
