//! Metanodes CLI
//!
//! Loads the JiraTree plugin the way the host does and inspects the
//! registered metanodes.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use jiratree_metanodes::config::OutputFormat;
use jiratree_metanodes::schema::FieldKind;
use jiratree_metanodes::{host, JiraTreePlugin, LoadedPlugin, MetanodesConfig, Plugin};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metanodes")]
#[command(about = "Inspect the metanodes registered by the JiraTree plugin")]
#[command(version)]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show plugin name and version
    Describe {
        /// Also print the license signature
        #[arg(long)]
        signature: bool,
    },

    /// List registered metanodes
    List,

    /// Show the fields of one metanode
    Show {
        /// Metanode name
        name: String,
    },

    /// Fuzzy search metanode names
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export the link graph in DOT format
    Graph {
        /// Output file (defaults to export.graph_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the metanode manifest as JSON
    Export {
        /// Output file (defaults to export.manifest_path, "-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compact JSON regardless of config
        #[arg(long)]
        compact: bool,
    },

    /// View or create configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as TOML (default)
        #[arg(long, conflicts_with = "json")]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default config file
    Init {
        #[arg(short, long, default_value = "metanodes.toml")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match MetanodesConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Fatal on any registration error, like the host's startup
fn load_plugin() -> anyhow::Result<LoadedPlugin> {
    host::startup(&JiraTreePlugin).context("plugin startup failed")
}

fn run(command: Commands, mut config: MetanodesConfig) -> anyhow::Result<()> {
    match command {
        Commands::Describe { signature } => {
            let descriptor = JiraTreePlugin.descriptor();
            println!("{} {}", descriptor.name, descriptor.version);
            if signature {
                println!("{}", descriptor.signature.as_str());
            }
        }

        Commands::List => {
            let loaded = load_plugin()?;
            println!("📦 {} v{}", loaded.descriptor.name, loaded.descriptor.version);
            for def in loaded.catalog.iter() {
                let links = def.links().count();
                println!("  {} ({} fields, {} links)", def.name, def.fields.len(), links);
            }
        }

        Commands::Show { name } => {
            let loaded = load_plugin()?;
            let Some(def) = loaded.catalog.get(&name) else {
                let suggestions: Vec<String> = loaded
                    .catalog
                    .search(&name, 3)
                    .into_iter()
                    .map(|hit| hit.name)
                    .collect();
                if suggestions.is_empty() {
                    bail!("unknown metanode '{}'", name);
                }
                bail!(
                    "unknown metanode '{}' (did you mean: {}?)",
                    name,
                    suggestions.join(", ")
                );
            };

            println!("{} [{}]", def.name, def.checksum());
            for field in &def.fields {
                match &field.kind {
                    FieldKind::String => println!("  {:<12} string", field.name),
                    FieldKind::Link { target } => {
                        println!("  {:<12} link -> {}", field.name, target)
                    }
                }
            }
            let dependents = loaded.catalog.dependents(&def.name);
            if !dependents.is_empty() {
                println!("  linked from: {}", dependents.join(", "));
            }
        }

        Commands::Search { query, limit } => {
            let loaded = load_plugin()?;
            let hits = loaded
                .catalog
                .search(&query, limit.unwrap_or(config.search.limit));
            if hits.is_empty() {
                println!("No metanodes match '{}'", query);
            }
            for hit in hits {
                println!("  {:>4}  {} ({} fields)", hit.score, hit.name, hit.fields);
            }
        }

        Commands::Graph { output } => {
            let loaded = load_plugin()?;
            let path = output.unwrap_or(config.export.graph_path);
            std::fs::write(&path, loaded.catalog.to_dot())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("✅ Exported DOT to: {:?}", path);
        }

        Commands::Export { output, compact } => {
            let loaded = load_plugin()?;
            if compact {
                config.export.output_format = OutputFormat::Compact;
            }
            let manifest = loaded.catalog.manifest(&loaded.descriptor);

            let path = output.unwrap_or_else(|| config.export.manifest_path.clone());
            if path.as_os_str() == "-" {
                println!("{}", config.render_json(&manifest)?);
            } else {
                manifest
                    .save(&path, config.export.output_format)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!(
                    "✅ Exported {} metanodes to {:?} ({})",
                    manifest.stats.total_schemas, path, manifest.manifest_checksum
                );
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show { toml: _, json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigCommands::Init { output } => {
                if std::path::Path::new(&output).exists() {
                    bail!("{} already exists", output);
                }
                MetanodesConfig::default().save(&output)?;
                println!("✅ Wrote default configuration to {}", output);
            }
        },
    }

    Ok(())
}
