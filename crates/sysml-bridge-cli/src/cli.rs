//! Command-line interface for the sysml-bridge utility
//!
//! Imports Papyrus parametric diagrams into a JSON-persisted model graph and
//! exports model graphs into per-diagram tables.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use sysml_bridge::core::logging::init_logging;
use sysml_bridge::export::{run_export, GraphWalker};
use sysml_bridge::import::{NotationDiagram, ParametricDiagramImporter, SysmlDocument};
use sysml_bridge::{DiagramKind, ExportConfig, ImportConfig, MemoryGraph, NodeId, Position};

/// sysml-bridge - Convert between SysML model graphs and Papyrus XMI
#[derive(Parser)]
#[command(name = "sysml-bridge")]
#[command(about = "Import Papyrus parametric diagrams and export SysML model graphs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a Papyrus parametric diagram into a model graph
    Import {
        /// UML model document (.uml XMI or its JSON form)
        #[arg(short, long)]
        model: PathBuf,

        /// Notation document holding the diagram layout
        #[arg(short, long)]
        notation: PathBuf,

        /// Existing graph to import into; a fresh graph is used otherwise
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Path of the node the diagram is created under (default: root)
        #[arg(long)]
        parent: Option<String>,

        /// Output file for the resulting graph (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Horizontal position of the created diagram node
        #[arg(long, default_value_t = 200.0)]
        diagram_x: f64,

        /// Vertical position of the created diagram node
        #[arg(long, default_value_t = 200.0)]
        diagram_y: f64,
    },

    /// Export a model graph into per-diagram tables
    Export {
        /// Graph file to export (use - for stdin)
        #[arg(short, long)]
        graph: Option<PathBuf>,

        /// Path of the node to walk from (default: root)
        #[arg(long)]
        root: Option<String>,

        /// Directory the artifacts are written to
        #[arg(long)]
        out_dir: PathBuf,

        /// Write compact instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show how every node of a graph is classified
    Classify {
        /// Graph file to classify (use - for stdin)
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },

    /// Show supported diagram kinds
    Kinds {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Main CLI application
pub struct BridgeApp {
    export_config: ExportConfig,
    import_config: ImportConfig,
}

impl BridgeApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default(), ImportConfig::default())
    }

    pub fn with_config(export_config: ExportConfig, import_config: ImportConfig) -> Self {
        Self {
            export_config,
            import_config,
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("SYSML_BRIDGE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("SYSML_BRIDGE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("sysml-bridge v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Import {
                model,
                notation,
                graph,
                parent,
                output,
                diagram_x,
                diagram_y,
            } => {
                let config = self
                    .import_config
                    .clone()
                    .with_diagram_position(Position::new(diagram_x, diagram_y));
                let result = self.import_command(&model, &notation, graph, parent, &config, cli.verbose)?;
                self.write_output(output, &result)
            }
            Commands::Export {
                graph,
                root,
                out_dir,
                compact,
            } => self.export_command(graph, root, &out_dir, compact, cli.verbose),
            Commands::Classify { graph } => {
                let listing = self.classify_command(graph)?;
                self.write_output(None, &listing)
            }
            Commands::Kinds { json } => self.kinds_command(json, cli.verbose),
        }
    }

    /// Handle the import command, returning the resulting graph as JSON
    pub fn import_command(
        &self,
        model: &Path,
        notation: &Path,
        graph: Option<PathBuf>,
        parent: Option<String>,
        config: &ImportConfig,
        verbose: bool,
    ) -> Result<String> {
        let model_text = read_file(model)?;
        let notation_text = read_file(notation)?;
        let document = SysmlDocument::parse(&model_text)
            .with_context(|| format!("Failed to parse model '{}'", model.display()))?;
        let diagram = NotationDiagram::parse(&notation_text)
            .with_context(|| format!("Failed to parse notation '{}'", notation.display()))?;

        let mut target = match graph {
            Some(path) => MemoryGraph::from_json(&read_file(&path)?)?,
            None => MemoryGraph::new(),
        };
        let parent = parent.map(NodeId::from).unwrap_or_else(NodeId::root);
        if !target.contains(&parent) {
            return Err(anyhow!("Parent node '{}' does not exist in the graph", parent));
        }

        let summary = ParametricDiagramImporter::new(config.clone()).build_diagram(
            &mut target,
            &parent,
            &document,
            &diagram,
        )?;

        if verbose {
            eprintln!(
                "Imported {} components, {} children and {} connections into {}",
                summary.components, summary.children, summary.connections, summary.diagram
            );
        }
        if summary.dangling_endpoints > 0 {
            eprintln!(
                "Warning: {} connector endpoint(s) could not be resolved",
                summary.dangling_endpoints
            );
        }
        Ok(target.to_json()?)
    }

    /// Handle the export command
    pub fn export_command(
        &self,
        graph: Option<PathBuf>,
        root: Option<String>,
        out_dir: &Path,
        compact: bool,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(graph)?;
        let model = MemoryGraph::from_json(&content)?;
        let root = root.map(NodeId::from).unwrap_or_else(NodeId::root);
        let config = self.export_config.with_pretty(!compact);

        let artifacts = futures::executor::block_on(run_export(&model, &root, &config))?;
        let written = artifacts.write_to_dir(out_dir)?;
        info!(count = written.len(), dir = %out_dir.display(), "Export written");

        if verbose {
            for path in &written {
                eprintln!("Wrote {}", path.display());
            }
        }
        Ok(())
    }

    /// Handle the classify command, one line per non-root node
    pub fn classify_command(&self, graph: Option<PathBuf>) -> Result<String> {
        let content = self.read_input(graph)?;
        let model = MemoryGraph::from_json(&content)?;
        let walker = GraphWalker::new();

        let mut lines = Vec::new();
        for (id, node) in model.iter().filter(|(id, _)| !id.is_root()) {
            let classification = walker.classify_node(&model, id);
            lines.push(format!(
                "{}\t{}\t{}",
                id,
                node.name().unwrap_or("-"),
                classification
            ));
        }
        Ok(lines.join("\n"))
    }

    /// Handle the kinds command
    fn kinds_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported diagram kinds");
        }

        if json {
            let kinds: Vec<_> = DiagramKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "name": kind.slug(),
                        "diagram": kind.diagram_meta_type().name(),
                        "artifact": kind.artifact_name(),
                        "import": *kind == DiagramKind::Parametric,
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "supported_kinds": kinds,
                "total": DiagramKind::ALL.len()
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Supported diagram kinds:");
            for kind in DiagramKind::ALL {
                let direction = if *kind == DiagramKind::Parametric {
                    "import, export"
                } else {
                    "export"
                };
                println!("  {:<15} - {} ({})", kind.slug(), kind.diagram_meta_type(), direction);
            }
            println!();
            println!("Total: {} diagram kinds supported", DiagramKind::ALL.len());
        }

        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => read_file(&path),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for BridgeApp {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e))
}
