//! sysml-bridge - Convert between SysML model graphs and Papyrus XMI
//!
//! Two independent pipelines share the vocabulary in [`core`]:
//!
//! - **Export** walks a host model graph, classifies every node into a
//!   diagram kind and writes per-diagram component and connection tables.
//! - **Import** reads a Papyrus UML model with its notation diagram and
//!   materializes a parametric diagram into a host graph.
//!
//! # Quick Start
//!
//! ```rust
//! use sysml_bridge::prelude::*;
//!
//! let mut graph = MemoryGraph::new();
//! let root = graph.root();
//! let diagram = graph.add_node(&root, MetaType::ParametricDiagram, "Params").unwrap();
//! graph.add_node(&diagram, MetaType::Value, "mass").unwrap();
//!
//! let artifacts = sysml_bridge::export_model(&graph, &root, &ExportConfig::default()).unwrap();
//! assert!(artifacts.get("parametric.json").unwrap().contains("mass"));
//! ```

pub mod core;
pub mod export;
pub mod import;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Classification, DiagramExporter, DiagramKind, ExportConfig, GraphBuilder, ImportConfig,
        MemoryGraph, MetaType, ModelHost, NodeId, Position, Role,
    };
    pub use crate::export::{
        ExportSession, GraphWalker, NodeClassifier, OutputArtifacts, ResultWriter,
    };
    pub use crate::import::{
        ImportSummary, NotationDiagram, ParametricDiagramImporter, SysmlDocument,
    };
}

/// Export everything under `root` into serialized artifacts
///
/// Blocks the current thread until the walk completes. When any node failed,
/// the error lists every failure and nothing is returned.
///
/// # Example
/// ```rust
/// use sysml_bridge::{export_model, ExportConfig, MemoryGraph};
///
/// let graph = MemoryGraph::new();
/// let artifacts = export_model(&graph, &graph.root(), &ExportConfig::default()).unwrap();
/// assert!(artifacts.is_empty());
/// ```
pub fn export_model(
    host: &dyn ModelHost,
    root: &NodeId,
    config: &ExportConfig,
) -> anyhow::Result<export::OutputArtifacts> {
    let artifacts = futures::executor::block_on(export::run_export(host, root, config))?;
    Ok(artifacts)
}

/// Import a parametric diagram from model and notation text
///
/// Each input may be XMI or its JSON form.
pub fn import_parametric(
    builder: &mut dyn GraphBuilder,
    parent: &NodeId,
    model: &str,
    notation: &str,
    config: &ImportConfig,
) -> anyhow::Result<import::ImportSummary> {
    let document = import::SysmlDocument::parse(model)?;
    let notation = import::NotationDiagram::parse(notation)?;
    let importer = import::ParametricDiagramImporter::new(config.clone());
    Ok(importer.build_diagram(builder, parent, &document, &notation)?)
}
