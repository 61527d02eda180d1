//! Export pipeline
//!
//! Walks a host graph, classifies every node and accumulates per-diagram
//! component and connection tables that are finally serialized into one
//! artifact per diagram kind.

mod classifier;
mod internal_block;
mod parametric;
mod requirement;
mod sequence;
mod session;
mod table;
mod usecase;
mod walker;
mod writer;

pub use classifier::NodeClassifier;
pub use internal_block::InternalBlockExporter;
pub use parametric::ParametricExporter;
pub use requirement::RequirementExporter;
pub use sequence::SequenceExporter;
pub use session::{ExportSession, Exporters, IdTable, PortDescriptor, PortTable};
pub use table::{
    parent_diagram, ComponentRecord, ConnectionRecord, ConnectionRow, DiagramTable, DiagramTables,
};
pub use usecase::UseCaseExporter;
pub use walker::{GraphWalker, WalkSummary};
pub use writer::{OutputArtifacts, ResultWriter, PORTS_ARTIFACT};

use tracing::{info_span, Instrument};

use crate::core::{ExportConfig, ExportErrors, ModelHost, NodeId};

/// Walk everything under `root` and serialize the results
///
/// Nothing is saved when the walk recorded errors; all of them are returned
/// together instead.
pub async fn run_export(
    host: &dyn ModelHost,
    root: &NodeId,
    config: &ExportConfig,
) -> Result<OutputArtifacts, ExportErrors> {
    let mut session = ExportSession::new();
    GraphWalker::new()
        .visit_from_node(host, root, &mut session)
        .instrument(info_span!("run_export", root = %root))
        .await?;
    ResultWriter::new(*config)
        .collect(&session)
        .map_err(ExportErrors::from)
}
