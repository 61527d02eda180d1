//! Core exporter trait for per-diagram accumulation
//!
//! Every diagram kind has one exporter. The classifier picks the kind and the
//! session invokes the matching exporter through this trait.

use async_trait::async_trait;

use super::{DiagramKind, ExportConfig, ExportError, ModelHost, NodeId};
use crate::export::{DiagramTables, IdTable, OutputArtifacts};

/// Core trait for diagram exporters
///
/// Exporters own their accumulation tables, keyed by diagram. Integer ids
/// come from the session-wide [`IdTable`], so ids stay dense and unique
/// across all diagram kinds.
///
/// # Example
/// ```
/// use sysml_bridge::core::{DiagramExporter, DiagramKind};
/// use sysml_bridge::export::ParametricExporter;
///
/// let exporter = ParametricExporter::new();
/// assert_eq!(exporter.kind(), DiagramKind::Parametric);
/// assert_eq!(exporter.tables().component_count(), 0);
/// ```
#[async_trait]
pub trait DiagramExporter: Send + Sync {
    /// The diagram kind this exporter accumulates
    fn kind(&self) -> DiagramKind;

    /// Record a component; pure accumulation, no I/O
    ///
    /// Callers check the [`IdTable`] first; the component receives its id here.
    fn add_component(&mut self, host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId);

    /// Record a connection, resolving its endpoints through the host
    async fn add_connection(
        &mut self,
        host: &dyn ModelHost,
        ids: &mut IdTable,
        node: &NodeId,
    ) -> Result<(), ExportError>;

    /// Serialize accumulated tables into `artifacts`
    fn save_results(
        &self,
        ids: &IdTable,
        artifacts: &mut OutputArtifacts,
        config: &ExportConfig,
    ) -> Result<(), ExportError>;

    /// Accumulated tables, keyed by diagram
    fn tables(&self) -> &DiagramTables;
}
