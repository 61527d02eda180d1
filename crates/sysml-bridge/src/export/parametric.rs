//! Parametric diagram exporter
//!
//! Values and constraint blocks become components; connectors between them
//! (or between constraint parameters, which are exported as ports) become
//! connections.

use async_trait::async_trait;

use super::table::{parent_diagram, ComponentRecord, ConnectionRecord, DiagramTables};
use super::{IdTable, OutputArtifacts};
use crate::core::{
    DiagramExporter, DiagramKind, ExportConfig, ExportError, MetaType, ModelHost, NodeId,
};

/// Accumulates parametric diagrams
#[derive(Debug, Default)]
pub struct ParametricExporter {
    parametric_diagrams: DiagramTables,
}

impl ParametricExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiagramExporter for ParametricExporter {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Parametric
    }

    fn add_component(&mut self, host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId) {
        let mut record = ComponentRecord::from_host(host, ids, node);
        if host.meta_type(node) == Some(MetaType::Value) {
            record = record.with_attribute(host, node, "value");
        }
        let diagram = parent_diagram(host, node);
        self.parametric_diagrams
            .table_mut(host, &diagram)
            .components
            .push(record);
    }

    async fn add_connection(
        &mut self,
        host: &dyn ModelHost,
        ids: &mut IdTable,
        node: &NodeId,
    ) -> Result<(), ExportError> {
        let record = ConnectionRecord::resolve(host, ids, node).await?;
        let diagram = parent_diagram(host, node);
        self.parametric_diagrams
            .table_mut(host, &diagram)
            .connections
            .push(record);
        Ok(())
    }

    fn save_results(
        &self,
        ids: &IdTable,
        artifacts: &mut OutputArtifacts,
        config: &ExportConfig,
    ) -> Result<(), ExportError> {
        if self.parametric_diagrams.is_empty() {
            return Ok(());
        }
        artifacts.insert_json(
            self.kind().artifact_name(),
            &self.parametric_diagrams.to_json(ids),
            config,
        )
    }

    fn tables(&self) -> &DiagramTables {
        &self.parametric_diagrams
    }
}
