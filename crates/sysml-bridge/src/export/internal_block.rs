//! Internal block diagram exporter

use async_trait::async_trait;

use super::table::{parent_diagram, ComponentRecord, ConnectionRecord, DiagramTables};
use super::{IdTable, OutputArtifacts};
use crate::core::{
    DiagramExporter, DiagramKind, ExportConfig, ExportError, MetaType, ModelHost, NodeId,
};

/// Accumulates internal block diagrams
///
/// Parts, properties and flow ports drawn on the diagram are components;
/// connectors are connections. Flow ports keep their `direction` attribute.
#[derive(Debug, Default)]
pub struct InternalBlockExporter {
    internal_block_diagrams: DiagramTables,
}

impl InternalBlockExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiagramExporter for InternalBlockExporter {
    fn kind(&self) -> DiagramKind {
        DiagramKind::InternalBlock
    }

    fn add_component(&mut self, host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId) {
        let mut record = ComponentRecord::from_host(host, ids, node);
        if host.meta_type(node) == Some(MetaType::FlowPort) {
            record = record.with_attribute(host, node, "direction");
        }
        let diagram = parent_diagram(host, node);
        self.internal_block_diagrams
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
        self.internal_block_diagrams
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
        if self.internal_block_diagrams.is_empty() {
            return Ok(());
        }
        artifacts.insert_json(
            self.kind().artifact_name(),
            &self.internal_block_diagrams.to_json(ids),
            config,
        )
    }

    fn tables(&self) -> &DiagramTables {
        &self.internal_block_diagrams
    }
}
