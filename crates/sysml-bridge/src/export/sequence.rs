//! Sequence diagram exporter
//!
//! Lifelines sit directly on the diagram; execution specifications sit on a
//! lifeline. Both land in the table of the enclosing sequence diagram, and
//! execution specifications record the id of their lifeline.

use async_trait::async_trait;

use super::table::{ComponentRecord, ConnectionRecord, DiagramTables};
use super::{IdTable, OutputArtifacts};
use crate::core::{
    DiagramExporter, DiagramKind, ExportConfig, ExportError, MetaType, ModelHost, NodeId,
};

/// Accumulates sequence diagrams
#[derive(Debug, Default)]
pub struct SequenceExporter {
    sequence_diagrams: DiagramTables,
}

impl SequenceExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enclosing diagram and, for nested elements, the owning lifeline
    fn locate(host: &dyn ModelHost, node: &NodeId) -> (NodeId, Option<NodeId>) {
        let Some(parent) = host.parent(node) else {
            return (NodeId::root(), None);
        };
        if host.meta_type(&parent) == Some(MetaType::LifeLine) {
            let diagram = host.parent(&parent).unwrap_or_else(NodeId::root);
            return (diagram, Some(parent));
        }
        (parent, None)
    }
}

#[async_trait]
impl DiagramExporter for SequenceExporter {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Sequence
    }

    fn add_component(&mut self, host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId) {
        let (diagram, lifeline) = Self::locate(host, node);
        let mut record = ComponentRecord::from_host(host, ids, node);
        if let Some(lifeline_id) = lifeline.as_ref().and_then(|l| ids.get(l)) {
            record = record.with_extra("lifeline", lifeline_id);
        }
        self.sequence_diagrams
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
        let (diagram, _) = Self::locate(host, node);
        self.sequence_diagrams
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
        if self.sequence_diagrams.is_empty() {
            return Ok(());
        }
        artifacts.insert_json(
            self.kind().artifact_name(),
            &self.sequence_diagrams.to_json(ids),
            config,
        )
    }

    fn tables(&self) -> &DiagramTables {
        &self.sequence_diagrams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryGraph;

    #[test]
    fn test_execution_specification_joins_enclosing_diagram() {
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let diagram = graph
            .add_node(&root, MetaType::SequenceDiagram, "login")
            .unwrap();
        let lifeline = graph.add_node(&diagram, MetaType::LifeLine, "user").unwrap();
        let exec = graph
            .add_node(&lifeline, MetaType::ExecutionSpecification, "typing")
            .unwrap();

        let mut ids = IdTable::new();
        let mut exporter = SequenceExporter::new();
        exporter.add_component(&graph, &mut ids, &lifeline);
        exporter.add_component(&graph, &mut ids, &exec);

        assert_eq!(exporter.tables().len(), 1);
        let table = exporter.tables().get(&diagram).unwrap();
        assert_eq!(table.name, "login");
        assert_eq!(table.components.len(), 2);
        assert_eq!(
            table.components[1].extra.get("lifeline"),
            Some(&serde_json::Value::from(ids.get(&lifeline).unwrap()))
        );
    }
}
