//! Use case diagram exporter

use async_trait::async_trait;

use super::table::{parent_diagram, ComponentRecord, ConnectionRecord, DiagramTables};
use super::{IdTable, OutputArtifacts};
use crate::core::{DiagramExporter, DiagramKind, ExportConfig, ExportError, ModelHost, NodeId};

/// Accumulates use case diagrams
///
/// Actors and use cases are components. Use case links (include, extend,
/// plain associations) are connections whose `type` column names the link
/// kind.
#[derive(Debug, Default)]
pub struct UseCaseExporter {
    usecase_diagrams: DiagramTables,
}

impl UseCaseExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiagramExporter for UseCaseExporter {
    fn kind(&self) -> DiagramKind {
        DiagramKind::UseCase
    }

    fn add_component(&mut self, host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId) {
        let record = ComponentRecord::from_host(host, ids, node);
        let diagram = parent_diagram(host, node);
        self.usecase_diagrams
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
        self.usecase_diagrams
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
        if self.usecase_diagrams.is_empty() {
            return Ok(());
        }
        artifacts.insert_json(
            self.kind().artifact_name(),
            &self.usecase_diagrams.to_json(ids),
            config,
        )
    }

    fn tables(&self) -> &DiagramTables {
        &self.usecase_diagrams
    }
}
