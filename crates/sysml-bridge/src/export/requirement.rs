//! Requirement diagram exporter

use async_trait::async_trait;

use super::table::{parent_diagram, ComponentRecord, ConnectionRecord, DiagramTables};
use super::{IdTable, OutputArtifacts};
use crate::core::{DiagramExporter, DiagramKind, ExportConfig, ExportError, ModelHost, NodeId};

/// Requirement attributes copied into the component table when set, with the
/// column each lands in; `id` is already taken by the dense integer id
const REQUIREMENT_ATTRIBUTES: &[(&str, &str)] = &[("id", "reqId"), ("text", "text")];

/// Accumulates requirement diagrams
#[derive(Debug, Default)]
pub struct RequirementExporter {
    requirement_diagrams: DiagramTables,
}

impl RequirementExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiagramExporter for RequirementExporter {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Requirement
    }

    fn add_component(&mut self, host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId) {
        let record = REQUIREMENT_ATTRIBUTES
            .iter()
            .fold(ComponentRecord::from_host(host, ids, node), |record, (attr, column)| {
                match host.attribute(node, attr) {
                    Some(value) => record.with_extra(column, value),
                    None => record,
                }
            });
        let diagram = parent_diagram(host, node);
        self.requirement_diagrams
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
        self.requirement_diagrams
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
        if self.requirement_diagrams.is_empty() {
            return Ok(());
        }
        artifacts.insert_json(
            self.kind().artifact_name(),
            &self.requirement_diagrams.to_json(ids),
            config,
        )
    }

    fn tables(&self) -> &DiagramTables {
        &self.requirement_diagrams
    }
}
