//! Parametric diagram importer

use tracing::{info, span, Level};

use super::{
    ComponentCollector, GraphMaterializer, NotationDiagram, NotationIndexer, StereotypeIndexer,
    SysmlDocument,
};
use crate::core::{GraphBuilder, ImportConfig, ImportError, MetaType, NodeId};

/// What one import created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// The new ParametricDiagram node
    pub diagram: NodeId,
    pub components: usize,
    pub children: usize,
    pub connections: usize,
    pub dangling_endpoints: usize,
}

/// Builds a parametric diagram from a model document and its notation
#[derive(Debug, Clone, Default)]
pub struct ParametricDiagramImporter {
    config: ImportConfig,
}

impl ParametricDiagramImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import under `parent`
    ///
    /// Indexing, collection and type resolution all finish before the first
    /// node is created; an error from any of them leaves the graph untouched.
    pub fn build_diagram(
        &self,
        builder: &mut dyn GraphBuilder,
        parent: &NodeId,
        document: &SysmlDocument,
        notation: &NotationDiagram,
    ) -> Result<ImportSummary, ImportError> {
        let model = document.require_model()?;
        let root_id = notation.root_element_id()?;
        let span = span!(Level::INFO, "build_diagram", root = root_id, parent = %parent);
        let _enter = span.enter();

        let positions = NotationIndexer::new().index(notation, root_id)?;
        let stereotypes = StereotypeIndexer::new().index(document, root_id);
        let collected = ComponentCollector::new(&positions, &stereotypes).collect(model, root_id)?;
        let materializer = GraphMaterializer::new();
        let plan = materializer.plan(&collected)?;

        let diagram = builder.create_node(parent, MetaType::ParametricDiagram)?;
        let name = notation
            .name
            .as_deref()
            .unwrap_or(&self.config.diagram_name_fallback);
        builder.set_attribute(&diagram, "name", name)?;
        builder.set_position(&diagram, self.config.diagram_position)?;

        let created = materializer.materialize(builder, &diagram, &plan)?;
        info!(
            diagram = %diagram,
            components = created.components,
            children = created.children,
            connections = created.connections,
            dangling = created.dangling_endpoints,
            "Imported parametric diagram"
        );
        Ok(ImportSummary {
            diagram,
            components: created.components,
            children: created.children,
            connections: created.connections,
            dangling_endpoints: created.dangling_endpoints,
        })
    }
}
