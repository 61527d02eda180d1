//! Graph materializer
//!
//! Creates host nodes for a collected model in three passes: components
//! under the diagram, children under their component, then connectors once
//! every endpoint candidate exists.

use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, span, trace, warn, Level};

use super::collector::{ChildDescriptor, CollectedModel, ComponentDescriptor};
use crate::core::{GraphBuilder, ImportError, MetaType, NodeId};

/// A component checked against the meta-types, with its children
#[derive(Debug, Clone)]
pub struct PlannedComponent<'a> {
    pub descriptor: &'a ComponentDescriptor,
    pub meta: MetaType,
    pub children: Vec<(&'a ChildDescriptor, MetaType)>,
}

/// Validated work for one import
///
/// Building a plan performs every check that can fail on document content,
/// so applying it only fails if the host itself refuses a write.
#[derive(Debug, Clone)]
pub struct MaterializePlan<'a> {
    components: Vec<PlannedComponent<'a>>,
    collected: &'a CollectedModel,
}

impl<'a> MaterializePlan<'a> {
    pub fn components(&self) -> &[PlannedComponent<'a>] {
        &self.components
    }

    pub fn connector_count(&self) -> usize {
        self.collected.connectors.len()
    }
}

/// Counts of what was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub components: usize,
    pub children: usize,
    pub connections: usize,
    /// Connector ends left unset because no node matched their role
    pub dangling_endpoints: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphMaterializer;

impl GraphMaterializer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve every type name up front
    pub fn plan<'a>(&self, collected: &'a CollectedModel) -> Result<MaterializePlan<'a>, ImportError> {
        let components = collected
            .components
            .iter()
            .map(|descriptor| -> Result<PlannedComponent<'a>, ImportError> {
                let children = collected
                    .children_of(&descriptor.id)
                    .iter()
                    .map(|child| -> Result<_, ImportError> {
                        Ok((child, resolve_meta(&child.type_name)?))
                    })
                    .collect::<Result<Vec<_>, ImportError>>()?;
                Ok(PlannedComponent {
                    descriptor,
                    meta: resolve_meta(&descriptor.type_name)?,
                    children,
                })
            })
            .collect::<Result<Vec<_>, ImportError>>()?;

        Ok(MaterializePlan {
            components,
            collected,
        })
    }

    /// Create the planned nodes under `diagram`
    pub fn materialize(
        &self,
        builder: &mut dyn GraphBuilder,
        diagram: &NodeId,
        plan: &MaterializePlan<'_>,
    ) -> Result<MaterializeSummary, ImportError> {
        let span = span!(Level::INFO, "materialize", diagram = %diagram);
        let _enter = span.enter();

        let mut summary = MaterializeSummary::default();
        let mut id_to_node: HashMap<&str, NodeId> = HashMap::new();

        for planned in &plan.components {
            let node = create_named(builder, diagram, planned.meta, planned.descriptor)?;
            id_to_node.insert(planned.descriptor.id.as_str(), node.clone());
            summary.components += 1;

            for (child, meta) in &planned.children {
                let child_node = create_named(builder, &node, *meta, child)?;
                id_to_node.insert(child.id.as_str(), child_node);
                summary.children += 1;
            }
        }

        for connector in &plan.collected.connectors {
            let link = builder.create_node(diagram, MetaType::Connector)?;
            if let Some(name) = &connector.name {
                builder.set_attribute(&link, "name", name)?;
            }
            for (role, end) in [("src", &connector.src), ("dst", &connector.dst)] {
                match resolve_endpoint(plan.collected, &id_to_node, end) {
                    Some(target) => builder.set_pointer(&link, role, target)?,
                    None => {
                        warn!(connector = %link, role, end = %end, "Dangling connector endpoint");
                        summary.dangling_endpoints += 1;
                    }
                }
            }
            trace!(connector = %link, src = %connector.src, dst = %connector.dst, "Created connection");
            summary.connections += 1;
        }

        debug!(
            components = summary.components,
            children = summary.children,
            connections = summary.connections,
            dangling = summary.dangling_endpoints,
            "Materialized diagram"
        );
        Ok(summary)
    }
}

fn resolve_meta(type_name: &str) -> Result<MetaType, ImportError> {
    MetaType::from_str(type_name).map_err(|_| ImportError::unknown_type(type_name))
}

fn create_named(
    builder: &mut dyn GraphBuilder,
    parent: &NodeId,
    meta: MetaType,
    descriptor: &ComponentDescriptor,
) -> Result<NodeId, ImportError> {
    let node = builder.create_node(parent, meta)?;
    builder.set_attribute(&node, "name", &descriptor.name)?;
    builder.set_position(&node, descriptor.position)?;
    trace!(node = %node, id = %descriptor.id, %meta, "Created node");
    Ok(node)
}

/// Direct id first, then the declared id bridged from an XMI id
fn resolve_endpoint<'n>(
    collected: &CollectedModel,
    id_to_node: &'n HashMap<&str, NodeId>,
    role: &str,
) -> Option<&'n NodeId> {
    collected.bridge(role).find_map(|id| id_to_node.get(id))
}
