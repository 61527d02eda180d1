//! Component collector
//!
//! Flattens the packaged elements of a UML model into diagram components,
//! per-parent children and connectors, with positions and refined types
//! already resolved.

use std::collections::HashMap;
use tracing::{debug, span, trace, Level};

use super::document::{OwnedAttribute, OwnedConnector, UmlModel};
use super::{NotationIndex, StereotypeIndex};
use crate::core::{ImportError, Position};

const ASSOCIATION: &str = "Association";

/// A diagram element to be created
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    /// Lookup id: the declared id of a typed top-level attribute, the XMI id
    /// otherwise
    pub id: String,
    pub xmi_id: String,
    pub name: String,
    /// Refined type name, not yet checked against the meta-types
    pub type_name: String,
    pub position: Position,
}

/// A child shares the component shape; its id is always its XMI id
pub type ChildDescriptor = ComponentDescriptor;

/// A connector with both endpoint roles present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorDescriptor {
    pub name: Option<String>,
    pub src: String,
    pub dst: String,
}

/// Everything gathered from one model
#[derive(Debug, Clone, Default)]
pub struct CollectedModel {
    pub components: Vec<ComponentDescriptor>,
    /// Children keyed by the XMI id of the element that owns them
    pub children: HashMap<String, Vec<ChildDescriptor>>,
    /// XMI id → declared id, for attributes that carry both
    pub xmi_id_to_id: HashMap<String, String>,
    pub connectors: Vec<ConnectorDescriptor>,
}

impl CollectedModel {
    /// Children recorded under `id`, in document order
    pub fn children_of(&self, id: &str) -> &[ChildDescriptor] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look an endpoint role up as a direct id, then through the XMI bridge
    pub fn bridge<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a str> {
        std::iter::once(role).chain(self.xmi_id_to_id.get(role).map(String::as_str))
    }
}

/// Walks packaged elements using the notation and stereotype indexes
#[derive(Debug, Clone, Copy)]
pub struct ComponentCollector<'a> {
    notation: &'a NotationIndex,
    stereotypes: &'a StereotypeIndex,
}

impl<'a> ComponentCollector<'a> {
    pub fn new(notation: &'a NotationIndex, stereotypes: &'a StereotypeIndex) -> Self {
        Self {
            notation,
            stereotypes,
        }
    }

    /// Collect components, children and connectors
    ///
    /// Owned attributes of the root element become top-level components.
    /// Owned attributes of any other element become children of that
    /// element. Association elements contribute no attributes.
    pub fn collect(&self, model: &UmlModel, root_id: &str) -> Result<CollectedModel, ImportError> {
        let span = span!(Level::INFO, "collect_components", root = root_id);
        let _enter = span.enter();

        let mut collected = CollectedModel::default();
        for element in &model.packaged_elements {
            for connector in &element.owned_connectors {
                collected.connectors.push(connector_descriptor(connector)?);
            }

            if element.uml_type() == ASSOCIATION || element.owned_attributes.is_empty() {
                continue;
            }

            let scope = match element.xmi_id.as_deref() {
                Some(id) if id == root_id => None,
                Some(id) => {
                    collected.children.entry(id.to_string()).or_default();
                    Some(id)
                }
                None => {
                    return Err(ImportError::malformed(
                        "packaged element with owned attributes has no xmi:id",
                    ))
                }
            };

            for attribute in &element.owned_attributes {
                self.collect_attribute(attribute, scope, &mut collected)?;
            }
        }

        debug!(
            components = collected.components.len(),
            scopes = collected.children.len(),
            connectors = collected.connectors.len(),
            "Collected model"
        );
        Ok(collected)
    }

    fn collect_attribute(
        &self,
        attribute: &OwnedAttribute,
        scope: Option<&str>,
        collected: &mut CollectedModel,
    ) -> Result<(), ImportError> {
        let Some(name) = attribute.name.as_deref().filter(|name| !name.is_empty()) else {
            trace!(xmi_id = ?attribute.xmi_id, "Dropped unnamed attribute");
            return Ok(());
        };
        let xmi_id = attribute
            .xmi_id
            .as_deref()
            .ok_or_else(|| ImportError::malformed(format!("attribute '{}' has no xmi:id", name)))?;
        let declared_id = attribute.declared_id.as_deref();
        if let Some(declared) = declared_id {
            collected
                .xmi_id_to_id
                .insert(xmi_id.to_string(), declared.to_string());
        }

        let position = self.notation.require(xmi_id)?;
        let uml_type = attribute.uml_type();

        match scope {
            Some(parent) => {
                let child = ChildDescriptor {
                    id: xmi_id.to_string(),
                    xmi_id: xmi_id.to_string(),
                    name: name.to_string(),
                    type_name: self.refined_type(&[xmi_id], uml_type),
                    position,
                };
                trace!(parent, child = %child.id, type_name = %child.type_name, "Collected child");
                collected
                    .children
                    .entry(parent.to_string())
                    .or_default()
                    .push(child);
            }
            None => {
                let lookups: Vec<&str> = declared_id.into_iter().chain([xmi_id]).collect();
                let component = ComponentDescriptor {
                    id: declared_id.unwrap_or(xmi_id).to_string(),
                    xmi_id: xmi_id.to_string(),
                    name: name.to_string(),
                    type_name: self.refined_type(&lookups, uml_type),
                    position,
                };
                trace!(component = %component.id, type_name = %component.type_name, "Collected component");
                collected.components.push(component);
            }
        }
        Ok(())
    }

    /// First stereotype found under `ids`, else the UML type
    fn refined_type(&self, ids: &[&str], uml_type: &str) -> String {
        ids.iter()
            .find_map(|id| self.stereotypes.get(id))
            .map(|meta| meta.name().to_string())
            .unwrap_or_else(|| uml_type.to_string())
    }
}

fn connector_descriptor(connector: &OwnedConnector) -> Result<ConnectorDescriptor, ImportError> {
    let label = connector
        .xmi_id
        .as_deref()
        .or(connector.name.as_deref())
        .unwrap_or("<unnamed>");
    let role = |index: usize| {
        connector
            .ends
            .get(index)
            .and_then(|end| end.role.clone())
            .ok_or_else(|| {
                ImportError::invalid_connector(format!(
                    "connector {} has no role on end {}",
                    label, index
                ))
            })
    };
    Ok(ConnectorDescriptor {
        name: connector.name.clone(),
        src: role(0)?,
        dst: role(1)?,
    })
}
