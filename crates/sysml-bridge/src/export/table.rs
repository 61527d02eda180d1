//! Per-diagram accumulation tables
//!
//! Exporters append components and connections here as the walk reaches
//! them. Connection endpoints are kept as host paths and only mapped to
//! integer ids when results are saved, since an endpoint may be visited after
//! the connection that references it.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use super::IdTable;
use crate::core::{ExportError, ModelHost, NodeId};

/// One row of a diagram's component table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub x: f64,
    pub y: f64,
    /// Kind-specific columns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentRecord {
    /// Read a component from the host and assign its id
    pub fn from_host(host: &dyn ModelHost, ids: &mut IdTable, node: &NodeId) -> Self {
        let position = host.position(node).unwrap_or_default();
        Self {
            id: ids.assign(node),
            name: host.attribute(node, "name").unwrap_or_default(),
            type_name: meta_name(host, node),
            x: position.x,
            y: position.y,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Copy a host attribute into an extra column when it is set
    pub fn with_attribute(self, host: &dyn ModelHost, node: &NodeId, attribute: &str) -> Self {
        match host.attribute(node, attribute) {
            Some(value) => self.with_extra(attribute, value),
            None => self,
        }
    }
}

/// A connection with endpoints still expressed as host paths
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRecord {
    pub id: u32,
    pub name: Option<String>,
    pub type_name: String,
    pub src: Option<NodeId>,
    pub dst: Option<NodeId>,
}

impl ConnectionRecord {
    /// Resolve `src`/`dst` through the host and assign the connection's id
    pub async fn resolve(
        host: &dyn ModelHost,
        ids: &mut IdTable,
        node: &NodeId,
    ) -> Result<Self, ExportError> {
        let src = host
            .load_pointer(node, "src")
            .await
            .map_err(|e| ExportError::connection_resolution(node.clone(), e))?;
        let dst = host
            .load_pointer(node, "dst")
            .await
            .map_err(|e| ExportError::connection_resolution(node.clone(), e))?;

        Ok(Self {
            id: ids.assign(node),
            name: host.attribute(node, "name"),
            type_name: meta_name(host, node),
            src,
            dst,
        })
    }

    /// Output row with endpoints mapped to integer ids
    pub fn row(&self, ids: &IdTable) -> ConnectionRow {
        ConnectionRow {
            id: self.id,
            src: self.src.as_ref().and_then(|src| ids.get(src)),
            dst: self.dst.as_ref().and_then(|dst| ids.get(dst)),
            type_name: self.type_name.clone(),
            name: self.name.clone(),
        }
    }
}

/// One row of a diagram's connection table
///
/// An endpoint that never received an id is written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRow {
    pub id: u32,
    pub src: Option<u32>,
    pub dst: Option<u32>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Components and connections of one diagram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramTable {
    pub name: String,
    pub components: Vec<ComponentRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// All tables of one diagram kind, keyed by diagram node
#[derive(Debug, Clone, Default)]
pub struct DiagramTables {
    diagrams: BTreeMap<NodeId, DiagramTable>,
}

impl DiagramTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of a diagram, created on first use
    pub fn table_mut(&mut self, host: &dyn ModelHost, diagram: &NodeId) -> &mut DiagramTable {
        self.diagrams
            .entry(diagram.clone())
            .or_insert_with(|| DiagramTable {
                name: host.attribute(diagram, "name").unwrap_or_default(),
                ..Default::default()
            })
    }

    pub fn get(&self, diagram: &NodeId) -> Option<&DiagramTable> {
        self.diagrams.get(diagram)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &DiagramTable)> {
        self.diagrams.iter()
    }

    /// Number of diagrams
    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.diagrams.values().map(|t| t.components.len()).sum()
    }

    pub fn connection_count(&self) -> usize {
        self.diagrams.values().map(|t| t.connections.len()).sum()
    }

    /// JSON form of every table, one entry per diagram
    pub fn to_json(&self, ids: &IdTable) -> Value {
        let diagrams: Vec<Value> = self
            .diagrams
            .iter()
            .map(|(diagram, table)| {
                let connections: Vec<ConnectionRow> =
                    table.connections.iter().map(|c| c.row(ids)).collect();
                json!({
                    "diagramId": diagram.as_str(),
                    "name": table.name,
                    "components": table.components,
                    "connections": connections,
                })
            })
            .collect();
        Value::Array(diagrams)
    }
}

/// Containing diagram of an element: its parent, or the root for orphans
pub fn parent_diagram(host: &dyn ModelHost, node: &NodeId) -> NodeId {
    host.parent(node).unwrap_or_else(NodeId::root)
}

fn meta_name(host: &dyn ModelHost, node: &NodeId) -> String {
    host.meta_type(node)
        .map(|meta| meta.name().to_string())
        .unwrap_or_default()
}
