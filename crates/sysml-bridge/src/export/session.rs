//! Export session state
//!
//! An [`ExportSession`] holds everything one export run accumulates: the
//! dense id tables, the port tables, one exporter per diagram kind and the
//! errors recorded along the way. The top-level call owns it and lends it to
//! every visit.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::{
    InternalBlockExporter, ParametricExporter, RequirementExporter, SequenceExporter,
    UseCaseExporter,
};
use crate::core::{DiagramExporter, DiagramKind, ExportError, ExportErrors, ModelHost, NodeId};

/// Host identity ↔ dense integer id
///
/// Ids start at 0 and are handed out in registration order. A node keeps the
/// id it first received.
#[derive(Debug, Clone, Default)]
pub struct IdTable {
    next_id: u32,
    ids: HashMap<NodeId, u32>,
    reverse: HashMap<u32, NodeId>,
}

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.ids.contains_key(node)
    }

    pub fn get(&self, node: &NodeId) -> Option<u32> {
        self.ids.get(node).copied()
    }

    /// Host identity of an id
    pub fn node(&self, id: u32) -> Option<&NodeId> {
        self.reverse.get(&id)
    }

    /// Id of `node`, assigning the next free one on first sight
    pub fn assign(&mut self, node: &NodeId) -> u32 {
        if let Some(id) = self.ids.get(node) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(node.clone(), id);
        self.reverse.insert(id, node.clone());
        trace!(node = %node, id, "Assigned id");
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, u32)> {
        self.ids.iter().map(|(node, id)| (node, *id))
    }
}

/// A port as written to the ports table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortDescriptor {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub x: f64,
    pub y: f64,
}

/// Ports grouped under their parent, plus the port → parent inverse
#[derive(Debug, Clone, Default)]
pub struct PortTable {
    ports: BTreeMap<NodeId, Vec<PortDescriptor>>,
    reverse: HashMap<NodeId, NodeId>,
}

impl PortTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a port under `parent`; the first parent a port is registered
    /// under is the one kept in the inverse table
    pub fn register(&mut self, parent: &NodeId, port: &NodeId, descriptor: PortDescriptor) {
        self.ports
            .entry(parent.clone())
            .or_default()
            .push(descriptor);
        self.reverse
            .entry(port.clone())
            .or_insert_with(|| parent.clone());
    }

    /// Ports of a parent in registration order
    pub fn ports_of(&self, parent: &NodeId) -> &[PortDescriptor] {
        self.ports.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent_of(&self, port: &NodeId) -> Option<&NodeId> {
        self.reverse.get(port)
    }

    /// Total number of ports
    pub fn len(&self) -> usize {
        self.ports.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn parent_count(&self) -> usize {
        self.ports.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &[PortDescriptor])> {
        self.ports.iter().map(|(parent, ports)| (parent, ports.as_slice()))
    }

    /// JSON form: one entry per parent; `parentId` is null when the parent
    /// itself was not exported
    pub fn to_json(&self, ids: &IdTable) -> Value {
        Value::Array(
            self.ports
                .iter()
                .map(|(parent, ports)| {
                    json!({
                        "parentId": ids.get(parent),
                        "parentPath": parent.as_str(),
                        "ports": ports,
                    })
                })
                .collect(),
        )
    }
}

/// One exporter per diagram kind
#[derive(Debug, Default)]
pub struct Exporters {
    usecase: UseCaseExporter,
    requirement: RequirementExporter,
    internal_block: InternalBlockExporter,
    sequence: SequenceExporter,
    parametric: ParametricExporter,
}

impl Exporters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DiagramKind) -> &dyn DiagramExporter {
        match kind {
            DiagramKind::UseCase => &self.usecase,
            DiagramKind::Requirement => &self.requirement,
            DiagramKind::InternalBlock => &self.internal_block,
            DiagramKind::Sequence => &self.sequence,
            DiagramKind::Parametric => &self.parametric,
        }
    }

    pub fn get_mut(&mut self, kind: DiagramKind) -> &mut dyn DiagramExporter {
        match kind {
            DiagramKind::UseCase => &mut self.usecase,
            DiagramKind::Requirement => &mut self.requirement,
            DiagramKind::InternalBlock => &mut self.internal_block,
            DiagramKind::Sequence => &mut self.sequence,
            DiagramKind::Parametric => &mut self.parametric,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DiagramExporter> {
        DiagramKind::ALL.iter().map(move |kind| self.get(*kind))
    }
}

/// State of one export run
#[derive(Debug, Default)]
pub struct ExportSession {
    ids: IdTable,
    ports: PortTable,
    exporters: Exporters,
    errors: Vec<ExportError>,
    visited: usize,
}

impl ExportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &IdTable {
        &self.ids
    }

    pub fn ports(&self) -> &PortTable {
        &self.ports
    }

    pub fn exporters(&self) -> &Exporters {
        &self.exporters
    }

    pub fn exporter(&self, kind: DiagramKind) -> &dyn DiagramExporter {
        self.exporters.get(kind)
    }

    /// Number of nodes visited so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn errors(&self) -> &[ExportError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn record_visit(&mut self) {
        self.visited += 1;
    }

    pub fn record_error(&mut self, error: ExportError) {
        debug!(%error, "Recorded export error");
        self.errors.push(error);
    }

    /// Drain the recorded errors
    pub fn take_errors(&mut self) -> ExportErrors {
        ExportErrors::new(std::mem::take(&mut self.errors))
    }

    /// Hand a component to its diagram's exporter unless it already has an id
    ///
    /// Returns whether the component was added.
    pub fn add_component(&mut self, host: &dyn ModelHost, kind: DiagramKind, node: &NodeId) -> bool {
        if self.ids.contains(node) {
            return false;
        }
        self.exporters
            .get_mut(kind)
            .add_component(host, &mut self.ids, node);
        true
    }

    /// Hand a connection to its diagram's exporter unless it already has an id
    pub async fn add_connection(
        &mut self,
        host: &dyn ModelHost,
        kind: DiagramKind,
        node: &NodeId,
    ) -> Result<bool, ExportError> {
        if self.ids.contains(node) {
            return Ok(false);
        }
        self.exporters
            .get_mut(kind)
            .add_connection(host, &mut self.ids, node)
            .await?;
        Ok(true)
    }

    /// Register a port under its parent
    ///
    /// No state changes when the parent is not a valid owner for this kind of
    /// port, when the port already has an id, or when it has no parent.
    pub fn add_child_port(&mut self, host: &dyn ModelHost, node: &NodeId, valid_parent: bool) -> bool {
        if !valid_parent || self.ids.contains(node) {
            return false;
        }
        let Some(parent) = host.parent(node) else {
            return false;
        };

        let position = host.position(node).unwrap_or_default();
        let descriptor = PortDescriptor {
            id: self.ids.assign(node),
            name: host.attribute(node, "name").unwrap_or_default(),
            type_name: host
                .meta_type(node)
                .map(|meta| meta.name().to_string())
                .unwrap_or_default(),
            x: position.x,
            y: position.y,
        };
        trace!(port = %node, parent = %parent, id = descriptor.id, "Registered port");
        self.ports.register(&parent, node, descriptor);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GraphBuilder, MemoryGraph, MetaType, Position};

    #[test]
    fn test_assign_is_idempotent() {
        let mut ids = IdTable::new();
        let a = NodeId::new("/1");
        let b = NodeId::new("/2");
        assert_eq!(ids.assign(&a), 0);
        assert_eq!(ids.assign(&b), 1);
        assert_eq!(ids.assign(&a), 0);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.node(1), Some(&b));
    }

    #[test]
    fn test_add_child_port_records_descriptor() {
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let block = graph.add_node(&root, MetaType::Block, "engine").unwrap();
        let port = graph.add_node(&block, MetaType::FlowPort, "fuel").unwrap();
        graph.set_position(&port, Position::new(3.0, 7.0)).unwrap();

        let mut session = ExportSession::new();
        assert!(session.add_child_port(&graph, &port, true));
        assert!(!session.add_child_port(&graph, &port, true));

        let ports = session.ports().ports_of(&block);
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].name, "fuel");
        assert_eq!(ports[0].type_name, "FlowPort");
        assert_eq!((ports[0].x, ports[0].y), (3.0, 7.0));
        assert_eq!(session.ports().parent_of(&port), Some(&block));
        assert_eq!(session.ids().get(&port), Some(ports[0].id));
    }

    #[test]
    fn test_add_child_port_invalid_parent_is_noop() {
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let package = graph.add_node(&root, MetaType::Package, "pkg").unwrap();
        let port = graph.add_node(&package, MetaType::FlowPort, "loose").unwrap();

        let mut session = ExportSession::new();
        assert!(!session.add_child_port(&graph, &port, false));
        assert!(session.ports().is_empty());
        assert!(session.ids().is_empty());
    }

    #[test]
    fn test_add_component_guarded_by_id_table() {
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let diagram = graph.add_node(&root, MetaType::ParametricDiagram, "pd").unwrap();
        let value = graph.add_node(&diagram, MetaType::Value, "v").unwrap();

        let mut session = ExportSession::new();
        assert!(session.add_component(&graph, DiagramKind::Parametric, &value));
        assert!(!session.add_component(&graph, DiagramKind::Parametric, &value));
        assert_eq!(session.exporter(DiagramKind::Parametric).tables().component_count(), 1);
        assert_eq!(session.ids().len(), 1);
    }

    #[test]
    fn test_ports_json_marks_unexported_parent() {
        let mut graph = MemoryGraph::new();
        let root = graph.root();
        let block = graph.add_node(&root, MetaType::Block, "engine").unwrap();
        let port = graph.add_node(&block, MetaType::FlowPort, "fuel").unwrap();

        let mut session = ExportSession::new();
        session.add_child_port(&graph, &port, true);
        let json = session.ports().to_json(session.ids());
        assert_eq!(json[0]["parentId"], Value::Null);
        assert_eq!(json[0]["parentPath"], block.as_str());
        assert_eq!(json[0]["ports"][0]["name"], "fuel");
    }
}
