//! In-memory host graph
//!
//! A self-contained [`ModelHost`] and [`GraphBuilder`] used by the CLI and by
//! tests. Graphs serialize to JSON so they can be kept on disk between runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use super::{GraphBuilder, HostError, MetaType, ModelHost, NodeId, Position};

/// A node stored in a [`MemoryGraph`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    /// `None` for the root and for untyped scaffolding nodes
    #[serde(default)]
    pub meta: Option<MetaType>,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub pointers: BTreeMap<String, NodeId>,
    /// Next relative id handed out to a child
    #[serde(default)]
    next_relid: u32,
}

impl MemoryNode {
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }
}

/// Containment tree held entirely in memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryGraph {
    nodes: BTreeMap<NodeId, MemoryNode>,
}

impl MemoryGraph {
    /// Create a graph holding only the root node
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::root(), MemoryNode::default());
        Self { nodes }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn root(&self) -> NodeId {
        NodeId::root()
    }

    pub fn node(&self, id: &NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in path order
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &MemoryNode)> {
        self.nodes.iter()
    }

    pub fn children_of(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// First node carrying the given `name` attribute
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == Some(name))
            .map(|(id, _)| id.clone())
    }

    /// Create a named node in one step
    pub fn add_node(
        &mut self,
        parent: &NodeId,
        meta: MetaType,
        name: &str,
    ) -> Result<NodeId, HostError> {
        let id = self.create_node(parent, meta)?;
        self.set_attribute(&id, "name", name)?;
        Ok(id)
    }

    /// Create a node without a meta-type
    pub fn add_untyped(&mut self, parent: &NodeId, name: &str) -> Result<NodeId, HostError> {
        let id = self.insert_child(parent, None)?;
        self.set_attribute(&id, "name", name)?;
        Ok(id)
    }

    fn insert_child(&mut self, parent: &NodeId, meta: Option<MetaType>) -> Result<NodeId, HostError> {
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| HostError::UnknownNode {
                node: parent.clone(),
            })?;
        parent_node.next_relid += 1;
        let id = parent.child(parent_node.next_relid);
        parent_node.children.push(id.clone());

        self.nodes.insert(
            id.clone(),
            MemoryNode {
                meta,
                parent: Some(parent.clone()),
                ..Default::default()
            },
        );
        trace!(node = %id, parent = %parent, ?meta, "Created node");
        Ok(id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut MemoryNode, HostError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| HostError::UnknownNode { node: id.clone() })
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelHost for MemoryGraph {
    async fn load_children(&self, node: &NodeId) -> Result<Vec<NodeId>, HostError> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .ok_or_else(|| HostError::UnknownNode { node: node.clone() })
    }

    async fn load_pointer(&self, node: &NodeId, role: &str) -> Result<Option<NodeId>, HostError> {
        let source = self
            .nodes
            .get(node)
            .ok_or_else(|| HostError::UnknownNode { node: node.clone() })?;
        match source.pointers.get(role) {
            Some(target) if self.nodes.contains_key(target) => Ok(Some(target.clone())),
            Some(target) => Err(HostError::pointer(
                node.clone(),
                role,
                format!("target {} does not exist", target),
            )),
            None => Ok(None),
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent.clone())
    }

    fn meta_type(&self, node: &NodeId) -> Option<MetaType> {
        self.nodes.get(node).and_then(|n| n.meta)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn position(&self, node: &NodeId) -> Option<Position> {
        self.nodes.get(node).and_then(|n| n.position)
    }
}

impl GraphBuilder for MemoryGraph {
    fn create_node(&mut self, parent: &NodeId, base: MetaType) -> Result<NodeId, HostError> {
        self.insert_child(parent, Some(base))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.node_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_position(&mut self, node: &NodeId, position: Position) -> Result<(), HostError> {
        self.node_mut(node)?.position = Some(position);
        Ok(())
    }

    fn set_pointer(&mut self, node: &NodeId, role: &str, target: &NodeId) -> Result<(), HostError> {
        if !self.nodes.contains_key(target) {
            return Err(HostError::UnknownNode {
                node: target.clone(),
            });
        }
        self.node_mut(node)?
            .pointers
            .insert(role.to_string(), target.clone());
        Ok(())
    }
}
