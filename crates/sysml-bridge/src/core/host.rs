//! Host graph traits
//!
//! The host owns the model graph. Exporting only reads it through
//! [`ModelHost`]; importing only creates nodes through [`GraphBuilder`].

use async_trait::async_trait;

use super::{HostError, MetaType, NodeId, Position};

/// Read access to a host model graph
///
/// Loading children and resolving pointers may hit storage and are therefore
/// asynchronous. Everything else reads data of an already loaded node.
#[async_trait]
pub trait ModelHost: Send + Sync {
    /// Load the direct children of a node in the containment tree
    async fn load_children(&self, node: &NodeId) -> Result<Vec<NodeId>, HostError>;

    /// Resolve a pointer (e.g. `src`/`dst` of a connection) to its target
    async fn load_pointer(&self, node: &NodeId, role: &str) -> Result<Option<NodeId>, HostError>;

    /// Containment parent of a node; `None` for the root
    fn parent(&self, node: &NodeId) -> Option<NodeId>;

    /// Meta-type of a node; `None` for the root and for unknown meta nodes
    fn meta_type(&self, node: &NodeId) -> Option<MetaType>;

    /// Read a string attribute (e.g. `name`)
    fn attribute(&self, node: &NodeId, name: &str) -> Option<String>;

    /// Read the `position` registry entry
    fn position(&self, node: &NodeId) -> Option<Position>;
}

/// Write access used when materializing imported diagrams
pub trait GraphBuilder {
    /// Create a node of meta-type `base` under `parent`
    fn create_node(&mut self, parent: &NodeId, base: MetaType) -> Result<NodeId, HostError>;

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), HostError>;

    /// Write the `position` registry entry
    fn set_position(&mut self, node: &NodeId, position: Position) -> Result<(), HostError>;

    fn set_pointer(&mut self, node: &NodeId, role: &str, target: &NodeId) -> Result<(), HostError>;
}
