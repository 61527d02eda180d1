//! Graph walker
//!
//! Visits every node reachable from a root through the containment tree.
//! Children batches load concurrently; each visit runs to completion before
//! the next one starts, so session tables are never updated halfway.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, info_span, trace, warn, Instrument};

use super::{ExportSession, NodeClassifier};
use crate::core::{Classification, ExportError, ExportErrors, HostError, ModelHost, NodeId};

type ChildrenLoad<'a> = BoxFuture<'a, (NodeId, Result<Vec<NodeId>, HostError>)>;

/// Counts from a finished walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkSummary {
    /// Nodes visited, the root excluded
    pub visited: usize,
    /// Components and connections across all diagram kinds
    pub components: usize,
    pub connections: usize,
    pub ports: usize,
}

impl WalkSummary {
    fn from_session(session: &ExportSession) -> Self {
        let exporters = session.exporters();
        Self {
            visited: session.visited(),
            components: exporters.iter().map(|e| e.tables().component_count()).sum(),
            connections: exporters.iter().map(|e| e.tables().connection_count()).sum(),
            ports: session.ports().len(),
        }
    }
}

/// Depth-first walker feeding classified nodes into an [`ExportSession`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphWalker {
    classifier: NodeClassifier,
}

impl GraphWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit every descendant of `root` exactly once
    ///
    /// Failures do not stop the walk. When any were recorded they are
    /// returned together once every reachable node has been visited; the
    /// partial results stay in `session`.
    pub async fn visit_from_node(
        &self,
        host: &dyn ModelHost,
        root: &NodeId,
        session: &mut ExportSession,
    ) -> Result<WalkSummary, ExportErrors> {
        let span = info_span!("visit_from_node", root = %root);
        self.walk(host, root, session).instrument(span).await;

        let summary = WalkSummary::from_session(session);
        if session.has_errors() {
            let errors = session.take_errors();
            warn!(errors = errors.len(), visited = summary.visited, "Walk finished with errors");
            return Err(errors);
        }
        info!(
            visited = summary.visited,
            components = summary.components,
            connections = summary.connections,
            ports = summary.ports,
            "Walk completed"
        );
        Ok(summary)
    }

    async fn walk(&self, host: &dyn ModelHost, root: &NodeId, session: &mut ExportSession) {
        // The walk is done once this set drains; a visited node's children
        // join it right away, so late discoveries are still awaited.
        let mut pending: FuturesUnordered<ChildrenLoad<'_>> = FuturesUnordered::new();
        pending.push(load_children(host, root.clone()));

        while let Some((parent, loaded)) = pending.next().await {
            match loaded {
                Ok(children) => {
                    trace!(parent = %parent, count = children.len(), "Loaded children");
                    for child in children {
                        self.visit_object(host, &child, session).await;
                        pending.push(load_children(host, child));
                    }
                }
                Err(source) => {
                    warn!(node = %parent, error = %source, "Failed to load children");
                    session.record_error(ExportError::load_children(parent, source));
                }
            }
        }
    }

    /// Classify one node and record it in the session
    pub async fn visit_object(
        &self,
        host: &dyn ModelHost,
        node: &NodeId,
        session: &mut ExportSession,
    ) -> Classification {
        session.record_visit();
        let classification = self.classify_node(host, node);
        trace!(node = %node, %classification, "Classified node");

        match classification {
            Classification::Component(kind) => {
                if session.add_component(host, kind, node) {
                    debug!(node = %node, %kind, "Added component");
                }
            }
            Classification::Connection(kind) => match session.add_connection(host, kind, node).await {
                Ok(true) => debug!(node = %node, %kind, "Added connection"),
                Ok(false) => {}
                Err(error) => session.record_error(error),
            },
            Classification::Port { valid_parent } => {
                session.add_child_port(host, node, valid_parent);
            }
            Classification::Ignore => {}
        }
        classification
    }

    /// Classification of a node from its own and its parent's meta-type
    pub fn classify_node(&self, host: &dyn ModelHost, node: &NodeId) -> Classification {
        let parent_meta = host.parent(node).and_then(|parent| host.meta_type(&parent));
        self.classifier.classify(host.meta_type(node), parent_meta)
    }
}

fn load_children(host: &dyn ModelHost, node: NodeId) -> ChildrenLoad<'_> {
    async move {
        let loaded = host.load_children(&node).await;
        (node, loaded)
    }
    .boxed()
}
