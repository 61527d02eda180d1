//! Node classifier
//!
//! Decides, for a visited node, which diagram kind it belongs to and whether
//! it is drawn as a component, a connection or a port. The decision depends
//! only on the node's and its parent's meta-types.

use crate::core::{Classification, DiagramKind, MetaType};

/// Classifies nodes by meta-type
///
/// Rules are checked in order and the first match wins:
///
/// 1. Actor, UseCase or UseCaseLink under a Package, Block or UseCaseDiagram
///    belongs to a use case diagram; links are connections.
/// 2. Anything under a RequirementDiagram, or a Requirement under a Package,
///    belongs to a requirement diagram; Req2Req and CommentLink are connections.
/// 3. Block, Property or FlowPort under an InternalBlockDiagram, or a Connector
///    there, belongs to an internal block diagram; the Connector is a connection.
/// 4. Anything under a SequenceDiagram or a LifeLine belongs to a sequence
///    diagram; Messages are connections.
/// 5. Value, ConstraintBlock or Connector under a ParametricDiagram belongs to
///    a parametric diagram; the Connector is a connection.
/// 6. A FlowPort is a port, valid only under a Block.
/// 7. A ConstraintParameter is a port of whatever owns it.
/// 8. Everything else is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeClassifier;

impl NodeClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, node: Option<MetaType>, parent: Option<MetaType>) -> Classification {
        let node_is = |candidate| node.is_some_and(|meta| meta.is_meta_type_of(candidate));
        let parent_is = |candidate| parent.is_some_and(|meta| meta.is_meta_type_of(candidate));
        let parent_is_package = parent_is(MetaType::Package);

        let is_use_case_link = node_is(MetaType::UseCaseLink);
        if (parent_is_package || parent_is(MetaType::Block) || parent_is(MetaType::UseCaseDiagram))
            && (node_is(MetaType::Actor) || node_is(MetaType::UseCase) || is_use_case_link)
        {
            return Self::pick(DiagramKind::UseCase, is_use_case_link);
        }

        if parent_is(MetaType::RequirementDiagram)
            || (parent_is_package && node_is(MetaType::Requirement))
        {
            let is_link = node_is(MetaType::Req2Req) || node_is(MetaType::CommentLink);
            return Self::pick(DiagramKind::Requirement, is_link);
        }

        let parent_is_ibd = parent_is(MetaType::InternalBlockDiagram);
        let is_ibd_connection = parent_is_ibd && node_is(MetaType::Connector);
        if is_ibd_connection
            || (parent_is_ibd
                && (node_is(MetaType::Block)
                    || node_is(MetaType::Property)
                    || node_is(MetaType::FlowPort)))
        {
            return Self::pick(DiagramKind::InternalBlock, is_ibd_connection);
        }

        if parent_is(MetaType::SequenceDiagram) || parent_is(MetaType::LifeLine) {
            return Self::pick(DiagramKind::Sequence, node_is(MetaType::Message));
        }

        if parent_is(MetaType::ParametricDiagram) {
            let is_connector = node_is(MetaType::Connector);
            if is_connector || node_is(MetaType::Value) || node_is(MetaType::ConstraintBlock) {
                return Self::pick(DiagramKind::Parametric, is_connector);
            }
        }

        if node_is(MetaType::FlowPort) {
            return Classification::Port {
                valid_parent: parent_is(MetaType::Block),
            };
        }

        if node_is(MetaType::ConstraintParameter) {
            return Classification::Port { valid_parent: true };
        }

        Classification::Ignore
    }

    fn pick(kind: DiagramKind, is_connection: bool) -> Classification {
        if is_connection {
            Classification::Connection(kind)
        } else {
            Classification::Component(kind)
        }
    }
}
