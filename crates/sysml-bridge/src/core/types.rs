//! Core type definitions shared by the import and export pipelines
//!
//! This module contains the fundamental types used throughout sysml-bridge:
//! node identities, the host meta-type taxonomy, positions, diagram kinds
//! and the per-node classification outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a node in the host graph
///
/// Hosts address nodes by path (`/1/4/2`); the empty path is the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node identity from a host path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The root of the containment tree
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a child with the given relative id
    pub fn child(&self, relid: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, relid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 2-D registry position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position with both coordinates made non-negative
    pub fn absolute(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Meta-types of the SysML host language
///
/// Variant names match the names of the host's meta nodes, which is also
/// how they appear in serialized graphs and in exported `type` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetaType {
    Package,
    Block,
    Property,
    Actor,
    UseCase,
    Subject,
    UseCaseLink,
    Include,
    Extend,
    UseCaseDiagram,
    Requirement,
    RequirementDiagram,
    Req2Req,
    CommentLink,
    Comment,
    InternalBlockDiagram,
    FlowPort,
    Port,
    Connector,
    SequenceDiagram,
    LifeLine,
    Message,
    LostMessage,
    ExecutionSpecification,
    ParametricDiagram,
    Value,
    ConstraintBlock,
    ConstraintParameter,
    ConstraintProperty,
}

impl MetaType {
    /// Every meta-type known to the bridge
    pub const ALL: &'static [MetaType] = &[
        MetaType::Package,
        MetaType::Block,
        MetaType::Property,
        MetaType::Actor,
        MetaType::UseCase,
        MetaType::Subject,
        MetaType::UseCaseLink,
        MetaType::Include,
        MetaType::Extend,
        MetaType::UseCaseDiagram,
        MetaType::Requirement,
        MetaType::RequirementDiagram,
        MetaType::Req2Req,
        MetaType::CommentLink,
        MetaType::Comment,
        MetaType::InternalBlockDiagram,
        MetaType::FlowPort,
        MetaType::Port,
        MetaType::Connector,
        MetaType::SequenceDiagram,
        MetaType::LifeLine,
        MetaType::Message,
        MetaType::LostMessage,
        MetaType::ExecutionSpecification,
        MetaType::ParametricDiagram,
        MetaType::Value,
        MetaType::ConstraintBlock,
        MetaType::ConstraintParameter,
        MetaType::ConstraintProperty,
    ];

    /// Host meta node name
    pub fn name(&self) -> &'static str {
        match self {
            MetaType::Package => "Package",
            MetaType::Block => "Block",
            MetaType::Property => "Property",
            MetaType::Actor => "Actor",
            MetaType::UseCase => "UseCase",
            MetaType::Subject => "Subject",
            MetaType::UseCaseLink => "UseCaseLink",
            MetaType::Include => "Include",
            MetaType::Extend => "Extend",
            MetaType::UseCaseDiagram => "UseCaseDiagram",
            MetaType::Requirement => "Requirement",
            MetaType::RequirementDiagram => "RequirementDiagram",
            MetaType::Req2Req => "Req2Req",
            MetaType::CommentLink => "CommentLink",
            MetaType::Comment => "Comment",
            MetaType::InternalBlockDiagram => "InternalBlockDiagram",
            MetaType::FlowPort => "FlowPort",
            MetaType::Port => "Port",
            MetaType::Connector => "Connector",
            MetaType::SequenceDiagram => "SequenceDiagram",
            MetaType::LifeLine => "LifeLine",
            MetaType::Message => "Message",
            MetaType::LostMessage => "LostMessage",
            MetaType::ExecutionSpecification => "ExecutionSpecification",
            MetaType::ParametricDiagram => "ParametricDiagram",
            MetaType::Value => "Value",
            MetaType::ConstraintBlock => "ConstraintBlock",
            MetaType::ConstraintParameter => "ConstraintParameter",
            MetaType::ConstraintProperty => "ConstraintProperty",
        }
    }

    /// Direct base of this meta-type in the host inheritance chain
    pub fn base(&self) -> Option<MetaType> {
        match self {
            MetaType::Include | MetaType::Extend => Some(MetaType::UseCaseLink),
            MetaType::LostMessage => Some(MetaType::Message),
            _ => None,
        }
    }

    /// Whether this meta-type is `candidate` or inherits from it
    pub fn is_meta_type_of(&self, candidate: MetaType) -> bool {
        let mut current = Some(*self);
        while let Some(meta) = current {
            if meta == candidate {
                return true;
            }
            current = meta.base();
        }
        false
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MetaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaType::ALL
            .iter()
            .copied()
            .find(|meta| meta.name() == s)
            .ok_or_else(|| format!("Unknown meta-type: {}", s))
    }
}

/// Diagram kinds the exporter produces tables for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagramKind {
    UseCase,
    Requirement,
    InternalBlock,
    Sequence,
    Parametric,
}

impl DiagramKind {
    pub const ALL: &'static [DiagramKind] = &[
        DiagramKind::UseCase,
        DiagramKind::Requirement,
        DiagramKind::InternalBlock,
        DiagramKind::Sequence,
        DiagramKind::Parametric,
    ];

    /// Short machine name, also used as the artifact file stem
    pub fn slug(&self) -> &'static str {
        match self {
            DiagramKind::UseCase => "usecase",
            DiagramKind::Requirement => "requirement",
            DiagramKind::InternalBlock => "internal_block",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Parametric => "parametric",
        }
    }

    /// The host meta-type of diagrams of this kind
    pub fn diagram_meta_type(&self) -> MetaType {
        match self {
            DiagramKind::UseCase => MetaType::UseCaseDiagram,
            DiagramKind::Requirement => MetaType::RequirementDiagram,
            DiagramKind::InternalBlock => MetaType::InternalBlockDiagram,
            DiagramKind::Sequence => MetaType::SequenceDiagram,
            DiagramKind::Parametric => MetaType::ParametricDiagram,
        }
    }

    /// Name of the artifact written for this kind
    pub fn artifact_name(&self) -> String {
        format!("{}.json", self.slug())
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for DiagramKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace(['-', ' '], "_");
        DiagramKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| format!("Unknown diagram kind: {}", s))
    }
}

/// What the exporter does with a visited node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Component,
    Connection,
    Port,
    Ignore,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Component => write!(f, "component"),
            Role::Connection => write!(f, "connection"),
            Role::Port => write!(f, "port"),
            Role::Ignore => write!(f, "ignore"),
        }
    }
}

/// Outcome of classifying one node
///
/// Computed from the node's and its parent's meta-types on every visit and
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Element drawn on a diagram of the given kind
    Component(DiagramKind),
    /// Edge of a diagram of the given kind
    Connection(DiagramKind),
    /// Port registered under its parent; ignored when the parent is invalid
    Port { valid_parent: bool },
    /// Not part of any exported diagram
    Ignore,
}

impl Classification {
    /// Diagram kind, if the node belongs to a diagram
    pub fn kind(&self) -> Option<DiagramKind> {
        match self {
            Classification::Component(kind) | Classification::Connection(kind) => Some(*kind),
            Classification::Port { .. } | Classification::Ignore => None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Classification::Component(_) => Role::Component,
            Classification::Connection(_) => Role::Connection,
            Classification::Port { .. } => Role::Port,
            Classification::Ignore => Role::Ignore,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{} {}", kind, self.role()),
            None => write!(f, "{}", self.role()),
        }
    }
}
