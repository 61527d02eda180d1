//! Import pipeline
//!
//! Reads a Papyrus model document and its notation diagram and materializes
//! the diagram into a host graph. Phases run strictly in order: notation
//! index, stereotype index, component collection, node creation.

mod collector;
pub mod document;
mod materializer;
mod notation;
mod parametric;
mod stereotype;
pub mod xml;

pub use collector::{
    ChildDescriptor, CollectedModel, ComponentCollector, ComponentDescriptor, ConnectorDescriptor,
};
pub use document::{NotationDiagram, SysmlDocument};
pub use materializer::{GraphMaterializer, MaterializePlan, MaterializeSummary, PlannedComponent};
pub use notation::{NotationIndex, NotationIndexer};
pub use parametric::{ImportSummary, ParametricDiagramImporter};
pub use stereotype::{StereotypeIndex, StereotypeIndexer};
pub use xml::document_from_xml;
