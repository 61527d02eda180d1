//! Notation indexer
//!
//! Builds the XMI id → position lookup from a notation diagram.

use std::collections::HashMap;
use tracing::{debug, span, trace, Level};

use super::document::{LayoutConstraint, NotationDiagram, NotationNode, RawCoordinate};
use crate::core::{ImportError, Position};

/// Positions of diagram elements keyed by XMI id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotationIndex {
    positions: HashMap<String, Position>,
}

impl NotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, position: Position) {
        self.positions.insert(id.into(), position);
    }

    pub fn get(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    /// Position of an element, failing when the notation never drew it
    pub fn require(&self, id: &str) -> Result<Position, ImportError> {
        self.get(id).ok_or_else(|| ImportError::missing_position(id))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Walks notation views and records the layout of every drawn UML element
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationIndexer;

impl NotationIndexer {
    pub fn new() -> Self {
        Self
    }

    /// Index the views inside the root block's compartment
    ///
    /// The root element itself is never indexed. Coordinates are stored as
    /// absolute values.
    pub fn index(&self, diagram: &NotationDiagram, root_id: &str) -> Result<NotationIndex, ImportError> {
        let span = span!(Level::INFO, "index_notation", root = root_id);
        let _enter = span.enter();

        let compartment = diagram
            .children
            .first()
            .ok_or_else(|| ImportError::malformed("notation diagram has no top-level view"))?;

        let mut index = NotationIndex::new();
        for view in &compartment.children {
            self.visit(view, root_id, &mut index)?;
        }
        debug!(positions = index.len(), "Indexed notation");
        Ok(index)
    }

    fn visit(&self, view: &NotationNode, root_id: &str, index: &mut NotationIndex) -> Result<(), ImportError> {
        if let Some(element) = view.element.as_ref().filter(|e| e.is_uml_element()) {
            if let (Some(id), Some(layout)) = (element.fragment(), view.layout_constraint.as_ref()) {
                if id != root_id {
                    let position = layout_position(layout, id)?.absolute();
                    trace!(id, %position, "Indexed view");
                    index.insert(id, position);
                }
            }
        }
        for child in &view.children {
            self.visit(child, root_id, index)?;
        }
        Ok(())
    }
}

fn layout_position(layout: &LayoutConstraint, id: &str) -> Result<Position, ImportError> {
    Ok(Position::new(
        coordinate(layout.x.as_ref(), id, "x")?,
        coordinate(layout.y.as_ref(), id, "y")?,
    ))
}

/// An omitted coordinate is the XMI default of 0
fn coordinate(raw: Option<&RawCoordinate>, id: &str, axis: &str) -> Result<f64, ImportError> {
    match raw {
        None => Ok(0.0),
        Some(raw) => raw.to_integer().map(|value| value as f64).ok_or_else(|| {
            ImportError::malformed(format!("layout {} of '{}' is not a number: {:?}", axis, id, raw))
        }),
    }
}
