//! Stereotype indexer
//!
//! SysML stereotype applications refine the plain UML type of an element:
//! a UML `Class` carrying the Block stereotype is a Block, a `Property`
//! carrying ConstraintProperty is a ConstraintParameter.

use std::collections::HashMap;
use tracing::{debug, span, trace, Level};

use super::document::{StereotypeApplication, SysmlDocument};
use crate::core::MetaType;

/// Refined types keyed by the XMI id of the stereotyped element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereotypeIndex {
    types: HashMap<String, MetaType>,
}

impl StereotypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a refined type; a later entry for the same id replaces it
    pub fn insert(&mut self, id: impl Into<String>, meta: MetaType) {
        self.types.insert(id.into(), meta);
    }

    pub fn get(&self, id: &str) -> Option<MetaType> {
        self.types.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StereotypeIndexer;

impl StereotypeIndexer {
    pub fn new() -> Self {
        Self
    }

    /// Index Block, ConstraintBlock and ConstraintProperty applications in
    /// that order, skipping the root element
    pub fn index(&self, document: &SysmlDocument, root_id: &str) -> StereotypeIndex {
        let span = span!(Level::INFO, "index_stereotypes", root = root_id);
        let _enter = span.enter();

        let mut index = StereotypeIndex::new();
        apply(&mut index, class_bases(&document.blocks), MetaType::Block, root_id);
        apply(
            &mut index,
            class_bases(&document.constraint_blocks),
            MetaType::ConstraintBlock,
            root_id,
        );
        apply(
            &mut index,
            property_bases(&document.constraint_properties),
            MetaType::ConstraintParameter,
            root_id,
        );
        debug!(entries = index.len(), "Indexed stereotypes");
        index
    }
}

fn class_bases(applications: &[StereotypeApplication]) -> Vec<&str> {
    applications
        .iter()
        .filter_map(|a| a.base_class.as_deref())
        .collect()
}

fn property_bases(applications: &[StereotypeApplication]) -> Vec<&str> {
    applications
        .iter()
        .filter_map(|a| a.base_property.as_deref())
        .collect()
}

fn apply(index: &mut StereotypeIndex, ids: Vec<&str>, meta: MetaType, root_id: &str) {
    for id in ids.into_iter().filter(|id| *id != root_id) {
        if let Some(previous) = index.get(id) {
            trace!(id, %previous, replacement = %meta, "Stereotype replaced");
        }
        index.insert(id, meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(base_class: Option<&str>, base_property: Option<&str>) -> StereotypeApplication {
        StereotypeApplication {
            base_class: base_class.map(str::to_string),
            base_property: base_property.map(str::to_string),
        }
    }

    #[test]
    fn test_collections_map_to_types() {
        let document = SysmlDocument {
            blocks: vec![applied(Some("_B"), None), applied(Some("_R1"), None)],
            constraint_blocks: vec![applied(Some("_C"), None)],
            constraint_properties: vec![applied(None, Some("_P"))],
            ..Default::default()
        };
        let index = StereotypeIndexer::new().index(&document, "_R1");
        assert_eq!(index.get("_B"), Some(MetaType::Block));
        assert_eq!(index.get("_C"), Some(MetaType::ConstraintBlock));
        assert_eq!(index.get("_P"), Some(MetaType::ConstraintParameter));
        assert_eq!(index.get("_R1"), None);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_last_application_wins() {
        let document = SysmlDocument {
            blocks: vec![applied(Some("_X"), None)],
            constraint_blocks: vec![applied(Some("_X"), None)],
            ..Default::default()
        };
        let index = StereotypeIndexer::new().index(&document, "_R1");
        assert_eq!(index.get("_X"), Some(MetaType::ConstraintBlock));
    }
}
