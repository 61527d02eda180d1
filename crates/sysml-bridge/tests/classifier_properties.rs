//! Property tests for node classification

use proptest::prelude::*;
use sysml_bridge::export::NodeClassifier;
use sysml_bridge::{Classification, DiagramKind, MetaType, Role};

fn meta_strategy() -> impl Strategy<Value = Option<MetaType>> {
    prop::option::of(prop::sample::select(MetaType::ALL.to_vec()))
}

fn check_classification_is_deterministic(
    node: Option<MetaType>,
    parent: Option<MetaType>,
) -> Result<(), TestCaseError> {
    let first = NodeClassifier::new().classify(node, parent);
    let second = NodeClassifier::new().classify(node, parent);
    prop_assert_eq!(first, second);
    Ok(())
}

fn check_kind_matches_role(
    node: Option<MetaType>,
    parent: Option<MetaType>,
) -> Result<(), TestCaseError> {
    let classification = NodeClassifier::new().classify(node, parent);
    match classification.role() {
        Role::Component | Role::Connection => prop_assert!(classification.kind().is_some()),
        Role::Port | Role::Ignore => prop_assert!(classification.kind().is_none()),
    }
    Ok(())
}

fn check_ports_only_for_port_types(
    node: Option<MetaType>,
    parent: Option<MetaType>,
) -> Result<(), TestCaseError> {
    if let Classification::Port { .. } = NodeClassifier::new().classify(node, parent) {
        prop_assert!(matches!(
            node,
            Some(MetaType::FlowPort) | Some(MetaType::ConstraintParameter)
        ));
    }
    Ok(())
}

fn check_orphans_are_ignored(node: Option<MetaType>) -> Result<(), TestCaseError> {
    let classification = NodeClassifier::new().classify(node, None);
    let expected = match node {
        Some(MetaType::FlowPort) => Classification::Port {
            valid_parent: false,
        },
        Some(MetaType::ConstraintParameter) => Classification::Port { valid_parent: true },
        _ => Classification::Ignore,
    };
    prop_assert_eq!(classification, expected);
    Ok(())
}

proptest! {
    #[test]
    fn classification_is_deterministic(node in meta_strategy(), parent in meta_strategy()) {
        check_classification_is_deterministic(node, parent)?;
    }

    #[test]
    fn kind_matches_role(node in meta_strategy(), parent in meta_strategy()) {
        check_kind_matches_role(node, parent)?;
    }

    #[test]
    fn ports_only_for_port_types(node in meta_strategy(), parent in meta_strategy()) {
        check_ports_only_for_port_types(node, parent)?;
    }

    #[test]
    fn orphans_are_ignored(node in meta_strategy()) {
        check_orphans_are_ignored(node)?;
    }
}

#[test]
fn test_every_requirement_diagram_child_is_a_requirement_element() {
    let classifier = NodeClassifier::new();
    for meta in MetaType::ALL {
        let classification = classifier.classify(Some(*meta), Some(MetaType::RequirementDiagram));
        assert_eq!(classification.kind(), Some(DiagramKind::Requirement), "{}", meta);
    }
}
