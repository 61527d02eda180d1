//! End-to-end tests for the parametric diagram importer

use futures::executor::block_on;
use serde_json::{json, Value};
use sysml_bridge::import::{NotationDiagram, ParametricDiagramImporter, SysmlDocument};
use sysml_bridge::{ImportConfig, ImportError, MemoryGraph, MetaType, ModelHost, Position};

const XMI_ID: &str = "@http://www.omg.org/spec/XMI/20131001:id";
const XMI_TYPE: &str = "@http://www.omg.org/spec/XMI/20131001:type";
const NOTATION_TYPE: &str = "@http://www.omg.org/XMI:type";
const MODEL: &str = "http://www.eclipse.org/uml2/5.0.0/UML:Model";
const CONSTRAINT_BLOCK: &str = "http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints:ConstraintBlock";
const CONSTRAINT_PROPERTY: &str =
    "http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints:ConstraintProperty";

fn view(id: &str, uml_type: &str, x: &str, y: &str) -> Value {
    json!({
        "element": {"@href": format!("model.uml#{}", id), NOTATION_TYPE: uml_type},
        "layoutConstraint": {"@x": x, "@y": y}
    })
}

fn notation(views: Vec<Value>) -> NotationDiagram {
    NotationDiagram::from_value(json!({
        "@name": "Params",
        "element": {"@href": "model.uml#_R1", NOTATION_TYPE: "uml:Class"},
        "children": [{"children": views}]
    }))
    .unwrap()
}

/// Root block with p1 and p2, p2 typed by blk2 which is a constraint block
fn scenario_model(second_role: &str) -> SysmlDocument {
    SysmlDocument::from_value(json!({
        MODEL: {
            "packagedElement": [
                {
                    XMI_ID: "_R1",
                    XMI_TYPE: "uml:Class",
                    "@name": "System",
                    "ownedAttribute": [
                        {XMI_ID: "_A1", XMI_TYPE: "uml:Property", "@name": "p1"},
                        {XMI_ID: "_A2", XMI_TYPE: "uml:Property", "@name": "p2", "@type": "blk2"}
                    ],
                    "ownedConnector": {
                        XMI_ID: "_K1",
                        "end": [{"@role": "_A1"}, {"@role": second_role}]
                    }
                },
                {XMI_ID: "_AS1", XMI_TYPE: "uml:Association"}
            ]
        },
        CONSTRAINT_BLOCK: {"@base_Class": "blk2"}
    }))
    .unwrap()
}

fn scenario_notation() -> NotationDiagram {
    notation(vec![
        view("_A1", "uml:Property", "10", "20"),
        view("_A2", "uml:Property", "-5", "-5"),
    ])
}

#[test]
fn test_end_to_end_scenario() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let summary = ParametricDiagramImporter::default()
        .build_diagram(&mut graph, &root, &scenario_model("blk2"), &scenario_notation())
        .unwrap();

    assert_eq!(summary.components, 2);
    assert_eq!(summary.connections, 1);
    assert_eq!(summary.dangling_endpoints, 0);

    let diagram = summary.diagram;
    assert_eq!(graph.meta_type(&diagram), Some(MetaType::ParametricDiagram));
    assert_eq!(graph.attribute(&diagram, "name").as_deref(), Some("Params"));
    assert_eq!(graph.position(&diagram), Some(Position::new(200.0, 200.0)));

    let p1 = graph.find_by_name("p1").unwrap();
    let p2 = graph.find_by_name("p2").unwrap();
    assert_eq!(graph.parent(&p1).as_ref(), Some(&diagram));
    assert_eq!(graph.parent(&p2).as_ref(), Some(&diagram));
    assert_eq!(graph.meta_type(&p1), Some(MetaType::Property));
    assert_eq!(graph.meta_type(&p2), Some(MetaType::ConstraintBlock));
    assert_eq!(graph.position(&p1), Some(Position::new(10.0, 20.0)));
    assert_eq!(graph.position(&p2), Some(Position::new(5.0, 5.0)));

    // Diagram holds p1, p2 and the connector
    let children = block_on(graph.load_children(&diagram)).unwrap();
    assert_eq!(children.len(), 3);
    let link = children
        .iter()
        .find(|c| graph.meta_type(c) == Some(MetaType::Connector))
        .unwrap();
    assert_eq!(block_on(graph.load_pointer(link, "src")).unwrap(), Some(p1));
    assert_eq!(block_on(graph.load_pointer(link, "dst")).unwrap(), Some(p2));
}

#[test]
fn test_endpoint_resolves_through_xmi_bridge() {
    // The connector names p2 by its XMI id; p2 is registered under blk2
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let summary = ParametricDiagramImporter::default()
        .build_diagram(&mut graph, &root, &scenario_model("_A2"), &scenario_notation())
        .unwrap();

    assert_eq!(summary.dangling_endpoints, 0);
    let p2 = graph.find_by_name("p2").unwrap();
    let children = block_on(graph.load_children(&summary.diagram)).unwrap();
    let link = children
        .iter()
        .find(|c| graph.meta_type(c) == Some(MetaType::Connector))
        .unwrap();
    assert_eq!(block_on(graph.load_pointer(link, "dst")).unwrap(), Some(p2));
}

#[test]
fn test_unresolved_endpoint_is_tolerated() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let summary = ParametricDiagramImporter::default()
        .build_diagram(&mut graph, &root, &scenario_model("_nowhere"), &scenario_notation())
        .unwrap();

    assert_eq!(summary.connections, 1);
    assert_eq!(summary.dangling_endpoints, 1);
}

#[test]
fn test_stereotype_overrides_uml_type() {
    let document = SysmlDocument::from_value(json!({
        MODEL: {
            "packagedElement": [
                {
                    XMI_ID: "_R1",
                    XMI_TYPE: "uml:Class",
                    "ownedAttribute": {XMI_ID: "_U", XMI_TYPE: "uml:Property", "@name": "law", "@type": "_C"}
                },
                {
                    XMI_ID: "_C",
                    XMI_TYPE: "uml:Class",
                    "ownedAttribute": {XMI_ID: "_P", XMI_TYPE: "uml:Property", "@name": "force"}
                }
            ]
        },
        CONSTRAINT_BLOCK: {"@base_Class": "_C"},
        CONSTRAINT_PROPERTY: [{"@base_Property": "_P"}]
    }))
    .unwrap();
    let notation = notation(vec![json!({
        "element": {"@href": "model.uml#_U", NOTATION_TYPE: "uml:Property"},
        "layoutConstraint": {"@x": "40", "@y": "60"},
        "children": [view("_P", "uml:Property", "3", "4")]
    })]);

    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let summary = ParametricDiagramImporter::default()
        .build_diagram(&mut graph, &root, &document, &notation)
        .unwrap();

    assert_eq!(summary.components, 1);
    assert_eq!(summary.children, 1);
    let law = graph.find_by_name("law").unwrap();
    let force = graph.find_by_name("force").unwrap();
    assert_eq!(graph.meta_type(&law), Some(MetaType::ConstraintBlock));
    assert_eq!(graph.meta_type(&force), Some(MetaType::ConstraintParameter));
    assert_eq!(graph.parent(&force), Some(law));
    assert_eq!(graph.position(&force), Some(Position::new(3.0, 4.0)));
}

#[test]
fn test_missing_position_aborts_without_nodes() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let only_first = notation(vec![view("_A1", "uml:Property", "10", "20")]);
    let result = ParametricDiagramImporter::default().build_diagram(
        &mut graph,
        &root,
        &scenario_model("blk2"),
        &only_first,
    );

    assert!(matches!(result, Err(ImportError::MissingPosition { ref id }) if id == "_A2"));
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_notation_without_root_reference_is_malformed() {
    let notation = NotationDiagram::from_value(json!({"children": [{"children": []}]})).unwrap();
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let result = ParametricDiagramImporter::default().build_diagram(
        &mut graph,
        &root,
        &scenario_model("blk2"),
        &notation,
    );
    assert!(matches!(result, Err(ImportError::MalformedDocument { .. })));
}

#[test]
fn test_import_under_custom_parent_and_position() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let package = graph.add_node(&root, MetaType::Package, "pkg").unwrap();
    let config = ImportConfig::default().with_diagram_position(Position::new(0.0, 0.0));

    let summary = ParametricDiagramImporter::new(config)
        .build_diagram(&mut graph, &package, &scenario_model("blk2"), &scenario_notation())
        .unwrap();
    assert_eq!(graph.parent(&summary.diagram), Some(package));
    assert_eq!(graph.position(&summary.diagram), Some(Position::new(0.0, 0.0)));
}

#[test]
fn test_import_from_papyrus_xml() {
    let model = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="20131001" xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
    xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML"
    xmlns:Constraints="http://www.eclipse.org/papyrus/0.7.0/SysML/Constraints">
  <uml:Model xmi:id="_M" name="Model">
    <packagedElement xmi:type="uml:Class" xmi:id="_R1" name="System">
      <ownedAttribute xmi:type="uml:Property" xmi:id="_A1" name="p1"/>
      <ownedAttribute xmi:type="uml:Property" xmi:id="_A2" name="p2" type="blk2"/>
      <ownedAttribute xmi:type="uml:Property" xmi:id="_A3"/>
      <ownedConnector xmi:id="_K1" name="bind">
        <end xmi:id="_E1" role="_A1"/>
        <end xmi:id="_E2" role="_A2"/>
      </ownedConnector>
    </packagedElement>
  </uml:Model>
  <Constraints:ConstraintBlock xmi:id="_S1" base_Class="blk2"/>
</xmi:XMI>"#;
    let notation = r#"<?xml version="1.0" encoding="UTF-8"?>
<notation:Diagram xmi:version="2.0" xmlns:xmi="http://www.omg.org/XMI"
    xmlns:notation="http://www.eclipse.org/gmf/runtime/1.0.2/notation" name="Params">
  <children xmi:type="notation:Shape">
    <children xmi:type="notation:Shape">
      <element xmi:type="uml:Property" href="model.uml#_A1"/>
      <layoutConstraint xmi:type="notation:Bounds" x="10" y="20"/>
    </children>
    <children xmi:type="notation:Shape">
      <element xmi:type="uml:Property" href="model.uml#_A2"/>
      <layoutConstraint xmi:type="notation:Bounds" x="-5" y="-5"/>
    </children>
  </children>
  <element xmi:type="uml:Class" href="model.uml#_R1"/>
</notation:Diagram>"#;

    let document = SysmlDocument::from_xml(model).unwrap();
    let diagram = NotationDiagram::from_xml(notation).unwrap();
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let summary = ParametricDiagramImporter::default()
        .build_diagram(&mut graph, &root, &document, &diagram)
        .unwrap();

    assert_eq!(summary.components, 2);
    assert_eq!(summary.connections, 1);
    assert_eq!(summary.dangling_endpoints, 0);
    let p2 = graph.find_by_name("p2").unwrap();
    assert_eq!(graph.meta_type(&p2), Some(MetaType::ConstraintBlock));
    assert_eq!(graph.position(&p2), Some(Position::new(5.0, 5.0)));
    assert!(graph.find_by_name("bind").is_some());
}
