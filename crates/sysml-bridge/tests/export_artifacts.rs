//! Tests for the serialized export artifacts

use serde_json::Value;
use sysml_bridge::export::{run_export, PORTS_ARTIFACT};
use sysml_bridge::{export_model, ExportConfig, GraphBuilder, MemoryGraph, MetaType, Position};
use tempfile::tempdir;

fn parse(artifact: Option<&str>) -> Value {
    serde_json::from_str(artifact.expect("artifact present")).unwrap()
}

#[test]
fn test_use_case_links_keep_their_kind() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let diagram = graph
        .add_node(&root, MetaType::UseCaseDiagram, "Driving")
        .unwrap();
    let driver = graph.add_node(&diagram, MetaType::Actor, "driver").unwrap();
    let park = graph.add_node(&diagram, MetaType::UseCase, "park").unwrap();
    let include = graph.add_node(&diagram, MetaType::Include, "").unwrap();
    graph.set_pointer(&include, "src", &driver).unwrap();
    graph.set_pointer(&include, "dst", &park).unwrap();

    let artifacts = export_model(&graph, &root, &ExportConfig::default()).unwrap();
    let usecase = parse(artifacts.get("usecase.json"));
    let table = &usecase[0];
    assert_eq!(table["name"], "Driving");
    assert_eq!(table["components"].as_array().unwrap().len(), 2);

    let connection = &table["connections"][0];
    assert_eq!(connection["type"], "Include");
    let driver_id = table["components"][0]["id"].clone();
    let park_id = table["components"][1]["id"].clone();
    assert_eq!(connection["src"], driver_id);
    assert_eq!(connection["dst"], park_id);
}

#[test]
fn test_connection_before_its_endpoints_still_resolves() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let diagram = graph
        .add_node(&root, MetaType::InternalBlockDiagram, "Ibd")
        .unwrap();
    // Created first, so it is visited before the parts it connects
    let link = graph.add_node(&diagram, MetaType::Connector, "shaft").unwrap();
    let engine = graph.add_node(&diagram, MetaType::Property, "engine").unwrap();
    let wheel = graph.add_node(&diagram, MetaType::Property, "wheel").unwrap();
    graph.set_pointer(&link, "src", &engine).unwrap();
    graph.set_pointer(&link, "dst", &wheel).unwrap();

    let artifacts = export_model(&graph, &root, &ExportConfig::default()).unwrap();
    let ibd = parse(artifacts.get("internal_block.json"));
    let connection = &ibd[0]["connections"][0];
    assert!(connection["src"].is_u64());
    assert!(connection["dst"].is_u64());
    assert_eq!(connection["name"], "shaft");
}

#[test]
fn test_requirement_and_sequence_extras() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let reqs = graph
        .add_node(&root, MetaType::RequirementDiagram, "Reqs")
        .unwrap();
    let safety = graph.add_node(&reqs, MetaType::Requirement, "safety").unwrap();
    graph.set_attribute(&safety, "text", "Brakes shall work").unwrap();
    graph.set_attribute(&safety, "id", "REQ-1").unwrap();

    let seq = graph
        .add_node(&root, MetaType::SequenceDiagram, "Login")
        .unwrap();
    let user = graph.add_node(&seq, MetaType::LifeLine, "user").unwrap();
    graph
        .add_node(&user, MetaType::ExecutionSpecification, "typing")
        .unwrap();

    let artifacts = export_model(&graph, &root, &ExportConfig::default()).unwrap();
    let requirement = parse(artifacts.get("requirement.json"));
    assert_eq!(requirement[0]["components"][0]["text"], "Brakes shall work");
    assert_eq!(requirement[0]["components"][0]["reqId"], "REQ-1");
    assert!(requirement[0]["components"][0]["id"].is_u64());

    let sequence = parse(artifacts.get("sequence.json"));
    assert_eq!(sequence.as_array().unwrap().len(), 1);
    let components = sequence[0]["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[1]["lifeline"], components[0]["id"]);
}

#[test]
fn test_ports_artifact() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let package = graph.add_node(&root, MetaType::Package, "pkg").unwrap();
    let block = graph.add_node(&package, MetaType::Block, "engine").unwrap();
    let fuel = graph.add_node(&block, MetaType::FlowPort, "fuel").unwrap();
    graph.set_position(&fuel, Position::new(2.0, 9.0)).unwrap();
    // A flow port outside a block is not registered
    graph.add_node(&package, MetaType::FlowPort, "stray").unwrap();

    let artifacts = export_model(&graph, &root, &ExportConfig::default()).unwrap();
    assert_eq!(artifacts.names().collect::<Vec<_>>(), vec![PORTS_ARTIFACT]);
    let ports = parse(artifacts.get(PORTS_ARTIFACT));
    assert_eq!(ports.as_array().unwrap().len(), 1);
    assert_eq!(ports[0]["parentPath"], block.as_str());
    assert_eq!(ports[0]["ports"][0]["name"], "fuel");
    assert_eq!(ports[0]["ports"][0]["x"], 2.0);
}

#[test]
fn test_compact_artifacts_written_to_disk() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let diagram = graph
        .add_node(&root, MetaType::ParametricDiagram, "Params")
        .unwrap();
    let mass = graph.add_node(&diagram, MetaType::Value, "mass").unwrap();
    graph.set_attribute(&mass, "value", "12").unwrap();

    let config = ExportConfig::default().with_pretty(false);
    let artifacts = futures::executor::block_on(run_export(&graph, &root, &config)).unwrap();
    let dir = tempdir().unwrap();
    let written = artifacts.write_to_dir(dir.path()).unwrap();
    assert_eq!(written.len(), 1);

    let content = std::fs::read_to_string(dir.path().join("parametric.json")).unwrap();
    assert!(!content.contains('\n'));
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value[0]["components"][0]["value"], "12");
}

#[test]
fn test_failed_walk_saves_nothing() {
    let mut graph = MemoryGraph::new();
    let root = graph.root();
    let diagram = graph
        .add_node(&root, MetaType::ParametricDiagram, "Params")
        .unwrap();
    let link = graph.add_node(&diagram, MetaType::Connector, "link").unwrap();
    let mut raw: Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
    raw["nodes"][link.as_str()]["pointers"] = serde_json::json!({"src": "/42"});
    let graph = MemoryGraph::from_json(&raw.to_string()).unwrap();

    let result = export_model(&graph, &root, &ExportConfig::default());
    assert!(result.is_err());
}
