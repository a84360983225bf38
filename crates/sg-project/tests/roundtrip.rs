use sg_graph::{GraphRegistry, NodePayload};
use sg_project::schema::*;
use sg_project::{
    ProjectError, ValidationError, build_type_registry, import_into, load, load_json, load_yaml,
    save_json, save_yaml,
};

const TEMPLE: &str = r##"
version: 1
export:
  locale: en
  ontology_context: true
kinds:
  - tag: author
    required_fields: [orcid]
    ontology_class: Event
graphs:
  - id: temple
    metadata:
      name: { it: Tempio, en: Temple }
    nodes:
      - id: geo
        type: geo_position
        data: { epsg: 3004, shift_x: 2400000.0, shift_y: 4600000.0, shift_z: 0.0 }
      - id: ep1
        type: epoch
        name: Archaic
        data: { min: 1050.9586, max: 1262.9586, start: -575, end: -480, color: "#339966" }
      - id: US01
        type: US
        data: { rel_time: "1150", description: muro }
      - id: US02
        type: USVs
        data: { rel_time: 1200 }
      - id: a1
        type: author
        data: { orcid: "0000-0001" }
    edges:
      - { from: US02, to: US01, type: line }
      - { id: rel, from: US01, to: a1, type: is_before }
"##;

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn yaml_import_builds_registered_graphs() {
    let path = write_temp("sg_project_temple.yaml", TEMPLE);
    let file = load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(file.export.locale, "en");
    assert!(file.export.pretty);
    assert!(file.export.infer);

    let types = build_type_registry(&file).unwrap();
    let registry = GraphRegistry::new();
    let handles = import_into(&file, &registry, &types).unwrap();
    assert_eq!(handles.len(), 1);

    let graph = handles[0].read().unwrap();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.metadata.name.get("en").map(String::as_str), Some("Temple"));

    let us01 = graph.get_node("US01").unwrap();
    assert_eq!(us01.name, "US01");
    assert_eq!(us01.as_stratigraphic().unwrap().rel_time, 1150.0);

    let epoch = graph.get_node("ep1").unwrap().as_epoch().unwrap();
    assert_eq!(epoch.start, -575.0);

    assert!(matches!(
        graph.get_node("a1").unwrap().payload,
        NodePayload::Custom { .. }
    ));
    assert_eq!(graph.get_edge("US02|line|US01").unwrap().target, "US01");
    assert_eq!(graph.get_edge("rel").unwrap().kind.as_str(), "TBD");
}

#[test]
fn missing_required_extension_field_fails_import() {
    let broken = TEMPLE.replace(r#"data: { orcid: "0000-0001" }"#, "data: {}");
    let path = write_temp("sg_project_missing_orcid.yaml", &broken);
    let file = load_yaml(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let types = build_type_registry(&file).unwrap();
    let registry = GraphRegistry::new();
    let err = import_into(&file, &registry, &types).unwrap_err();
    assert!(matches!(err, ProjectError::Graph(_)));
    assert!(registry.is_empty());
}

#[test]
fn dangling_edge_is_a_validation_error() {
    let broken = TEMPLE.replace("to: a1", "to: US99");
    let path = write_temp("sg_project_dangling.yaml", &broken);
    let err = load_yaml(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::MissingReference { ref id, .. }) if id == "US99"
    ));
}

#[test]
fn roundtrip_yaml_and_json() {
    let path = write_temp("sg_project_roundtrip_src.yaml", TEMPLE);
    let file = load_yaml(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let yaml = std::env::temp_dir().join("sg_project_roundtrip.yaml");
    save_yaml(&yaml, &file).unwrap();
    assert_eq!(load_yaml(&yaml).unwrap(), file);
    let _ = std::fs::remove_file(&yaml);

    let json = std::env::temp_dir().join("sg_project_roundtrip.json");
    save_json(&json, &file).unwrap();
    assert_eq!(load_json(&json).unwrap(), file);
    let _ = std::fs::remove_file(&json);
}

#[test]
fn minimal_file_takes_defaults() {
    let path = write_temp("sg_project_minimal.json", r#"{"version": 1}"#);
    let file = load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(file.export, ExportSettings::default());
    assert!(file.graphs.is_empty());
    assert!(file.kinds.is_empty());
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("sg_project_input.graphml");
    assert!(matches!(
        load(&path),
        Err(ProjectError::UnknownFormat { .. })
    ));
}
