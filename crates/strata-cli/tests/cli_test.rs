use serde_json::Value;
use std::fs;
use std::path::Path;
use assert_cmd::Command;

const GRAPH: &str = r#"{
    "name": "shop",
    "nodes": [
        { "id": "A", "type": "Cluster" },
        { "id": "a1", "type": "Component", "parent": "A" },
        { "id": "B", "type": "Component" }
    ],
    "edges": [
        { "id": "order", "source": "a1", "target": "B", "type": "Call" }
    ]
}"#;

const LAYOUT: &str = r#"{
    "nodes": {
        "A":  { "x": 0.0, "z": 0.0, "width": 4.0, "depth": 4.0 },
        "a1": { "x": 0.0, "z": 0.0, "width": 1.0, "depth": 1.0 },
        "B":  { "x": 6.0, "z": 0.0, "width": 2.0, "depth": 2.0 }
    }
}"#;

fn write_inputs(dir: &Path) -> (String, String) {
    let graph = dir.join("shop.json");
    let layout = dir.join("shop.layout.json");
    fs::write(&graph, GRAPH).expect("write graph");
    fs::write(&layout, LAYOUT).expect("write layout");
    (
        graph.to_string_lossy().into_owned(),
        layout.to_string_lossy().into_owned(),
    )
}

fn strata() -> Command {
    Command::new(assert_cmd::cargo_bin!("strata"))
}

#[test]
fn cli_draws_a_scene() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (graph, layout) = write_inputs(tmp.path());

    let output = strata()
        .args(["draw", "--layout", layout.as_str(), graph.as_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let out: Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(out["graph"], "shop");
    assert_eq!(out["root"], "shop#ROOT");
    assert_eq!(out["hierarchyErrors"].as_array().map(Vec::len), Some(0));

    let edges = out["edges"].as_array().expect("edges");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["id"], "order");
    assert_eq!(edges[0]["sourceId"], "a1");
    assert_eq!(edges[0]["targetId"], "B");
    assert!(edges[0]["points"].as_array().expect("points").len() >= 2);

    let objects = out["scene"]["objects"].as_array().expect("objects");
    let node_ids: Vec<&str> = objects
        .iter()
        .filter_map(|o| o["nodeId"].as_str())
        .collect();
    for id in ["A", "a1", "B", "shop#ROOT"] {
        assert!(node_ids.contains(&id), "missing object for {id}");
    }
    assert!(objects.iter().any(|o| o["tag"] == "plane"));
}

#[test]
fn cli_reads_stdin_and_writes_out_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (_, layout) = write_inputs(tmp.path());
    let out = tmp.path().join("scene.json");

    strata()
        .args([
            "--layout",
            layout.as_str(),
            "--edge-layout",
            "none",
            "--pretty",
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .write_stdin(GRAPH)
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("read out");
    let value: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(0));
}

#[test]
fn cli_applies_a_settings_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (graph, layout) = write_inputs(tmp.path());
    let settings = tmp.path().join("settings.json5");
    fs::write(
        &settings,
        "{ edgeLayout: { kind: 'Straight', edgeWidth: 0.02 }, // comments are fine\n}",
    )
    .expect("write settings");

    let output = strata()
        .args([
            "draw",
            "--layout",
            layout.as_str(),
            "--settings",
            settings.to_string_lossy().as_ref(),
            graph.as_str(),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let out: Value = serde_json::from_slice(&output).expect("json output");
    let edge = &out["edges"][0];
    assert_eq!(edge["width"], 0.02);
    assert_eq!(edge["points"].as_array().map(Vec::len), Some(4));
}

#[test]
fn cli_reports_missing_layout_entries() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let (graph, _) = write_inputs(tmp.path());
    let layout = tmp.path().join("partial.json");
    fs::write(
        &layout,
        r#"{ "nodes": { "A": { "x": 0, "z": 0, "width": 1, "depth": 1 } } }"#,
    )
    .expect("write layout");

    let assert = strata()
        .args([
            "draw",
            "--layout",
            layout.to_string_lossy().as_ref(),
            graph.as_str(),
        ])
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("a1") || stderr.contains("`B`"), "stderr: {stderr}");
}

#[test]
fn cli_rejects_missing_layout_argument() {
    strata().args(["draw"]).assert().code(2);
    strata()
        .args(["draw", "--layout", "x.json", "--edge-layout", "curly"])
        .assert()
        .code(2);
}

#[test]
fn cli_prints_default_settings() {
    let output = strata()
        .arg("settings")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out: Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(out["edgeLayout"]["kind"], "Bundled");
    assert_eq!(out["maxRootFootprint"]["width"], 2.0);
}
