//! File-to-file runs of the transform job.

use std::fs;

use pretty_assertions::assert_eq;
use relation_graph_canvas::graph::transform;
use relation_graph_canvas::graph::{GraphData, GraphError};

const RAW: &str = r#"{
	"nodes": [
		{"id": "w1", "label": "Wallet 1", "attributes": {"node type": "Individual", "balance": 12}},
		{"id": "x1", "label": "Exchange", "attributes": {"node type": "Org"}},
		{"id": "m1", "label": "Mixer", "attributes": {}}
	],
	"edges": [
		{"source": "w1", "target": "x1", "size": 4, "id": "e0"},
		{"source": "x1", "target": "m1", "size": 0.5, "id": "e1"}
	]
}"#;

#[test]
fn writes_the_transformed_artifact() {
	let dir = tempfile::tempdir().unwrap();
	let (input, output) = (dir.path().join("raw.json"), dir.path().join("out.json"));
	fs::write(&input, RAW).unwrap();

	let data = transform::run(&input, &output).unwrap();
	let written = GraphData::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
	assert_eq!(written, data);
	assert_eq!(data.nodes.len(), 3);
	assert_eq!(data.nodes[2].group, None);
	assert_eq!(data.links[1].weight(), Some(0.5));
}

#[test]
fn rerunning_is_byte_identical() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("raw.json");
	fs::write(&input, RAW).unwrap();

	let (first, second) = (dir.path().join("first.json"), dir.path().join("second.json"));
	transform::run(&input, &first).unwrap();
	transform::run(&input, &second).unwrap();
	assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

	transform::run(&input, &first).unwrap();
	assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn missing_input_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let output = dir.path().join("out.json");
	let err = transform::run(&dir.path().join("absent.json"), &output).unwrap_err();
	assert!(matches!(err, GraphError::Io(_)));
	assert!(!output.exists());
}

#[test]
fn malformed_input_is_fatal() {
	let dir = tempfile::tempdir().unwrap();
	let (input, output) = (dir.path().join("raw.json"), dir.path().join("out.json"));
	fs::write(&input, "{\"nodes\": 7}").unwrap();
	assert!(matches!(
		transform::run(&input, &output),
		Err(GraphError::Json(_))
	));
	assert!(!output.exists());
}
