//! Reshape the raw attributed dataset into the `{nodes, links}` artifact.

use std::fs;
use std::path::Path;

use log::info;
use serde_json::{Map, Number, Value};

use super::{GraphData, GraphLink, GraphNode, RawDataset, Result};

/// Where the batch job reads the raw dataset from.
pub const RAW_DATA_PATH: &str = "data/crypto.json";
/// Where the batch job writes the artifact the page loads.
pub const TRANSFORMED_DATA_PATH: &str = "data/transformed.json";
/// Attribute holding an entity's display group.
pub const GROUP_ATTRIBUTE: &str = "node type";

/// Map raw entities and relations onto the renderer schema.
///
/// Ids are not checked here; dangling link endpoints are rejected when the
/// scene is bound.
pub fn transform(raw: RawDataset) -> GraphData {
	let nodes = raw
		.nodes
		.into_iter()
		.map(|entity| GraphNode {
			group: group_of(&entity.attributes),
			id: entity.id,
			label: entity.label,
		})
		.collect();

	let links = raw
		.edges
		.into_iter()
		.map(|relation| GraphLink {
			source: relation.source,
			target: relation.target,
			value: relation.size.map(integral),
		})
		.collect();

	GraphData { nodes, links }
}

/// Largest float below which every whole number is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole floats such as `4.0` or `1e2` are written as integers.
fn integral(number: Number) -> Number {
	match number.as_f64() {
		Some(f) if number.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
			if f < 0.0 {
				Number::from(f as i64)
			} else {
				Number::from(f.abs() as u64)
			}
		}
		_ => number,
	}
}

fn group_of(attributes: &Map<String, Value>) -> Option<String> {
	match attributes.get(GROUP_ATTRIBUTE)? {
		Value::Null => None,
		Value::String(group) => Some(group.clone()),
		other => Some(other.to_string()),
	}
}

/// Parse a raw dataset and return the serialized artifact.
pub fn transform_json(input: &str) -> Result<String> {
	let raw: RawDataset = serde_json::from_str(input)?;
	transform(raw).to_json_pretty()
}

/// Read `input`, transform it and write the artifact to `output`.
pub fn run(input: &Path, output: &Path) -> Result<GraphData> {
	let text = fs::read_to_string(input)?;
	let raw: RawDataset = serde_json::from_str(&text)?;
	let data = transform(raw);
	fs::write(output, data.to_json_pretty()?)?;
	info!(
		"Wrote {} nodes and {} links to {}",
		data.nodes.len(),
		data.links.len(),
		output.display()
	);
	Ok(data)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	const SAMPLE: &str = r#"{
		"nodes": [
			{"id": "a", "label": "A", "attributes": {"node type": "Individual"}},
			{"id": "b", "label": "B", "attributes": {"node type": "Org"}}
		],
		"edges": [{"source": "a", "target": "b", "size": 4}]
	}"#;

	#[test]
	fn maps_entities_and_relations() {
		let out = transform_json(SAMPLE).unwrap();
		let value: Value = serde_json::from_str(&out).unwrap();
		assert_eq!(
			value,
			json!({
				"nodes": [
					{"id": "a", "label": "A", "group": "Individual"},
					{"id": "b", "label": "B", "group": "Org"}
				],
				"links": [{"source": "a", "target": "b", "value": 4}]
			})
		);
		assert!(out.contains("\"value\": 4\n"));
		assert!(out.starts_with("{\n  \"nodes\": ["));
		assert!(!out.ends_with('\n'));
	}

	#[test]
	fn output_is_stable_across_runs() {
		let first = transform_json(SAMPLE).unwrap();
		let second = transform_json(SAMPLE).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn missing_group_is_ungrouped() {
		let raw = r#"{"nodes": [{"id": "x", "label": "X", "attributes": {}}, {"id": "y"}]}"#;
		let data: GraphData = serde_json::from_str(&transform_json(raw).unwrap()).unwrap();
		assert_eq!(data.nodes[0].group, None);
		assert_eq!(data.nodes[1].label, None);
		assert!(data.links.is_empty());
	}

	#[test]
	fn absent_values_are_omitted() {
		let raw = r#"{"nodes": [{"id": "x", "attributes": {"node type": null}}]}"#;
		let out = transform_json(raw).unwrap();
		assert!(!out.contains("group"));
		assert!(!out.contains("label"));
		assert!(!out.contains("null"));
	}

	#[test]
	fn non_string_group_uses_json_text() {
		let raw = r#"{"nodes": [{"id": "x", "attributes": {"node type": 3}}]}"#;
		let data: GraphData = serde_json::from_str(&transform_json(raw).unwrap()).unwrap();
		assert_eq!(data.nodes[0].group.as_deref(), Some("3"));
	}

	#[test]
	fn dangling_ids_pass_through() {
		let raw = r#"{"nodes": [], "edges": [{"source": "ghost", "target": "gone", "size": 1.5}]}"#;
		let data: GraphData = serde_json::from_str(&transform_json(raw).unwrap()).unwrap();
		assert_eq!(data.links[0].source, "ghost");
		assert_eq!(data.links[0].weight(), Some(1.5));
	}

	#[test]
	fn whole_float_sizes_are_written_as_integers() {
		let raw = r#"{"edges": [
			{"source": "a", "target": "b", "size": 4.0},
			{"source": "a", "target": "b", "size": 1e2},
			{"source": "a", "target": "b", "size": -3.0},
			{"source": "a", "target": "b", "size": 2.5}
		]}"#;
		let out = transform_json(raw).unwrap();
		assert!(out.contains("\"value\": 4\n"));
		assert!(out.contains("\"value\": 100\n"));
		assert!(out.contains("\"value\": -3\n"));
		assert!(out.contains("\"value\": 2.5\n"));
		assert!(!out.contains(".0"));
	}

	#[test]
	fn numeric_ids_are_accepted() {
		let raw = r#"{
			"nodes": [{"id": 1, "label": "One"}, {"id": "2"}],
			"edges": [{"source": 1, "target": 2}]
		}"#;
		let data: GraphData = serde_json::from_str(&transform_json(raw).unwrap()).unwrap();
		assert_eq!(data.nodes[0].id, "1");
		assert_eq!(data.nodes[1].id, "2");
		assert_eq!((data.links[0].source.as_str(), data.links[0].target.as_str()), ("1", "2"));
	}

	#[test]
	fn non_scalar_ids_are_rejected() {
		let raw = r#"{"nodes": [{"id": {"nested": true}}]}"#;
		assert!(matches!(
			transform_json(raw),
			Err(crate::graph::GraphError::Json(_))
		));
	}

	#[test]
	fn extra_keys_are_dropped() {
		let raw = r#"{"nodes": [], "edges": [], "meta": {"origin": "export"}}"#;
		let out = transform_json(raw).unwrap();
		assert!(!out.contains("meta"));
		assert!(!out.contains("edges"));
	}

	#[test]
	fn malformed_input_is_an_error() {
		assert!(matches!(
			transform_json("{\"nodes\": ["),
			Err(crate::graph::GraphError::Json(_))
		));
	}
}
