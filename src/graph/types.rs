use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A node as consumed by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique node id.
	pub id: String,
	/// Display text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Display group, `None` when the source entity had no type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group: Option<String>,
}

/// A link between two node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Link magnitude, kept in its original numeric form.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Number>,
}

impl GraphLink {
	/// The link value as a float, if present and finite.
	pub fn weight(&self) -> Option<f64> {
		self.value.as_ref().and_then(Number::as_f64)
	}
}

/// The `{nodes, links}` artifact shared by the transform job and the page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// All nodes, in input order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// All links, in input order.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse the transformed artifact.
	pub fn from_json(text: &str) -> super::Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// Two-space indented JSON, no trailing newline.
	pub fn to_json_pretty(&self) -> super::Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

/// Source record for a node.
#[derive(Clone, Debug, Deserialize)]
pub struct RawEntity {
	/// Entity id.
	#[serde(deserialize_with = "id_text")]
	pub id: String,
	/// Entity label.
	#[serde(default)]
	pub label: Option<String>,
	/// Free-form attributes; `"node type"` carries the group.
	#[serde(default)]
	pub attributes: Map<String, Value>,
}

/// Source record for an edge.
#[derive(Clone, Debug, Deserialize)]
pub struct RawRelation {
	/// Source entity id.
	#[serde(deserialize_with = "id_text")]
	pub source: String,
	/// Target entity id.
	#[serde(deserialize_with = "id_text")]
	pub target: String,
	/// Edge size, becomes the link value.
	#[serde(default)]
	pub size: Option<Number>,
}

/// The raw attributed dataset. Keys other than `nodes` and `edges` are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawDataset {
	/// Entities.
	#[serde(default)]
	pub nodes: Vec<RawEntity>,
	/// Relations.
	#[serde(default)]
	pub edges: Vec<RawRelation>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(Number),
}

/// Raw ids may be strings or numbers; numbers keep their JSON text.
fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(text) => text,
		RawId::Number(number) => number.to_string(),
	})
}
