//! Binds transformed graph data into scene elements.

use std::collections::HashMap;

use log::info;

use super::adjacency::AdjacencyIndex;
use super::config::SceneConfig;
use super::types::{LabelAnchor, LabelAnchorLink, SceneLink, SceneNode};
use crate::graph::{Endpoint, GraphData, GraphError, GraphNode, Result};

const FALLBACK_COLOR: &str = "#999";

/// Ordinal color scale keyed by group, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Palette {
	groups: Vec<Option<String>>,
	colors: Vec<String>,
}

impl Palette {
	/// Enumerate the distinct groups of `nodes`. Ungrouped nodes form their
	/// own key.
	pub fn new(colors: &[String], nodes: &[GraphNode]) -> Self {
		let mut groups: Vec<Option<String>> = Vec::new();
		for node in nodes {
			if !groups.contains(&node.group) {
				groups.push(node.group.clone());
			}
		}
		Self {
			groups,
			colors: colors.to_vec(),
		}
	}

	/// Distinct groups in assignment order.
	pub fn groups(&self) -> &[Option<String>] {
		&self.groups
	}

	/// Color for `group`. Colors repeat once the palette runs out.
	pub fn color(&self, group: Option<&str>) -> &str {
		let Some(pos) = self.groups.iter().position(|g| g.as_deref() == group) else {
			return FALLBACK_COLOR;
		};
		if self.colors.is_empty() {
			return FALLBACK_COLOR;
		}
		&self.colors[pos % self.colors.len()]
	}
}

/// The bound scene: markers, lines, label anchors and the adjacency index.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	/// Node markers, in input order.
	pub nodes: Vec<SceneNode>,
	/// Link lines, in input order.
	pub links: Vec<SceneLink>,
	/// Label anchors; pair `k` is `(2k, 2k + 1)`.
	pub anchors: Vec<LabelAnchor>,
	/// One link per anchor pair.
	pub anchor_links: Vec<LabelAnchorLink>,
	/// Neighborhood lookup for highlighting.
	pub adjacency: AdjacencyIndex,
	/// Group colors.
	pub palette: Palette,
	ids: HashMap<String, usize>,
}

impl Scene {
	/// Bind `data`. Fails on duplicate node ids and on links whose ends do not
	/// resolve.
	pub fn build(data: &GraphData, config: &SceneConfig) -> Result<Self> {
		let mut ids = HashMap::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			if ids.insert(node.id.clone(), i).is_some() {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
		}

		let resolve = |link: usize, endpoint: Endpoint, id: &str| {
			ids.get(id).copied().ok_or_else(|| GraphError::UnknownNode {
				link,
				endpoint,
				id: id.to_string(),
			})
		};
		let links = data
			.links
			.iter()
			.enumerate()
			.map(|(i, link)| -> Result<SceneLink> {
				Ok(SceneLink {
					source: resolve(i, Endpoint::Source, &link.source)?,
					target: resolve(i, Endpoint::Target, &link.target)?,
					value: link.weight(),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		let palette = Palette::new(&config.styles.palette, &data.nodes);
		let mut anchors = Vec::new();
		let mut anchor_links = Vec::new();
		let nodes = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let group = node.group.as_deref();
				let label_pair = (node.label.is_some() && config.label_policy.has_anchors(group))
					.then(|| {
						let k = anchors.len() / 2;
						anchors.push(LabelAnchor { node: i });
						anchors.push(LabelAnchor { node: i });
						anchor_links.push(LabelAnchorLink {
							source: 2 * k,
							target: 2 * k + 1,
							weight: 1.0,
						});
						k
					});
				SceneNode {
					id: node.id.clone(),
					label: node.label.clone(),
					group: node.group.clone(),
					color: palette.color(group).to_string(),
					radius: config.styles.radius(group),
					label_pair,
					label_by_default: config.label_policy.visible_by_default(group),
				}
			})
			.collect::<Vec<_>>();

		let adjacency = AdjacencyIndex::new(nodes.len(), links.iter().map(|l| (l.source, l.target)));

		info!(
			"Scene bound: {} nodes, {} links, {} groups, {} label anchors",
			nodes.len(),
			links.len(),
			palette.groups().len(),
			anchors.len()
		);

		Ok(Self {
			nodes,
			links,
			anchors,
			anchor_links,
			adjacency,
			palette,
			ids,
		})
	}

	/// Index of the node with `id`.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.ids.get(id).copied()
	}

	/// Number of anchor pairs.
	pub fn label_pairs(&self) -> usize {
		self.anchors.len() / 2
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::force_graph::config::{CATEGORY10, LabelPolicy};
	use crate::graph::GraphLink;

	fn node(id: &str, group: Option<&str>) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: Some(id.to_uppercase()),
			group: group.map(Into::into),
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			value: Some(4u64.into()),
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				node("a", Some("Individual")),
				node("b", Some("Org")),
				node("c", None),
				node("d", Some("Individual")),
			],
			links: vec![link("a", "b"), link("b", "c")],
		}
	}

	#[test]
	fn binds_links_to_indices() {
		let scene = Scene::build(&sample(), &SceneConfig::default()).unwrap();
		assert_eq!(
			scene.links[1],
			SceneLink {
				source: 1,
				target: 2,
				value: Some(4.0)
			}
		);
		assert_eq!(scene.links[0].stroke_width(), 2.0);
		assert!(scene.adjacency.is_connected(2, 1));
		assert!(!scene.adjacency.is_connected(0, 2));
		assert_eq!(scene.node_index("d"), Some(3));
	}

	#[test]
	fn unknown_target_fails_fast() {
		let mut data = sample();
		data.links.push(link("a", "zz"));
		let err = Scene::build(&data, &SceneConfig::default()).unwrap_err();
		assert!(matches!(
			err,
			GraphError::UnknownNode { link: 2, endpoint: Endpoint::Target, ref id } if id == "zz"
		));
		assert_eq!(err.to_string(), "link 2 references unknown target node `zz`");
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let mut data = sample();
		data.nodes.push(node("b", None));
		assert!(matches!(
			Scene::build(&data, &SceneConfig::default()),
			Err(GraphError::DuplicateNode(id)) if id == "b"
		));
	}

	#[test]
	fn palette_follows_first_seen_order() {
		let scene = Scene::build(&sample(), &SceneConfig::default()).unwrap();
		assert_eq!(
			scene.palette.groups(),
			&[Some("Individual".to_string()), Some("Org".to_string()), None]
		);
		assert_eq!(scene.nodes[0].color, CATEGORY10[0]);
		assert_eq!(scene.nodes[1].color, CATEGORY10[1]);
		assert_eq!(scene.nodes[2].color, CATEGORY10[2]);
		assert_eq!(scene.nodes[3].color, CATEGORY10[0]);
	}

	#[test]
	fn radius_comes_from_group_table() {
		let scene = Scene::build(&sample(), &SceneConfig::default()).unwrap();
		let radii: Vec<f64> = scene.nodes.iter().map(|n| n.radius).collect();
		assert_eq!(radii, vec![4.0, 7.0, 7.0, 4.0]);
	}

	#[test]
	fn all_nodes_policy_pairs_every_label() {
		let scene = Scene::build(&sample(), &SceneConfig::default()).unwrap();
		assert_eq!(scene.anchors.len(), 8);
		assert_eq!(scene.label_pairs(), 4);
		for (k, link) in scene.anchor_links.iter().enumerate() {
			assert_eq!((link.source, link.target, link.weight), (2 * k, 2 * k + 1, 1.0));
			assert_eq!(scene.anchors[2 * k], scene.anchors[2 * k + 1]);
		}
		assert!(!scene.nodes[0].label_by_default);
		assert!(scene.nodes[1].label_by_default);
	}

	#[test]
	fn filtered_policy_skips_excluded_groups() {
		let config = SceneConfig {
			label_policy: LabelPolicy::Filtered {
				excluded_groups: vec!["Individual".into()],
			},
			..SceneConfig::default()
		};
		let scene = Scene::build(&sample(), &config).unwrap();
		let owners: Vec<usize> = scene.anchors.iter().map(|a| a.node).collect();
		assert_eq!(owners, vec![1, 1, 2, 2]);
		assert_eq!(scene.nodes[0].label_pair, None);
		assert_eq!(scene.nodes[2].label_pair, Some(1));
		assert!(scene.nodes.iter().all(|n| n.label_by_default));
	}

	#[test]
	fn unlabelled_nodes_get_no_anchors() {
		let mut data = sample();
		data.nodes[1].label = None;
		let scene = Scene::build(&data, &SceneConfig::default()).unwrap();
		assert_eq!(scene.anchors.len(), 6);
		assert_eq!(scene.nodes[1].label_pair, None);
	}
}
