//! Neighbor lookup for hover highlighting.

use std::collections::HashSet;

/// Which node pairs share a link. Built once after binding, read-only after.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	pairs: HashSet<(usize, usize)>,
	node_count: usize,
}

impl AdjacencyIndex {
	/// Index `links` over `node_count` nodes.
	pub fn new(node_count: usize, links: impl IntoIterator<Item = (usize, usize)>) -> Self {
		let pairs = links.into_iter().map(|(a, b)| key(a, b)).collect();
		Self { pairs, node_count }
	}

	/// True when `a` and `b` are linked, or are the same node.
	pub fn is_connected(&self, a: usize, b: usize) -> bool {
		(a == b && a < self.node_count) || self.pairs.contains(&key(a, b))
	}

	/// Number of distinct linked pairs.
	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	/// No links at all.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}
}

fn key(a: usize, b: usize) -> (usize, usize) {
	if a <= b { (a, b) } else { (b, a) }
}
