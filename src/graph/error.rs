use std::fmt;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	/// The `source` id.
	Source,
	/// The `target` id.
	Target,
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Source => f.write_str("source"),
			Self::Target => f.write_str("target"),
		}
	}
}

/// Errors raised while transforming, loading or binding graph data.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// A link names a node id that is not in the node list.
	#[error("link {link} references unknown {endpoint} node `{id}`")]
	UnknownNode {
		/// Position of the link in the input.
		link: usize,
		/// The unresolved end.
		endpoint: Endpoint,
		/// The id as written in the input.
		id: String,
	},

	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	/// The dataset could not be parsed or serialized.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The dataset could not be read or written.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The browser fetch itself failed.
	#[error("fetching {url} failed: {message}")]
	Fetch {
		/// Requested URL.
		url: String,
		/// Stringified JS error.
		message: String,
	},

	/// The server answered with a non-success status.
	#[error("fetching {url} returned HTTP {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GraphError>;
