//! Graph data schema, the raw-to-graph transform and the crate error type.

mod error;
pub mod transform;
mod types;

pub use error::{Endpoint, GraphError, Result};
pub use types::{GraphData, GraphLink, GraphNode, RawDataset, RawEntity, RawRelation};
