//! One-shot batch job: reshape the raw dataset into the artifact the page
//! loads. Paths are fixed; there are no flags.

use std::path::Path;

use anyhow::Context;
use log::info;
use relation_graph_canvas::graph::transform::{self, RAW_DATA_PATH, TRANSFORMED_DATA_PATH};

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt().init();

	info!("Transforming {RAW_DATA_PATH} into {TRANSFORMED_DATA_PATH}");
	transform::run(Path::new(RAW_DATA_PATH), Path::new(TRANSFORMED_DATA_PATH))
		.with_context(|| format!("failed to transform {RAW_DATA_PATH}"))?;
	Ok(())
}
