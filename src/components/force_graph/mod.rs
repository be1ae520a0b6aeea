//! Force-directed rendering of entity graphs: scene binding, the node and
//! label-anchor simulations, per-step geometry and pointer interaction.

pub mod adjacency;
mod component;
pub mod config;
pub mod frame;
pub mod interaction;
mod render;
pub mod scene;
pub mod simulation;
pub mod state;
pub mod types;

pub use component::ForceGraphCanvas;
pub use config::{LabelPolicy, ReleasePolicy, SceneConfig};
pub use scene::Scene;
pub use state::ForceGraphState;
