pub mod params;
pub mod registry;

pub use params::{ContextParams, DeploymentDefaults, QnaParams, SearchParams, ToolParams, normalize};
