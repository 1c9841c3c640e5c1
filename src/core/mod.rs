pub mod config;
pub mod error;
pub mod types;

pub use config::{AdoptionScope, CoordinatorConfig, GridConfig};
pub use error::{AgoraError, Result};
pub use types::{AgentId, Cluster, Point, Round, Vertex};
