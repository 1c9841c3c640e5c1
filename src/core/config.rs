//! Simulation-run configuration
//!
//! Configuration is plain data handed to constructors; there is no global
//! accessor. One simulation run builds its own clusterer and coordinator
//! from these values and drops them at teardown.

use serde::{Deserialize, Serialize};

/// Geometry of the grid agents move on, constant for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Extent of the x axis (world units)
    pub width: f32,
    /// Extent of the y axis (world units)
    pub height: f32,
    /// Extent of the z axis; None for 2D layouts
    pub depth: Option<f32>,
    /// Whether the grid wraps at its edges. When set, distances and
    /// cluster geometry use the shorter path across the seam.
    pub toroidal: bool,
}

impl GridConfig {
    pub fn new(width: f32, height: f32, toroidal: bool) -> Self {
        Self { width, height, depth: None, toroidal }
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!(
                "grid extents must be positive (got {} x {})",
                self.width, self.height
            ));
        }
        if let Some(depth) = self.depth {
            if depth <= 0.0 {
                return Err(format!("grid depth must be positive (got {})", depth));
            }
        }
        Ok(())
    }
}

/// Where an agent with no codified rules searches for an adoptable rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdoptionScope {
    /// Search every codified rule in the run
    Global,
    /// Search only rules held by members of the agent's current cluster
    ClusterOnly,
}

/// Tuning for the per-round rule coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Clusters below this size are skipped when recomputing round
    /// statistics (tiny clusters produce meaningless pressure spreads).
    pub min_cluster_size_for_stats: usize,
    /// Search scope for rule adoption by agents holding no codified rules
    pub adoption_scope: AdoptionScope,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            min_cluster_size_for_stats: 2,
            adoption_scope: AdoptionScope::Global,
        }
    }
}

impl CoordinatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_cluster_size_for_stats == 0 {
            return Err("min_cluster_size_for_stats must be at least 1".into());
        }
        Ok(())
    }
}
