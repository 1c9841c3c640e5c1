//! Density-based clustering of agent positions (DBSCAN variant)
//!
//! Groups vertices whose pairwise toroidal distance stays below a threshold
//! and which have at least a minimum number of neighbors. Vertices that
//! never reach the neighbor minimum are noise and appear in no cluster.
//!
//! The full vertex set is supplied anew each round; nothing persists across
//! rounds except the last computed partition, which stays queryable until
//! the next `apply_clustering` completes and replaces it wholesale.

use ahash::{AHashMap, AHashSet};

use crate::core::config::GridConfig;
use crate::core::error::{AgoraError, Result};
use crate::core::types::{AgentId, Cluster, Vertex};
use crate::spatial::toroidal;

pub struct DensityClusterer {
    grid: GridConfig,
    min_members: usize,
    max_distance: f32,
    /// None until the caller first supplies positions; an explicitly
    /// supplied empty set is a configuration error at clustering time.
    vertices: Option<Vec<Vertex>>,
    last_clusters: Vec<Cluster>,
    /// member id -> index into `last_clusters`
    last_index: AHashMap<AgentId, usize>,
}

impl DensityClusterer {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            min_members: 2,
            max_distance: 10.0,
            vertices: None,
            last_clusters: Vec::new(),
            last_index: AHashMap::new(),
        }
    }

    /// Replace the working vertex set. Does not trigger computation.
    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = Some(vertices);
    }

    /// Minimum neighborhood size (including the vertex itself) for a
    /// vertex to seed or extend a cluster. Applied on the next pass.
    pub fn set_min_members(&mut self, n: usize) {
        self.min_members = n;
    }

    /// Maximum toroidal distance between cluster members. Applied on the
    /// next pass.
    pub fn set_max_distance(&mut self, eps: f32) {
        self.max_distance = eps;
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Run one clustering pass over the working set.
    ///
    /// Silent no-op when no vertex set has been supplied yet; fails when a
    /// set was supplied but is empty. On failure the previous round's
    /// results remain queryable. O(n²) pairwise distance checks.
    pub fn apply_clustering(&mut self) -> Result<()> {
        let vertices = match &self.vertices {
            None => return Ok(()),
            Some(v) if v.is_empty() => return Err(AgoraError::EmptyVertexSet),
            Some(v) => v,
        };

        let mut visited: AHashSet<usize> = AHashSet::with_capacity(vertices.len());
        let mut clusters: Vec<Cluster> = Vec::new();

        for seed in 0..vertices.len() {
            if visited.contains(&seed) {
                continue;
            }
            let neighborhood = self.neighborhood(vertices, seed);
            if neighborhood.len() < self.min_members {
                // Below density here; may still be swept up by a later
                // core point's expansion.
                continue;
            }

            // Border vertices claimed by an earlier cluster stay there;
            // the density check above counts them, the member list must
            // not, or the partition stops being disjoint.
            let mut members: Vec<usize> = neighborhood
                .into_iter()
                .filter(|idx| !visited.contains(idx))
                .collect();
            visited.insert(seed);

            // Expansion is index-based over the growing list so members
            // appended during this pass are themselves expanded.
            let mut cursor = 0;
            while cursor < members.len() {
                let current = members[cursor];
                cursor += 1;
                if !visited.insert(current) {
                    continue;
                }
                let reachable = self.neighborhood(vertices, current);
                if reachable.len() >= self.min_members {
                    for idx in reachable {
                        if !visited.contains(&idx) && !members.contains(&idx) {
                            members.push(idx);
                        }
                    }
                }
            }

            let cluster_members: Vec<Vertex> =
                members.iter().map(|&i| vertices[i].clone()).collect();
            if let Some(cluster) = Cluster::new(cluster_members) {
                clusters.push(cluster);
            }
        }

        // Swap in the new partition and reverse index together.
        let mut index = AHashMap::with_capacity(vertices.len());
        for (cluster_idx, cluster) in clusters.iter().enumerate() {
            for member in cluster.members() {
                index.insert(member.id.clone(), cluster_idx);
            }
        }
        tracing::debug!(
            clusters = clusters.len(),
            clustered = index.len(),
            total = vertices.len(),
            "density clustering pass complete"
        );
        self.last_clusters = clusters;
        self.last_index = index;
        Ok(())
    }

    /// Indices of all vertices within `max_distance` of `of`, including
    /// `of` itself.
    fn neighborhood(&self, vertices: &[Vertex], of: usize) -> Vec<usize> {
        let center = &vertices[of].point;
        vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| toroidal::distance(center, &v.point, &self.grid) <= self.max_distance)
            .map(|(i, _)| i)
            .collect()
    }

    /// The partition computed by the most recent pass.
    pub fn clusters(&self) -> &[Cluster] {
        &self.last_clusters
    }

    /// The cluster containing the given agent, if it was clustered in the
    /// most recent pass. Returned by reference; callers must not rely on
    /// it surviving the next pass.
    pub fn cluster_neighbours(&self, id: &AgentId) -> Option<&Cluster> {
        self.last_index.get(id).map(|&i| &self.last_clusters[i])
    }

    /// Index of the agent's cluster in `clusters()`, if any.
    pub fn cluster_index(&self, id: &AgentId) -> Option<usize> {
        self.last_index.get(id).copied()
    }
}
