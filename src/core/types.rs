//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Unique identifier for agents (the agent's name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for AgentId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Simulation round counter (one clustering-and-coordination pass per round)
pub type Round = u64;

/// Position in grid space. 2D layouts leave z at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn new_3d(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Direct (non-wrapping) Euclidean distance
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// An agent pinned to its position for the current round.
///
/// Identity is the agent id alone: two vertices with the same id are the
/// same vertex regardless of coordinates. Vertices are rebuilt from current
/// positions every round and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: AgentId,
    pub point: Point,
}

impl Vertex {
    pub fn new(id: impl Into<AgentId>, point: Point) -> Self {
        Self { id: id.into(), point }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An ordered, non-empty group of vertices satisfying the density predicate.
///
/// Clusters hold no cross-round identity; a fresh partition is computed
/// every round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    members: Vec<Vertex>,
}

impl Cluster {
    /// Returns None for an empty member list; clusters are never empty.
    pub fn new(members: Vec<Vertex>) -> Option<Self> {
        if members.is_empty() {
            None
        } else {
            Some(Self { members })
        }
    }

    pub fn members(&self) -> &[Vertex] {
        &self.members
    }

    pub fn first(&self) -> &Vertex {
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: `new` rejects empty member lists, so this exists only
    /// to pair with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.members.iter().any(|v| &v.id == id)
    }

    pub fn points(&self) -> Vec<Point> {
        self.members.iter().map(|v| v.point).collect()
    }
}
