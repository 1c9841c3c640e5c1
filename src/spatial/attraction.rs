//! Attraction-sphere clustering
//!
//! Groups agents not by distance but by which named attraction spheres
//! their accumulated score is positive for. Agents sharing the same set of
//! positive spheres land in the same combinatorial cluster.
//!
//! Scores persist across rounds until explicitly cleared; `clear` zeroes
//! values but keeps the table shape so repeated rounds do not reallocate.
//!
//! Cluster keys concatenate sphere names in a deterministic alphabetical
//! order (per-agent scores live in a `BTreeMap`). The key format is
//! `[a|b|c]`; callers treating keys as opaque strings stay correct even if
//! the delimiter changes.

use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::core::types::AgentId;

/// Delimiter between sphere names inside a composite key.
const KEY_DELIMITER: char = '|';

/// How positive spheres condense into cluster keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// One key per agent: the full combination of its positive spheres.
    Composite,
    /// Every individual sphere key plus every cumulative prefix key as the
    /// combination is assembled. An agent with positive {a, b} lands under
    /// `[a]`, `[b]`, and `[a|b]`.
    Prefix,
}

pub struct AttractionClusterer {
    mode: GroupingMode,
    /// agent -> sphere -> accumulated signed score. BTreeMap keeps sphere
    /// iteration (and therefore key assembly) deterministic.
    scores: AHashMap<AgentId, BTreeMap<String, f32>>,
    /// Every sphere name ever seen, in registration order.
    sphere_names: Vec<String>,
    /// agent -> cluster keys it was filed under in the last pass
    agent_keys: AHashMap<AgentId, Vec<String>>,
    /// cluster key -> member agents from the last pass
    key_agents: AHashMap<String, Vec<AgentId>>,
}

impl AttractionClusterer {
    pub fn new(mode: GroupingMode) -> Self {
        Self {
            mode,
            scores: AHashMap::new(),
            sphere_names: Vec::new(),
            agent_keys: AHashMap::new(),
            key_agents: AHashMap::new(),
        }
    }

    /// Add `value` to the running score for (agent, sphere), creating
    /// entries as needed. New sphere names are registered globally.
    pub fn add_attraction_value(
        &mut self,
        agent: impl Into<AgentId>,
        sphere: impl Into<String>,
        value: f32,
    ) {
        let sphere = sphere.into();
        if !self.sphere_names.contains(&sphere) {
            self.sphere_names.push(sphere.clone());
        }
        *self
            .scores
            .entry(agent.into())
            .or_default()
            .entry(sphere)
            .or_insert(0.0) += value;
    }

    /// Reset every tracked score to zero, keeping agent and sphere keys so
    /// the table shape is stable across rounds.
    pub fn clear_attraction_values(&mut self) {
        for spheres in self.scores.values_mut() {
            for value in spheres.values_mut() {
                *value = 0.0;
            }
        }
    }

    pub fn sphere_names(&self) -> &[String] {
        &self.sphere_names
    }

    /// Recompute the combinatorial clustering over the whole score table,
    /// or over `subset` when supplied. Agents with no strictly positive
    /// sphere are skipped. Replaces both indices wholesale.
    pub fn cluster_matrix_entries(&mut self, subset: Option<&[AgentId]>) {
        let mut agent_keys: AHashMap<AgentId, Vec<String>> = AHashMap::new();
        let mut key_agents: AHashMap<String, Vec<AgentId>> = AHashMap::new();

        let mut file = |agent: &AgentId, key: String| {
            key_agents.entry(key.clone()).or_default().push(agent.clone());
            agent_keys.entry(agent.clone()).or_default().push(key);
        };

        for (agent, spheres) in &self.scores {
            if let Some(subset) = subset {
                if !subset.contains(agent) {
                    continue;
                }
            }
            let positive: Vec<&str> = spheres
                .iter()
                .filter(|(_, &score)| score > 0.0)
                .map(|(name, _)| name.as_str())
                .collect();
            if positive.is_empty() {
                continue;
            }
            match self.mode {
                GroupingMode::Composite => {
                    file(agent, composite_key(&positive));
                }
                GroupingMode::Prefix => {
                    for end in 1..=positive.len() {
                        file(agent, composite_key(&positive[end - 1..end]));
                        if end > 1 {
                            file(agent, composite_key(&positive[..end]));
                        }
                    }
                }
            }
        }

        self.agent_keys = agent_keys;
        self.key_agents = key_agents;
    }

    /// Cluster keys the agent was filed under in the last pass.
    pub fn spheres_for_agent(&self, agent: &AgentId) -> Option<&[String]> {
        self.agent_keys.get(agent).map(|k| k.as_slice())
    }

    /// Members of the given cluster key from the last pass.
    pub fn agents_for_sphere(&self, key: &str) -> Option<&[AgentId]> {
        self.key_agents.get(key).map(|a| a.as_slice())
    }
}

/// `[a|b|c]` over the given names.
fn composite_key(names: &[&str]) -> String {
    let mut key = String::with_capacity(2 + names.len() * 8);
    key.push('[');
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            key.push(KEY_DELIMITER);
        }
        key.push_str(name);
    }
    key.push(']');
    key
}
