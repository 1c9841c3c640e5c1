//! Per-round aggregate statistics over the cluster partition
//!
//! Recomputed from scratch at the start of every coordination round for
//! clusters at or above the configured minimum size. "Pressure" is the sum
//! of deontic deltas over the codified rules a member holds; the mean and
//! standard deviation are taken over the members of a cluster.

use serde::{Deserialize, Serialize};

use crate::coordination::registry::RuleRegistry;
use crate::core::types::Cluster;
use crate::rules::statement::StatementStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterStatistics {
    /// Index into the round's cluster list
    pub cluster_index: usize,
    pub member_count: usize,
    pub pressure_mean: f32,
    pub pressure_stddev: f32,
}

#[derive(Debug, Default)]
pub struct RoundAnalytics {
    stats: Vec<ClusterStatistics>,
}

impl RoundAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.stats.clear();
    }

    /// Recompute statistics for every cluster with at least `min_size`
    /// members.
    pub fn recompute(
        &mut self,
        clusters: &[Cluster],
        registry: &RuleRegistry,
        store: &StatementStore,
        min_size: usize,
    ) {
        self.clear();
        for (index, cluster) in clusters.iter().enumerate() {
            if cluster.len() < min_size {
                continue;
            }
            let pressures: Vec<f32> = cluster
                .members()
                .iter()
                .map(|member| member_pressure(&member.id, registry, store))
                .collect();
            let n = pressures.len() as f32;
            let mean = pressures.iter().sum::<f32>() / n;
            let variance =
                pressures.iter().map(|p| (p - mean) * (p - mean)).sum::<f32>() / n;
            self.stats.push(ClusterStatistics {
                cluster_index: index,
                member_count: cluster.len(),
                pressure_mean: mean,
                pressure_stddev: variance.sqrt(),
            });
        }
    }

    pub fn all(&self) -> &[ClusterStatistics] {
        &self.stats
    }

    pub fn for_cluster(&self, cluster_index: usize) -> Option<&ClusterStatistics> {
        self.stats.iter().find(|s| s.cluster_index == cluster_index)
    }
}

/// Total deontic pressure an agent is under from the rules it accepted.
fn member_pressure(
    agent: &crate::core::types::AgentId,
    registry: &RuleRegistry,
    store: &StatementStore,
) -> f32 {
    registry
        .rules_of(agent)
        .iter()
        .filter_map(|&rule| store.get(rule))
        .filter_map(|s| s.deontic.as_ref())
        .map(|d| d.delta)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AgentId, Point, Vertex};
    use crate::rules::aim::Aim;
    use crate::rules::deontic::{Deontic, DeonticOp};

    fn cluster(names: &[&str]) -> Cluster {
        Cluster::new(
            names
                .iter()
                .map(|n| Vertex::new(*n, Point::new(0.0, 0.0)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_small_clusters_are_skipped() {
        let mut analytics = RoundAnalytics::new();
        let clusters = vec![cluster(&["a"]), cluster(&["b", "c", "d"])];
        analytics.recompute(&clusters, &RuleRegistry::new(), &StatementStore::new(), 2);
        assert_eq!(analytics.all().len(), 1);
        assert_eq!(analytics.all()[0].cluster_index, 1);
        assert!(analytics.for_cluster(0).is_none());
    }

    #[test]
    fn test_pressure_mean_and_spread() {
        let mut store = StatementStore::new();
        let rule = store.norm(
            "all",
            Deontic::new(DeonticOp::Obliged, 0.8),
            Aim::crisp("share"),
            "daily",
        );
        let mut registry = RuleRegistry::new();
        registry.register(AgentId::new("a"), rule);

        let mut analytics = RoundAnalytics::new();
        analytics.recompute(&[cluster(&["a", "b"])], &registry, &store, 2);

        let stats = analytics.for_cluster(0).unwrap();
        assert_eq!(stats.member_count, 2);
        // Pressures are {0.8, 0.0}: mean 0.4, population stddev 0.4.
        assert!((stats.pressure_mean - 0.4).abs() < 1e-6);
        assert!((stats.pressure_stddev - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_clear_drops_previous_round() {
        let mut analytics = RoundAnalytics::new();
        analytics.recompute(
            &[cluster(&["a", "b"])],
            &RuleRegistry::new(),
            &StatementStore::new(),
            2,
        );
        assert!(!analytics.all().is_empty());
        analytics.clear();
        assert!(analytics.all().is_empty());
    }
}
