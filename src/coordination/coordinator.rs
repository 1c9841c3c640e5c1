//! Per-round coordination of institutional rule emergence
//!
//! Once per round the scheduler hands the coordinator the current cluster
//! partition. For every cluster, each registered rule-formation condition
//! may produce a candidate statement; candidates either collide with an
//! already codified rule (reported, no duplicate created) or are fixed as
//! a new institutional rule for all of that cluster's members. Agents also
//! individually offer candidates, which are matched against what they or
//! their surroundings already hold and end as adoptions or suggestions.
//!
//! One coordinator is built per simulation run and dropped (or `reset`) at
//! teardown; nothing here is process-global.

use crate::coordination::analytics::RoundAnalytics;
use crate::coordination::registry::{RuleRegistry, SharedBoard, SuggestionLedger};
use crate::core::config::{AdoptionScope, CoordinatorConfig};
use crate::core::types::{AgentId, Cluster, Round};
use crate::rules::statement::{EquivalenceLevel, StatementId, StatementStore};
use crate::spatial::density::DensityClusterer;
use std::collections::BTreeMap;

/// An externally supplied predicate over a cluster: when its conditions
/// hold it allocates and returns a candidate statement.
pub struct RuleFormationCondition {
    pub name: String,
    pub description: String,
    check: Box<dyn Fn(&Cluster, &mut StatementStore) -> Option<StatementId>>,
}

impl RuleFormationCondition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        check: impl Fn(&Cluster, &mut StatementStore) -> Option<StatementId> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            check: Box::new(check),
        }
    }
}

/// Per-condition participation counters, kept for event logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionStats {
    /// Rounds in which the condition produced a candidate
    pub times_fired: usize,
    /// Agents registered to rules this condition produced
    pub agents_represented: usize,
}

/// Outcome of attempting to fix a candidate for a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// The candidate was codified for every cluster member
    Fixed { rule: StatementId, members: usize },
    /// An ADIC-equivalent rule already exists for the cluster; no-op
    AlreadyCodified { existing: StatementId },
}

/// Outcome of an agent offering a candidate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdoptionOutcome {
    /// The agent already holds an ADIC-equivalent rule
    AlreadyRepresented { existing: StatementId },
    /// An existing compatible rule was adopted by the agent
    Adopted { existing: StatementId },
    /// No compatible rule found; candidate recorded as pending suggestion
    Suggested,
}

pub struct RuleCoordinator {
    config: CoordinatorConfig,
    store: StatementStore,
    registry: RuleRegistry,
    suggestions: SuggestionLedger,
    board: SharedBoard,
    conditions: Vec<RuleFormationCondition>,
    condition_stats: Vec<ConditionStats>,
    analytics: RoundAnalytics,
    round: Round,
}

impl RuleCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            store: StatementStore::new(),
            registry: RuleRegistry::new(),
            suggestions: SuggestionLedger::new(),
            board: SharedBoard::new(),
            conditions: Vec::new(),
            condition_stats: Vec::new(),
            analytics: RoundAnalytics::new(),
            round: 0,
        }
    }

    pub fn add_condition(&mut self, condition: RuleFormationCondition) {
        self.conditions.push(condition);
        self.condition_stats.push(ConditionStats::default());
    }

    pub fn store(&self) -> &StatementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StatementStore {
        &mut self.store
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn suggestions(&self) -> &SuggestionLedger {
        &self.suggestions
    }

    pub fn analytics(&self) -> &RoundAnalytics {
        &self.analytics
    }

    pub fn condition_stats(&self) -> &[ConditionStats] {
        &self.condition_stats
    }

    pub fn round(&self) -> Round {
        self.round
    }

    /// One coordination pass over the current partition: refresh round
    /// statistics, then evaluate every rule-formation condition against
    /// every cluster and fix the candidates it yields.
    pub fn process_round(&mut self, clusterer: &DensityClusterer) {
        self.round += 1;
        self.analytics.recompute(
            clusterer.clusters(),
            &self.registry,
            &self.store,
            self.config.min_cluster_size_for_stats,
        );

        for cluster in clusterer.clusters() {
            for i in 0..self.conditions.len() {
                // Statements a condition allocates are kept only when its
                // candidate actually fixes; otherwise the tail is rolled
                // back so colliding rounds do not grow the arena.
                let mark = self.store.len();
                let candidate = (self.conditions[i].check)(cluster, &mut self.store);
                let Some(candidate) = candidate else {
                    self.store.truncate(mark);
                    continue;
                };
                self.condition_stats[i].times_fired += 1;
                let outcome = self.fix_rule(candidate, cluster);
                match outcome {
                    FixOutcome::Fixed { members, .. } => {
                        self.condition_stats[i].agents_represented += members;
                        tracing::debug!(
                            round = self.round,
                            condition = %self.conditions[i].name,
                            rule = %self.store.describe(candidate),
                            members,
                            "fixed institutional rule"
                        );
                    }
                    FixOutcome::AlreadyCodified { existing } => {
                        tracing::debug!(
                            round = self.round,
                            condition = %self.conditions[i].name,
                            existing = %self.store.describe(existing),
                            "candidate matches codified rule; skipped"
                        );
                        self.store.truncate(mark);
                    }
                }
            }
        }
    }

    /// Try to codify `candidate` for every member of `cluster`.
    ///
    /// The cluster's first member is the probe: if any rule it already
    /// holds matches the candidate at ADIC level, the whole fix is a no-op
    /// reporting the existing rule. Idempotent by the same check.
    pub fn fix_rule(&mut self, candidate: StatementId, cluster: &Cluster) -> FixOutcome {
        let probe = &cluster.first().id;
        let existing = self
            .registry
            .rules_of(probe)
            .iter()
            .copied()
            .find(|&held| self.store.equivalent(held, candidate, EquivalenceLevel::Adic));
        if let Some(existing) = existing {
            return FixOutcome::AlreadyCodified { existing };
        }
        for member in cluster.members() {
            self.registry.register(member.id.clone(), candidate);
        }
        FixOutcome::Fixed {
            rule: candidate,
            members: cluster.len(),
        }
    }

    /// An agent individually offers a candidate rule.
    ///
    /// Agents already holding an ADIC-equivalent rule are represented and
    /// any pending suggestion is dropped. Agents holding other rules keep
    /// the candidate as their pending suggestion. Agents holding nothing
    /// search the configured scope for a compatible codified rule to adopt
    /// before falling back to a suggestion.
    pub fn check_for_suggestion_or_adoption(
        &mut self,
        agent: &AgentId,
        candidate: StatementId,
        clusterer: &DensityClusterer,
    ) -> AdoptionOutcome {
        let held = self.registry.rules_of(agent);
        if !held.is_empty() {
            let represented = held
                .iter()
                .copied()
                .find(|&r| self.store.equivalent(r, candidate, EquivalenceLevel::Adic));
            return match represented {
                Some(existing) => {
                    self.suggestions.clear_for(agent);
                    AdoptionOutcome::AlreadyRepresented { existing }
                }
                None => {
                    self.suggestions.suggest(agent.clone(), candidate);
                    AdoptionOutcome::Suggested
                }
            };
        }

        let adoptable = self
            .search_pool(agent, clusterer)
            .into_iter()
            .find(|&existing| {
                self.store
                    .equivalent(candidate, existing, EquivalenceLevel::Aic)
                    && self.may_adopt(candidate, existing)
            });
        match adoptable {
            Some(existing) => {
                self.registry.register(agent.clone(), existing);
                tracing::debug!(
                    round = self.round,
                    agent = %agent,
                    rule = %self.store.describe(existing),
                    "agent adopted codified rule"
                );
                AdoptionOutcome::Adopted { existing }
            }
            None => {
                self.suggestions.suggest(agent.clone(), candidate);
                AdoptionOutcome::Suggested
            }
        }
    }

    /// Codified rules an agent with no rules of its own searches, in
    /// deterministic order.
    fn search_pool(&self, agent: &AgentId, clusterer: &DensityClusterer) -> Vec<StatementId> {
        match self.config.adoption_scope {
            AdoptionScope::Global => self.registry.codified_rules().to_vec(),
            AdoptionScope::ClusterOnly => {
                let Some(cluster) = clusterer.cluster_neighbours(agent) else {
                    return Vec::new();
                };
                let mut pool = Vec::new();
                for member in cluster.members() {
                    for &rule in self.registry.rules_of(&member.id) {
                        if !pool.contains(&rule) {
                            pool.push(rule);
                        }
                    }
                }
                pool
            }
        }
    }

    /// The asymmetric adoption boundary: adopt on full equality, or at
    /// ADIC equality when the existing rule's consequence aim is not crisp
    /// while the candidate's is. A crisp-aimed existing rule demands an
    /// exact (full) match; a fuzzy-governed one accepts a crisp refinement.
    fn may_adopt(&self, candidate: StatementId, existing: StatementId) -> bool {
        if self
            .store
            .equivalent(candidate, existing, EquivalenceLevel::Adico)
        {
            return true;
        }
        self.store
            .equivalent(candidate, existing, EquivalenceLevel::Adic)
            && !self.consequence_aim_is_crisp(existing)
            && self.consequence_aim_is_crisp(candidate)
    }

    fn consequence_aim_is_crisp(&self, id: StatementId) -> bool {
        self.store
            .get(id)
            .and_then(|s| s.consequence)
            .and_then(|c| self.store.get(c))
            .map(|c| c.aim.is_crisp())
            .unwrap_or(false)
    }

    // === Cluster-scoped sharing ===

    pub fn share_tag(&mut self, agent: AgentId, tag: impl Into<String>) {
        self.board.share_tag(agent, tag);
    }

    pub fn share_info(
        &mut self,
        agent: AgentId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.board.share_info(agent, key, value);
    }

    /// Members of `agent`'s current cluster holding `tag`. Empty when the
    /// agent is unclustered (absence is information, not an error).
    pub fn agents_holding_tag(
        &self,
        tag: &str,
        agent: &AgentId,
        clusterer: &DensityClusterer,
    ) -> Vec<AgentId> {
        let Some(cluster) = clusterer.cluster_neighbours(agent) else {
            return Vec::new();
        };
        cluster
            .members()
            .iter()
            .filter(|m| self.board.tags_of(&m.id).iter().any(|t| t == tag))
            .map(|m| m.id.clone())
            .collect()
    }

    /// Values published under `key` by members of `agent`'s current
    /// cluster. Empty when unclustered.
    pub fn info_in_cluster(
        &self,
        key: &str,
        agent: &AgentId,
        clusterer: &DensityClusterer,
    ) -> Vec<(AgentId, String)> {
        let Some(cluster) = clusterer.cluster_neighbours(agent) else {
            return Vec::new();
        };
        cluster
            .members()
            .iter()
            .filter_map(|m| {
                self.board
                    .info_of(&m.id, key)
                    .map(|v| (m.id.clone(), v.to_string()))
            })
            .collect()
    }

    /// Tag counts over a cluster's members, for reporting.
    pub fn tag_distribution(&self, cluster: &Cluster) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for member in cluster.members() {
            for tag in self.board.tags_of(&member.id) {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Human-readable summary of one cluster for the reporting collaborators.
    pub fn summarize_cluster(
        &self,
        cluster_index: usize,
        clusterer: &DensityClusterer,
    ) -> Option<String> {
        let cluster = clusterer.clusters().get(cluster_index)?;
        let codified: usize = cluster
            .members()
            .iter()
            .map(|m| self.registry.rules_of(&m.id).len())
            .sum();
        let suggested = cluster
            .members()
            .iter()
            .filter(|m| self.suggestions.pending_for(&m.id).is_some())
            .count();
        let tags = self.tag_distribution(cluster);
        let mut summary = format!(
            "cluster {}: {} members, {} codified rule holdings, {} pending suggestions",
            cluster_index,
            cluster.len(),
            codified,
            suggested
        );
        if let Some(stats) = self.analytics.for_cluster(cluster_index) {
            summary.push_str(&format!(
                ", pressure {:.3} ± {:.3}",
                stats.pressure_mean, stats.pressure_stddev
            ));
        }
        if !tags.is_empty() {
            let rendered: Vec<String> =
                tags.iter().map(|(t, n)| format!("{t}:{n}")).collect();
            summary.push_str(&format!(", tags [{}]", rendered.join(", ")));
        }
        Some(summary)
    }

    /// Clear every registry for simulation teardown or reuse. Registered
    /// conditions stay but their counters restart.
    pub fn reset(&mut self) {
        self.store = StatementStore::new();
        self.registry.reset();
        self.suggestions.reset();
        self.board.reset();
        self.analytics.clear();
        for stats in &mut self.condition_stats {
            *stats = ConditionStats::default();
        }
        self.round = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GridConfig;
    use crate::core::types::{Point, Vertex};
    use crate::rules::aim::{Aim, FuzzyHandle};
    use crate::rules::deontic::{Deontic, DeonticOp};

    fn coordinator() -> RuleCoordinator {
        RuleCoordinator::new(CoordinatorConfig::default())
    }

    /// Two tight groups: (a, b) near the origin and (c, d) mid-grid.
    fn clustered_world() -> DensityClusterer {
        let mut clusterer = DensityClusterer::new(GridConfig::new(100.0, 100.0, true));
        clusterer.set_max_distance(5.0);
        clusterer.set_min_members(2);
        clusterer.set_vertices(vec![
            Vertex::new("a", Point::new(0.0, 0.0)),
            Vertex::new("b", Point::new(2.0, 0.0)),
            Vertex::new("c", Point::new(50.0, 50.0)),
            Vertex::new("d", Point::new(52.0, 50.0)),
            Vertex::new("loner", Point::new(80.0, 20.0)),
        ]);
        clusterer.apply_clustering().unwrap();
        clusterer
    }

    fn norm(store: &mut StatementStore, aim: &str) -> StatementId {
        store.norm(
            "villagers",
            Deontic::new(DeonticOp::Obliged, 0.5),
            Aim::crisp(aim),
            "in the commons",
        )
    }

    fn rule_with_consequence(store: &mut StatementStore, aim: Aim, cons_aim: Aim) -> StatementId {
        let sanction = store.norm("others", Deontic::new(DeonticOp::Obliged, 0.3), cons_aim, "on violation");
        store.rule(
            "villagers",
            Deontic::new(DeonticOp::Forbidden, 0.5),
            aim,
            "in the commons",
            sanction,
        )
    }

    #[test]
    fn test_fix_registers_all_members() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let candidate = norm(coord.store_mut(), "share");
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();

        let outcome = coord.fix_rule(candidate, &cluster);
        assert!(matches!(outcome, FixOutcome::Fixed { members: 2, .. }));
        assert_eq!(coord.registry().members_of(candidate).len(), 2);
        assert_eq!(coord.registry().rules_of(&AgentId::new("b")), &[candidate]);
    }

    #[test]
    fn test_fix_is_idempotent() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let candidate = norm(coord.store_mut(), "share");
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();

        coord.fix_rule(candidate, &cluster);
        let second = coord.fix_rule(candidate, &cluster);
        assert_eq!(second, FixOutcome::AlreadyCodified { existing: candidate });
        assert_eq!(coord.registry().members_of(candidate).len(), 2);
    }

    #[test]
    fn test_fix_rejects_adic_duplicate_with_different_delta() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();

        let first = norm(coord.store_mut(), "share");
        coord.fix_rule(first, &cluster);

        // Same operator, different strength: still an ADIC duplicate.
        let rival = coord.store_mut().norm(
            "villagers",
            Deontic::new(DeonticOp::Obliged, 0.9),
            Aim::crisp("share"),
            "in the commons",
        );
        let outcome = coord.fix_rule(rival, &cluster);
        assert_eq!(outcome, FixOutcome::AlreadyCodified { existing: first });
    }

    #[test]
    fn test_process_round_fires_conditions_per_cluster() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        coord.add_condition(RuleFormationCondition::new(
            "crowding",
            "any cluster of two or more proposes sharing",
            |cluster, store| {
                (cluster.len() >= 2).then(|| {
                    store.norm(
                        "villagers",
                        Deontic::new(DeonticOp::Obliged, 0.5),
                        Aim::crisp("share"),
                        "in the commons",
                    )
                })
            },
        ));

        coord.process_round(&clusterer);
        // Fired once per cluster, represented both clusters' members.
        assert_eq!(coord.condition_stats()[0].times_fired, 2);
        assert_eq!(coord.condition_stats()[0].agents_represented, 4);
        assert_eq!(coord.registry().rules_of(&AgentId::new("loner")).len(), 0);
        assert_eq!(coord.analytics().all().len(), 2);
    }

    #[test]
    fn test_process_round_is_idempotent_across_rounds() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        coord.add_condition(RuleFormationCondition::new(
            "crowding",
            "always proposes the same norm",
            |_, store| {
                Some(store.norm(
                    "villagers",
                    Deontic::new(DeonticOp::Obliged, 0.5),
                    Aim::crisp("share"),
                    "in the commons",
                ))
            },
        ));

        coord.process_round(&clusterer);
        coord.process_round(&clusterer);
        // Second round's candidates all collide at ADIC level.
        assert_eq!(coord.condition_stats()[0].agents_represented, 4);
        assert_eq!(coord.registry().rules_of(&AgentId::new("a")).len(), 1);
    }

    #[test]
    fn test_colliding_candidates_do_not_grow_the_store() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        coord.add_condition(RuleFormationCondition::new(
            "crowding",
            "always proposes the same full rule",
            |_, store| {
                let sanction = store.norm(
                    "others",
                    Deontic::new(DeonticOp::Obliged, 0.3),
                    Aim::crisp("shun"),
                    "on violation",
                );
                Some(store.rule(
                    "villagers",
                    Deontic::new(DeonticOp::Forbidden, 0.5),
                    Aim::crisp("hoard"),
                    "in the commons",
                    sanction,
                ))
            },
        ));

        coord.process_round(&clusterer);
        let after_first = coord.store().len();
        for _ in 0..5 {
            coord.process_round(&clusterer);
        }
        // Every later candidate collides at ADIC level and is rolled back.
        assert_eq!(coord.store().len(), after_first);
    }

    #[test]
    fn test_condition_returning_none_rolls_back_allocations() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        coord.add_condition(RuleFormationCondition::new(
            "hesitant",
            "allocates a draft but never proposes it",
            |_, store| {
                store.norm(
                    "villagers",
                    Deontic::new(DeonticOp::Obliged, 0.5),
                    Aim::crisp("share"),
                    "in the commons",
                );
                None
            },
        ));

        coord.process_round(&clusterer);
        assert!(coord.store().is_empty());
    }

    #[test]
    fn test_holder_of_matching_rule_is_already_represented() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = norm(coord.store_mut(), "share");
        coord.fix_rule(fixed, &cluster);

        let candidate = norm(coord.store_mut(), "share");
        let agent = AgentId::new("a");
        coord.suggestions.suggest(agent.clone(), candidate);

        let outcome = coord.check_for_suggestion_or_adoption(&agent, candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::AlreadyRepresented { existing: fixed });
        assert!(coord.suggestions().pending_for(&agent).is_none(), "pending suggestion cleared");
    }

    #[test]
    fn test_holder_of_other_rules_gets_suggestion() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = norm(coord.store_mut(), "share");
        coord.fix_rule(fixed, &cluster);

        let candidate = norm(coord.store_mut(), "rest");
        let agent = AgentId::new("a");
        let outcome = coord.check_for_suggestion_or_adoption(&agent, candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::Suggested);
        assert_eq!(coord.suggestions().pending_for(&agent), Some(candidate));
    }

    #[test]
    fn test_ruleless_agent_adopts_full_match() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = norm(coord.store_mut(), "share");
        coord.fix_rule(fixed, &cluster);

        // c holds nothing; offers an identical norm.
        let candidate = norm(coord.store_mut(), "share");
        let outcome =
            coord.check_for_suggestion_or_adoption(&AgentId::new("c"), candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::Adopted { existing: fixed });
        assert_eq!(coord.registry().rules_of(&AgentId::new("c")), &[fixed]);
    }

    #[test]
    fn test_cluster_scope_blocks_adoption_from_other_cluster() {
        let clusterer = clustered_world();
        let mut coord = RuleCoordinator::new(CoordinatorConfig {
            adoption_scope: AdoptionScope::ClusterOnly,
            ..CoordinatorConfig::default()
        });
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = norm(coord.store_mut(), "share");
        coord.fix_rule(fixed, &cluster);

        // c's cluster holds no rules, so nothing is adoptable there.
        let candidate = norm(coord.store_mut(), "share");
        let outcome =
            coord.check_for_suggestion_or_adoption(&AgentId::new("c"), candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::Suggested);
    }

    #[test]
    fn test_crisp_candidate_adopts_fuzzy_governed_rule() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = rule_with_consequence(
            coord.store_mut(),
            Aim::crisp("hoard"),
            Aim::Fuzzy(FuzzyHandle::new()),
        );
        coord.fix_rule(fixed, &cluster);

        // ADIC-equal candidate, crisp consequence aim: adoptable.
        let candidate = rule_with_consequence(
            coord.store_mut(),
            Aim::crisp("hoard"),
            Aim::crisp("shun"),
        );
        let outcome =
            coord.check_for_suggestion_or_adoption(&AgentId::new("c"), candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::Adopted { existing: fixed });
    }

    #[test]
    fn test_fuzzy_candidate_cannot_adopt_crisp_governed_rule() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = rule_with_consequence(
            coord.store_mut(),
            Aim::crisp("hoard"),
            Aim::crisp("shun"),
        );
        coord.fix_rule(fixed, &cluster);

        // Reverse direction: existing consequence aim crisp, candidate
        // fuzzy. Not full-equal, asymmetric branch rejects it.
        let candidate = rule_with_consequence(
            coord.store_mut(),
            Aim::crisp("hoard"),
            Aim::Fuzzy(FuzzyHandle::new()),
        );
        let outcome =
            coord.check_for_suggestion_or_adoption(&AgentId::new("c"), candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::Suggested);
    }

    #[test]
    fn test_full_equality_always_adoptable() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = rule_with_consequence(
            coord.store_mut(),
            Aim::crisp("hoard"),
            Aim::crisp("shun"),
        );
        coord.fix_rule(fixed, &cluster);

        let candidate = rule_with_consequence(
            coord.store_mut(),
            Aim::crisp("hoard"),
            Aim::crisp("shun"),
        );
        let outcome =
            coord.check_for_suggestion_or_adoption(&AgentId::new("c"), candidate, &clusterer);
        assert_eq!(outcome, AdoptionOutcome::Adopted { existing: fixed });
    }

    #[test]
    fn test_tag_queries_are_cluster_scoped() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        coord.share_tag(AgentId::new("a"), "trader");
        coord.share_tag(AgentId::new("c"), "trader");

        let near_b = coord.agents_holding_tag("trader", &AgentId::new("b"), &clusterer);
        assert_eq!(near_b, vec![AgentId::new("a")], "c is in another cluster");

        // Unclustered agents get no information, not an error.
        let near_loner = coord.agents_holding_tag("trader", &AgentId::new("loner"), &clusterer);
        assert!(near_loner.is_empty());
    }

    #[test]
    fn test_info_sharing_is_cluster_scoped() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        coord.share_info(AgentId::new("a"), "market", "north");
        coord.share_info(AgentId::new("c"), "market", "south");

        let seen = coord.info_in_cluster("market", &AgentId::new("b"), &clusterer);
        assert_eq!(seen, vec![(AgentId::new("a"), "north".to_string())]);
    }

    #[test]
    fn test_summary_reports_counts_and_pressure() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = norm(coord.store_mut(), "share");
        coord.fix_rule(fixed, &cluster);
        coord.share_tag(AgentId::new("a"), "trader");
        coord.process_round(&clusterer);

        let index = clusterer.cluster_index(&AgentId::new("a")).unwrap();
        let summary = coord.summarize_cluster(index, &clusterer).unwrap();
        assert!(summary.contains("2 members"), "got: {summary}");
        assert!(summary.contains("codified"), "got: {summary}");
        assert!(summary.contains("pressure"), "got: {summary}");
        assert!(summary.contains("trader:1"), "got: {summary}");
    }

    #[test]
    fn test_reset_clears_run_state() {
        let clusterer = clustered_world();
        let mut coord = coordinator();
        let cluster = clusterer.cluster_neighbours(&AgentId::new("a")).unwrap().clone();
        let fixed = norm(coord.store_mut(), "share");
        coord.fix_rule(fixed, &cluster);
        coord.process_round(&clusterer);

        coord.reset();
        assert!(coord.store().is_empty());
        assert!(coord.registry().codified_rules().is_empty());
        assert!(coord.suggestions().is_empty());
        assert_eq!(coord.round(), 0);
    }
}
