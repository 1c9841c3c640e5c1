//! Registries shared across one simulation run
//!
//! The codified-rule registry is bidirectional: rule -> accepting members
//! and member -> accepted rules. Both directions are private and mutated
//! only through [`RuleRegistry::register`], so the mirror invariant holds
//! by construction.

use ahash::AHashMap;

use crate::core::types::AgentId;
use crate::rules::statement::StatementId;

/// Codified rules and who has accepted them.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rule_members: AHashMap<StatementId, Vec<AgentId>>,
    agent_rules: AHashMap<AgentId, Vec<StatementId>>,
    /// Codification order, for deterministic "first match" searches
    codified_order: Vec<StatementId>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register acceptance of `rule` by `agent`, updating both directions.
    /// Registering the same pair again is a no-op.
    pub fn register(&mut self, agent: AgentId, rule: StatementId) {
        let members = self.rule_members.entry(rule).or_insert_with(|| {
            self.codified_order.push(rule);
            Vec::new()
        });
        if members.contains(&agent) {
            return;
        }
        members.push(agent.clone());
        self.agent_rules.entry(agent).or_default().push(rule);
    }

    /// Rules the agent has accepted, in acceptance order. Empty when the
    /// agent holds none.
    pub fn rules_of(&self, agent: &AgentId) -> &[StatementId] {
        self.agent_rules.get(agent).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Agents who accepted the rule. Empty when the rule is uncodified.
    pub fn members_of(&self, rule: StatementId) -> &[AgentId] {
        self.rule_members.get(&rule).map(|m| m.as_slice()).unwrap_or(&[])
    }

    /// Every codified rule, in codification order.
    pub fn codified_rules(&self) -> &[StatementId] {
        &self.codified_order
    }

    pub fn reset(&mut self) {
        self.rule_members.clear();
        self.agent_rules.clear();
        self.codified_order.clear();
    }
}

/// Pending rule suggestions, at most one per agent.
#[derive(Debug, Default)]
pub struct SuggestionLedger {
    pending: AHashMap<AgentId, StatementId>,
}

impl SuggestionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggest(&mut self, agent: AgentId, rule: StatementId) {
        self.pending.insert(agent, rule);
    }

    pub fn clear_for(&mut self, agent: &AgentId) {
        self.pending.remove(agent);
    }

    pub fn pending_for(&self, agent: &AgentId) -> Option<StatementId> {
        self.pending.get(agent).copied()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Tags and generic key/value information agents have shared. Queries over
/// this board are scoped to cluster membership by the coordinator; the
/// board itself just stores what each agent published.
#[derive(Debug, Default)]
pub struct SharedBoard {
    tags: AHashMap<AgentId, Vec<String>>,
    info: AHashMap<AgentId, AHashMap<String, String>>,
}

impl SharedBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn share_tag(&mut self, agent: AgentId, tag: impl Into<String>) {
        let tag = tag.into();
        let tags = self.tags.entry(agent).or_default();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    pub fn tags_of(&self, agent: &AgentId) -> &[String] {
        self.tags.get(agent).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn share_info(
        &mut self,
        agent: AgentId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.info
            .entry(agent)
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn info_of(&self, agent: &AgentId, key: &str) -> Option<&str> {
        self.info.get(agent).and_then(|m| m.get(key)).map(|s| s.as_str())
    }

    pub fn reset(&mut self) {
        self.tags.clear();
        self.info.clear();
    }
}
