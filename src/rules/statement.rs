//! Normative statements (attributes / deontic / aim / conditions /
//! invoking parent / consequence) and their equivalence levels
//!
//! Statements live in an arena owned by [`StatementStore`]; the invoking
//! parent and consequence slots are optional arena indices, not pointers,
//! so recursive equality and cloning stay simple and ownership never
//! cycles even though a rule and its consequence back-link each other.

use serde::{Deserialize, Serialize};

use crate::rules::aim::Aim;
use crate::rules::deontic::Deontic;

/// Arena index of a statement within its [`StatementStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementId(pub u32);

/// Which optional slots a statement populates. Derived live; nothing is
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementShape {
    /// No deontic, no consequence: a bare shared strategy
    Strategy,
    /// Deontic but no consequence: a norm
    Norm,
    /// Deontic and consequence: a full institutional rule
    Rule,
}

/// How strictly two statements are compared. Each level includes every
/// check of the levels below it, so passing a stricter level implies
/// passing all looser ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EquivalenceLevel {
    /// Attributes and conditions only
    Ac,
    /// Ac plus aim (two fuzzy aims always match; mixed never does)
    Aic,
    /// Aic plus deontic operator
    Adic,
    /// Adic plus invoking parent and consequence, recursively
    Adico,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub attributes: String,
    pub deontic: Option<Deontic>,
    pub aim: Aim,
    pub conditions: String,
    /// The rule this statement is the consequence of, if any
    pub invoking: Option<StatementId>,
    /// The "or else" statement, reachable only through this owner
    pub consequence: Option<StatementId>,
}

impl Statement {
    pub fn shape(&self) -> StatementShape {
        match (&self.deontic, &self.consequence) {
            (Some(_), Some(_)) => StatementShape::Rule,
            (Some(_), None) => StatementShape::Norm,
            _ => StatementShape::Strategy,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.invoking.is_some()
    }
}

/// Arena of statements for one simulation run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StatementStore {
    arena: Vec<Statement>,
}

impl StatementStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, statement: Statement) -> StatementId {
        let id = StatementId(self.arena.len() as u32);
        self.arena.push(statement);
        id
    }

    /// A bare shared strategy: attributes, aim, conditions.
    pub fn strategy(
        &mut self,
        attributes: impl Into<String>,
        aim: Aim,
        conditions: impl Into<String>,
    ) -> StatementId {
        self.push(Statement {
            attributes: attributes.into(),
            deontic: None,
            aim,
            conditions: conditions.into(),
            invoking: None,
            consequence: None,
        })
    }

    /// A norm: strategy plus a deontic operator.
    pub fn norm(
        &mut self,
        attributes: impl Into<String>,
        deontic: Deontic,
        aim: Aim,
        conditions: impl Into<String>,
    ) -> StatementId {
        self.push(Statement {
            attributes: attributes.into(),
            deontic: Some(deontic),
            aim,
            conditions: conditions.into(),
            invoking: None,
            consequence: None,
        })
    }

    /// A full institutional rule: norm plus an "or else" consequence.
    ///
    /// The consequence's invoking slot is back-linked to the new rule, so
    /// a consequence is reachable only through, and owned by, its rule.
    pub fn rule(
        &mut self,
        attributes: impl Into<String>,
        deontic: Deontic,
        aim: Aim,
        conditions: impl Into<String>,
        consequence: StatementId,
    ) -> StatementId {
        let id = self.push(Statement {
            attributes: attributes.into(),
            deontic: Some(deontic),
            aim,
            conditions: conditions.into(),
            invoking: None,
            consequence: Some(consequence),
        });
        if let Some(child) = self.arena.get_mut(consequence.0 as usize) {
            child.invoking = Some(id);
        }
        id
    }

    pub fn get(&self, id: StatementId) -> Option<&Statement> {
        self.arena.get(id.0 as usize)
    }

    /// Drop every statement allocated at or after `len`, releasing a tail
    /// of discarded candidates. Links from surviving statements into the
    /// dropped tail are severed so no id dangles.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.arena.len() {
            return;
        }
        self.arena.truncate(len);
        let cutoff = len as u32;
        for statement in &mut self.arena {
            if statement.invoking.is_some_and(|id| id.0 >= cutoff) {
                statement.invoking = None;
            }
            if statement.consequence.is_some_and(|id| id.0 >= cutoff) {
                statement.consequence = None;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Compare two statements at the given level. Total: an unknown id or
    /// a structural mismatch (one side missing a slot the other has) is
    /// "not equal", never a fault.
    pub fn equivalent(&self, a: StatementId, b: StatementId, level: EquivalenceLevel) -> bool {
        let mut open_pairs = Vec::new();
        self.equivalent_inner(a, b, level, &mut open_pairs)
    }

    fn equivalent_inner(
        &self,
        a: StatementId,
        b: StatementId,
        level: EquivalenceLevel,
        open_pairs: &mut Vec<(StatementId, StatementId)>,
    ) -> bool {
        let (Some(sa), Some(sb)) = (self.get(a), self.get(b)) else {
            return false;
        };

        if sa.attributes != sb.attributes || sa.conditions != sb.conditions {
            return false;
        }
        if level == EquivalenceLevel::Ac {
            return true;
        }

        if !sa.aim.equivalent(&sb.aim) {
            return false;
        }
        if level == EquivalenceLevel::Aic {
            return true;
        }

        // Option<Deontic> compares the operator only (delta is excluded
        // from Deontic equality); both-absent counts as equal.
        if sa.deontic != sb.deontic {
            return false;
        }
        if level == EquivalenceLevel::Adic {
            return true;
        }

        // Full equality recurses through the invoking parent and the
        // consequence. A rule and its consequence reference each other, so
        // a pair already under comparison is taken as equal to terminate.
        if open_pairs.contains(&(a, b)) || open_pairs.contains(&(b, a)) {
            return true;
        }
        open_pairs.push((a, b));
        let result = self.slot_equivalent(sa.invoking, sb.invoking, open_pairs)
            && self.slot_equivalent(sa.consequence, sb.consequence, open_pairs);
        open_pairs.pop();
        result
    }

    fn slot_equivalent(
        &self,
        a: Option<StatementId>,
        b: Option<StatementId>,
        open_pairs: &mut Vec<(StatementId, StatementId)>,
    ) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => {
                self.equivalent_inner(x, y, EquivalenceLevel::Adico, open_pairs)
            }
            _ => false,
        }
    }

    /// One-line rendering for logs and cluster summaries.
    pub fn describe(&self, id: StatementId) -> String {
        let Some(s) = self.get(id) else {
            return format!("<unknown statement {}>", id.0);
        };
        let mut out = format!("A({}) ", s.attributes);
        if let Some(d) = &s.deontic {
            out.push_str(&format!("D({}) ", d.op));
        }
        out.push_str(&format!("I({}) C({})", s.aim, s.conditions));
        if let Some(c) = s.consequence {
            out.push_str(&format!(" O[{}]", self.describe(c)));
        }
        out
    }
}
