//! The aim slot of a normative statement: what the statement governs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference into the external fuzzy-evaluation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuzzyHandle(pub Uuid);

impl FuzzyHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FuzzyHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// What a statement aims at: either a fixed action label or a reference to
/// an externally evaluated fuzzy system.
///
/// Derived equality is literal (two fuzzy aims are equal only when they
/// reference the same system). Rule-equivalence checks use [`Aim::equivalent`]
/// instead, which treats any two fuzzy aims as interchangeable so that one
/// fuzzy-governed rule can stand in for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aim {
    Crisp(String),
    Fuzzy(FuzzyHandle),
}

impl Aim {
    pub fn crisp(label: impl Into<String>) -> Self {
        Aim::Crisp(label.into())
    }

    pub fn is_crisp(&self) -> bool {
        matches!(self, Aim::Crisp(_))
    }

    /// Equivalence as used by the statement-level checks: crisp aims
    /// compare literally, two fuzzy aims are always equivalent, and a
    /// crisp aim never matches a fuzzy one.
    pub fn equivalent(&self, other: &Aim) -> bool {
        match (self, other) {
            (Aim::Crisp(a), Aim::Crisp(b)) => a == b,
            (Aim::Fuzzy(_), Aim::Fuzzy(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Aim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aim::Crisp(label) => write!(f, "{label}"),
            Aim::Fuzzy(handle) => write!(f, "fuzzy:{}", handle.0),
        }
    }
}
