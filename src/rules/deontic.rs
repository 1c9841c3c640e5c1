//! Deontic operators: the obligation level of a normative statement

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeonticOp {
    Obliged,
    Permitted,
    Forbidden,
}

impl DeonticOp {
    /// The operator a sanctioning rule flips to.
    ///
    /// The table is deliberately not an involution: Permitted inverts to
    /// Forbidden, while Forbidden inverts to Obliged. Hosts deriving
    /// sanctions depend on this exact mapping.
    pub fn invert(self) -> Self {
        match self {
            DeonticOp::Obliged => DeonticOp::Forbidden,
            DeonticOp::Forbidden => DeonticOp::Obliged,
            DeonticOp::Permitted => DeonticOp::Forbidden,
        }
    }
}

impl std::fmt::Display for DeonticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeonticOp::Obliged => "OBLIGED",
            DeonticOp::Permitted => "PERMITTED",
            DeonticOp::Forbidden => "FORBIDDEN",
        };
        f.write_str(s)
    }
}

/// An operator plus the subjective pressure behind it.
///
/// Equality considers the operator only; two deontics with different
/// strengths but the same operator are equal. `delta` feeds the per-round
/// pressure statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Deontic {
    pub op: DeonticOp,
    pub delta: f32,
}

impl Deontic {
    pub fn new(op: DeonticOp, delta: f32) -> Self {
        Self { op, delta }
    }
}

impl PartialEq for Deontic {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op
    }
}

impl Eq for Deontic {}
