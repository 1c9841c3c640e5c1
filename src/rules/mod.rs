pub mod aim;
pub mod deontic;
pub mod statement;

pub use aim::{Aim, FuzzyHandle};
pub use deontic::{Deontic, DeonticOp};
pub use statement::{
    EquivalenceLevel, Statement, StatementId, StatementShape, StatementStore,
};
