pub mod analytics;
pub mod coordinator;
pub mod registry;

pub use analytics::{ClusterStatistics, RoundAnalytics};
pub use coordinator::{
    AdoptionOutcome, ConditionStats, FixOutcome, RuleCoordinator, RuleFormationCondition,
};
pub use registry::{RuleRegistry, SharedBoard, SuggestionLedger};
