pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export the engine surface
pub use domain::calendar::{DayInfo, MonthCalendar};
pub use domain::entities::{
    AssignmentRule, CapEntry, CapTable, DemandRule, Hospital, PreferenceEntry, PreferenceSet,
    ResolvedPenalty, RosterAssignment, RosterInput, SolveResult, SpecifiedDay, VarKey, Worker,
};
pub use domain::RosterSolver;
pub use infrastructure::config::{RosterSettings, RuleWeights};
pub use presentation::{PenaltyReport, RulePenaltyTotal};
