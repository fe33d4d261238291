pub mod hospital;
pub mod roster;
pub mod worker;

pub use hospital::{DemandRule, Hospital, SpecifiedDay};
pub use roster::{ResolvedPenalty, RosterAssignment, RosterInput, SolveResult, VarKey};
pub use worker::{AssignmentRule, CapEntry, CapTable, PreferenceEntry, PreferenceSet, Worker};
