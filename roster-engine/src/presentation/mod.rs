pub mod penalty_report;

pub use penalty_report::{PenaltyReport, RulePenaltyTotal};
