use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{CoverageSlot, ShiftKind, SolveStatus};
use std::collections::{BTreeMap, BTreeSet};

use super::hospital::{Hospital, SpecifiedDay};
use super::worker::{CapTable, PreferenceSet, Worker};

/// Everything the engine consumes for one month.
///
/// `preferences` and `caps` are optional collaborator inputs; rules that
/// depend on them refuse to run when they are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterInput {
    pub year: i32,
    pub month: u32,
    pub hospitals: Vec<Hospital>,
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub specified_days: Vec<SpecifiedDay>,
    #[serde(default)]
    pub preferences: Option<PreferenceSet>,
    #[serde(default)]
    pub caps: Option<CapTable>,
    /// Externally provided public-holiday table.
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

impl RosterInput {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            hospitals: Vec::new(),
            workers: Vec::new(),
            specified_days: Vec::new(),
            preferences: None,
            caps: None,
            holidays: BTreeSet::new(),
        }
    }
}

/// Identity of one binary decision: assign `worker` to `hospital` on
/// `date` for `shift`. Totally ordered so model construction is
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarKey {
    pub hospital: String,
    pub worker: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}

impl VarKey {
    pub fn new(
        hospital: impl Into<String>,
        worker: impl Into<String>,
        date: NaiveDate,
        shift: ShiftKind,
    ) -> Self {
        Self {
            hospital: hospital.into(),
            worker: worker.into(),
            date,
            shift,
        }
    }

    /// The coverage point this decision would staff.
    pub fn slot(&self) -> CoverageSlot {
        CoverageSlot::new(self.hospital.clone(), self.date, self.shift)
    }
}

impl std::fmt::Display for VarKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.hospital, self.worker, self.date, self.shift
        )
    }
}

/// One concrete duty in the final roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterAssignment {
    pub hospital: String,
    pub worker: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}

impl From<VarKey> for RosterAssignment {
    fn from(key: VarKey) -> Self {
        Self {
            hospital: key.hospital,
            worker: key.worker,
            date: key.date,
            shift: key.shift,
        }
    }
}

/// A penalty ledger entry resolved against the solution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPenalty {
    pub source: String,
    pub weight: f64,
    /// Value the slack expression took in the solution.
    pub value: f64,
    /// `weight * value`, the objective mass attributed to this item.
    pub cost: f64,
    pub meta: serde_json::Value,
}

/// The engine's answer for one month.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub objective_value: f64,
    /// Every materialized decision with its 0/1 value.
    pub decisions: BTreeMap<VarKey, u8>,
    /// The selected duties, ordered by (hospital, worker, date, shift).
    pub assignments: Vec<RosterAssignment>,
    /// Ledger entries in insertion order, with resolved values.
    pub penalty_items: Vec<ResolvedPenalty>,
    /// Wall time of the solver call only.
    pub solve_time_seconds: f64,
}

impl SolveResult {
    /// Total weighted penalty mass in the objective.
    pub fn total_penalty(&self) -> f64 {
        self.penalty_items.iter().map(|p| p.cost).sum()
    }

    /// Number of selected duties.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
