use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Shift slots a duty can occupy within a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Day,
    Night,
    Am,
    Pm,
}

impl ShiftKind {
    /// All shift kinds in their canonical order.
    pub const ALL: [ShiftKind; 4] = [
        ShiftKind::Day,
        ShiftKind::Night,
        ShiftKind::Am,
        ShiftKind::Pm,
    ];

    pub fn is_night(self) -> bool {
        self == ShiftKind::Night
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftKind::Day => "day",
            ShiftKind::Night => "night",
            ShiftKind::Am => "am",
            ShiftKind::Pm => "pm",
        }
    }
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Day of week, Monday first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

/// How often a demand rule produces coverage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,
    Biweekly,
    SpecificDays,
}

/// A worker's stance towards a concrete (date, shift).
///
/// Absence of an entry means `Available`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Preference {
    Desired,
    Available,
    Forbidden,
}

/// Outcome of a solver run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    TimeLimit,
    SolverError,
}

impl SolveStatus {
    /// Whether this status carries an integer assignment.
    pub fn has_assignment(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// A (hospital, date, shift) point that must be staffed by exactly one worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoverageSlot {
    pub hospital: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}

impl CoverageSlot {
    pub fn new(hospital: impl Into<String>, date: NaiveDate, shift: ShiftKind) -> Self {
        Self {
            hospital: hospital.into(),
            date,
            shift,
        }
    }
}

impl std::fmt::Display for CoverageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.hospital, self.date, self.shift)
    }
}
