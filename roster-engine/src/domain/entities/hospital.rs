use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Frequency, ShiftKind, Weekday};
use std::collections::BTreeSet;

/// Coverage demand declared by a hospital.
///
/// `dates` is consulted only when `frequency` is `Biweekly` or
/// `SpecificDays`; `Weekly` demand is driven by `weekdays` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRule {
    pub shift: ShiftKind,
    pub weekdays: BTreeSet<Weekday>,
    pub frequency: Frequency,
    #[serde(default)]
    pub dates: BTreeSet<NaiveDate>,
}

impl DemandRule {
    /// Weekly demand on the given weekdays.
    pub fn weekly(shift: ShiftKind, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            shift,
            weekdays: weekdays.into_iter().collect(),
            frequency: Frequency::Weekly,
            dates: BTreeSet::new(),
        }
    }

    /// Demand on an explicit date enumeration.
    pub fn on_dates(shift: ShiftKind, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            shift,
            weekdays: BTreeSet::new(),
            frequency: Frequency::SpecificDays,
            dates: dates.into_iter().collect(),
        }
    }
}

/// Hospital entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub is_university: bool,
    #[serde(default)]
    pub demand: Vec<DemandRule>,
}

impl Hospital {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_remote: false,
            is_university: false,
            demand: Vec::new(),
        }
    }
}

/// An explicit (hospital, date, shift) that forces demand on that date,
/// regardless of the hospital's weekly rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecifiedDay {
    pub hospital: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
    /// Treat the date as a holiday for this hospital only.
    #[serde(default)]
    pub counts_as_holiday: bool,
}
