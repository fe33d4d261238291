use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Preference, ShiftKind, Weekday};
use std::collections::BTreeSet;

/// Positive availability statement: the worker accepts `shift` duty at
/// `hospital` on the listed weekdays. A (hospital, weekday, shift) not
/// covered by any rule means the worker cannot be assigned there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub hospital: String,
    pub weekdays: BTreeSet<Weekday>,
    pub shift: ShiftKind,
}

impl AssignmentRule {
    pub fn new(
        hospital: impl Into<String>,
        weekdays: impl IntoIterator<Item = Weekday>,
        shift: ShiftKind,
    ) -> Self {
        Self {
            hospital: hospital.into(),
            weekdays: weekdays.into_iter().collect(),
            shift,
        }
    }
}

/// Worker entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub name: String,
    #[serde(default)]
    pub is_specialist: bool,
    #[serde(default)]
    pub rules: Vec<AssignmentRule>,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_specialist: false,
            rules: Vec::new(),
        }
    }
}

/// A single (worker, date, shift) preference declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub worker: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
    pub preference: Preference,
}

/// Per-date preference declarations. Absence of an entry means `Available`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceSet {
    entries: Vec<PreferenceEntry>,
}

impl PreferenceSet {
    pub fn new(entries: Vec<PreferenceEntry>) -> Self {
        Self { entries }
    }

    pub fn push(
        &mut self,
        worker: impl Into<String>,
        date: NaiveDate,
        shift: ShiftKind,
        preference: Preference,
    ) {
        self.entries.push(PreferenceEntry {
            worker: worker.into(),
            date,
            shift,
            preference,
        });
    }

    pub fn entries(&self) -> &[PreferenceEntry] {
        &self.entries
    }

    /// Entries declaring the given preference, in declaration order.
    pub fn with_preference(
        &self,
        preference: Preference,
    ) -> impl Iterator<Item = &PreferenceEntry> {
        self.entries
            .iter()
            .filter(move |e| e.preference == preference)
    }

    /// Effective preference at (worker, date, shift).
    pub fn get(&self, worker: &str, date: NaiveDate, shift: ShiftKind) -> Preference {
        self.entries
            .iter()
            .find(|e| e.worker == worker && e.date == date && e.shift == shift)
            .map(|e| e.preference)
            .unwrap_or(Preference::Available)
    }
}

/// A per-worker-per-hospital monthly assignment cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapEntry {
    pub worker: String,
    pub hospital: String,
    pub max_assignments: u32,
}

/// (worker, hospital) → maximum assignments across the month.
/// Absence of an entry means unbounded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapTable {
    entries: Vec<CapEntry>,
}

impl CapTable {
    pub fn new(entries: Vec<CapEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, worker: impl Into<String>, hospital: impl Into<String>, max: u32) {
        self.entries.push(CapEntry {
            worker: worker.into(),
            hospital: hospital.into(),
            max_assignments: max,
        });
    }

    pub fn entries(&self) -> &[CapEntry] {
        &self.entries
    }

    pub fn get(&self, worker: &str, hospital: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.worker == worker && e.hospital == hospital)
            .map(|e| e.max_assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_preference_defaults_to_available() {
        let prefs = PreferenceSet::default();
        let date = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();

        assert_eq!(prefs.get("W1", date, ShiftKind::Night), Preference::Available);
    }

    #[test]
    fn test_explicit_preference_wins() {
        let mut prefs = PreferenceSet::default();
        let date = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        prefs.push("W1", date, ShiftKind::Night, Preference::Forbidden);

        assert_eq!(prefs.get("W1", date, ShiftKind::Night), Preference::Forbidden);
        assert_eq!(prefs.get("W1", date, ShiftKind::Day), Preference::Available);
        assert_eq!(prefs.with_preference(Preference::Forbidden).count(), 1);
    }
}
