use chrono::NaiveDate;
use shared::CoverageSlot;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::calendar::MonthCalendar;
use crate::domain::entities::{Hospital, SpecifiedDay, VarKey, Worker};

/// The feasible decision space for one month: the materializable keys,
/// the coverage points that must be staffed, and the per-hospital holiday
/// overrides contributed by specified days.
#[derive(Debug, Clone)]
pub struct VariableUniverse {
    keys: BTreeSet<VarKey>,
    required: BTreeSet<CoverageSlot>,
    by_slot: BTreeMap<CoverageSlot, Vec<VarKey>>,
    by_worker: BTreeMap<String, Vec<VarKey>>,
    hospital_holidays: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl VariableUniverse {
    pub fn keys(&self) -> impl Iterator<Item = &VarKey> {
        self.keys.iter()
    }

    pub fn var_count(&self) -> usize {
        self.keys.len()
    }

    pub fn required(&self) -> impl Iterator<Item = &CoverageSlot> {
        self.required.iter()
    }

    pub fn required_count(&self) -> usize {
        self.required.len()
    }

    pub fn is_required(&self, slot: &CoverageSlot) -> bool {
        self.required.contains(slot)
    }

    /// Candidate decisions for one coverage point, in key order.
    pub fn slot_candidates(&self, slot: &CoverageSlot) -> &[VarKey] {
        self.by_slot.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All keys involving one worker, in key order.
    pub fn worker_keys(&self, worker: &str) -> &[VarKey] {
        self.by_worker.get(worker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dates this hospital must additionally treat as holidays.
    pub fn extra_holidays(&self, hospital: &str) -> BTreeSet<NaiveDate> {
        self.hospital_holidays
            .get(hospital)
            .cloned()
            .unwrap_or_default()
    }

    /// Coverage points to name when the model comes back infeasible:
    /// points with no candidate worker at all, or, when every point has
    /// candidates, the points hanging on a single candidate.
    pub fn binding_diagnostics(&self) -> Vec<CoverageSlot> {
        let unstaffable: Vec<CoverageSlot> = self
            .required
            .iter()
            .filter(|slot| self.slot_candidates(slot).is_empty())
            .cloned()
            .collect();
        if !unstaffable.is_empty() {
            return unstaffable;
        }
        self.required
            .iter()
            .filter(|slot| self.slot_candidates(slot).len() == 1)
            .cloned()
            .collect()
    }
}

/// Materializes the decision space with a two-pass sieve over the
/// hospital × worker × date × shift product.
pub struct VariableBuilder<'a> {
    calendar: &'a MonthCalendar,
    hospitals: &'a [Hospital],
    workers: &'a [Worker],
    specified_days: &'a [SpecifiedDay],
}

impl<'a> VariableBuilder<'a> {
    pub fn new(
        calendar: &'a MonthCalendar,
        hospitals: &'a [Hospital],
        workers: &'a [Worker],
        specified_days: &'a [SpecifiedDay],
    ) -> Self {
        Self {
            calendar,
            hospitals,
            workers,
            specified_days,
        }
    }

    pub fn build(&self) -> VariableUniverse {
        let candidates = self.elevate_by_workers();
        let (required, hospital_holidays) = self.required_coverage();

        // Keep a candidate only where a hospital actually demands coverage.
        let keys: BTreeSet<VarKey> = candidates
            .into_iter()
            .filter(|key| required.contains(&key.slot()))
            .collect();

        let mut by_slot: BTreeMap<CoverageSlot, Vec<VarKey>> = BTreeMap::new();
        let mut by_worker: BTreeMap<String, Vec<VarKey>> = BTreeMap::new();
        for key in &keys {
            by_slot.entry(key.slot()).or_default().push(key.clone());
            by_worker
                .entry(key.worker.clone())
                .or_default()
                .push(key.clone());
        }

        tracing::debug!(
            variables = keys.len(),
            coverage_points = required.len(),
            "decision space built"
        );

        VariableUniverse {
            keys,
            required,
            by_slot,
            by_worker,
            hospital_holidays,
        }
    }

    /// Pass 1: every (hospital, worker, date, shift) some availability
    /// rule speaks for.
    fn elevate_by_workers(&self) -> BTreeSet<VarKey> {
        let mut candidates = BTreeSet::new();
        for worker in self.workers {
            for rule in &worker.rules {
                for day in self.calendar.days() {
                    if rule.weekdays.contains(&day.weekday) {
                        candidates.insert(VarKey::new(
                            rule.hospital.clone(),
                            worker.name.clone(),
                            day.date,
                            rule.shift,
                        ));
                    }
                }
            }
        }
        candidates
    }

    /// Pass 2: expand hospital demand into concrete coverage points and
    /// merge the specified days.
    fn required_coverage(&self) -> (BTreeSet<CoverageSlot>, BTreeMap<String, BTreeSet<NaiveDate>>) {
        let mut required = BTreeSet::new();

        for hospital in self.hospitals {
            for rule in &hospital.demand {
                for date in self.demand_dates(rule) {
                    let day = match self.calendar.day(date) {
                        Some(day) => day,
                        None => continue,
                    };
                    // Non-night coverage pauses on public holidays; a
                    // specified day can force it back in below.
                    if !rule.shift.is_night() && day.is_public_holiday {
                        continue;
                    }
                    required.insert(CoverageSlot::new(hospital.name.clone(), date, rule.shift));
                }
            }
        }

        let mut hospital_holidays: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for specified in self.specified_days {
            if !self.calendar.contains(specified.date) {
                continue;
            }
            required.insert(CoverageSlot::new(
                specified.hospital.clone(),
                specified.date,
                specified.shift,
            ));
            if specified.counts_as_holiday {
                hospital_holidays
                    .entry(specified.hospital.clone())
                    .or_default()
                    .insert(specified.date);
            }
        }

        (required, hospital_holidays)
    }

    fn demand_dates(&self, rule: &crate::domain::entities::DemandRule) -> Vec<NaiveDate> {
        use shared::Frequency;

        match rule.frequency {
            Frequency::Weekly => self
                .calendar
                .days()
                .iter()
                .filter(|day| rule.weekdays.contains(&day.weekday))
                .map(|day| day.date)
                .collect(),
            // Both enumerate concrete dates; the biweekly cadence is
            // resolved by the caller that produced the enumeration.
            Frequency::Biweekly | Frequency::SpecificDays => {
                rule.dates.iter().copied().collect()
            }
        }
    }
}
