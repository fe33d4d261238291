use chrono::NaiveDate;
use roster_engine::{
    AssignmentRule, DemandRule, Hospital, RosterAssignment, RosterInput, SolveResult, Worker,
};
use shared::{ShiftKind, Weekday};

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A plain hospital with weekly night demand on the given weekdays.
pub fn night_hospital(name: &str, weekdays: impl IntoIterator<Item = Weekday>) -> Hospital {
    let mut hospital = Hospital::new(name);
    hospital
        .demand
        .push(DemandRule::weekly(ShiftKind::Night, weekdays));
    hospital
}

/// A hospital demanding one shift on an explicit date list.
pub fn dated_hospital(
    name: &str,
    shift: ShiftKind,
    dates: impl IntoIterator<Item = NaiveDate>,
) -> Hospital {
    let mut hospital = Hospital::new(name);
    hospital.demand.push(DemandRule::on_dates(shift, dates));
    hospital
}

/// A worker accepting one shift at one hospital on the given weekdays.
pub fn worker_for(
    name: &str,
    hospital: &str,
    weekdays: impl IntoIterator<Item = Weekday>,
    shift: ShiftKind,
) -> Worker {
    let mut worker = Worker::new(name);
    worker
        .rules
        .push(AssignmentRule::new(hospital, weekdays, shift));
    worker
}

/// The worker holding (hospital, date, shift) in the result, if any.
pub fn assignee(result: &SolveResult, hospital: &str, date: NaiveDate, shift: ShiftKind) -> Option<String> {
    result
        .assignments
        .iter()
        .find(|a| a.hospital == hospital && a.date == date && a.shift == shift)
        .map(|a| a.worker.clone())
}

/// All duties one worker holds in the result.
pub fn duties_of<'a>(result: &'a SolveResult, worker: &str) -> Vec<&'a RosterAssignment> {
    result
        .assignments
        .iter()
        .filter(|a| a.worker == worker)
        .collect()
}

/// Objective bookkeeping invariant: selected assignments minus resolved
/// penalty mass equals the reported objective.
pub fn assert_objective_consistent(result: &SolveResult) {
    let expected = result.assignment_count() as f64 - result.total_penalty();
    assert!(
        (result.objective_value - expected).abs() < 1e-6,
        "objective {} != assignments {} - penalties {}",
        result.objective_value,
        result.assignment_count(),
        result.total_penalty()
    );
}

pub fn total_cost_of(result: &SolveResult, source: &str) -> f64 {
    result
        .penalty_items
        .iter()
        .filter(|item| item.source == source)
        .map(|item| item.cost)
        .sum()
}

/// Build an input around 2025-10 with Japan's October public holiday.
pub fn october_input() -> RosterInput {
    let mut input = RosterInput::new(2025, 10);
    input.holidays.insert(ymd(2025, 10, 13));
    input
}
