use anyhow::Result;
use chrono::NaiveDate;
use roster_engine::{
    AssignmentRule, CapTable, DemandRule, Hospital, PenaltyReport, PreferenceSet, RosterInput,
    RosterSettings, RosterSolver, Worker,
};
use shared::{Preference, ShiftKind, Weekday};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn ymd(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

/// A small October roster: two hospitals, four workers, one public
/// holiday, a handful of preferences.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut input = RosterInput::new(2025, 10);
    // Sports Day.
    input.holidays.insert(ymd(13));

    let mut central = Hospital::new("central");
    central.is_university = true;
    central.demand.push(DemandRule::weekly(
        ShiftKind::Night,
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ],
    ));
    central
        .demand
        .push(DemandRule::weekly(ShiftKind::Day, [Weekday::Mon, Weekday::Thu]));
    input.hospitals.push(central);

    let mut clinic = Hospital::new("hillside-clinic");
    clinic.is_remote = true;
    clinic
        .demand
        .push(DemandRule::weekly(ShiftKind::Am, [Weekday::Tue]));
    clinic
        .demand
        .push(DemandRule::weekly(ShiftKind::Pm, [Weekday::Tue]));
    input.hospitals.push(clinic);

    let everyday = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    for (name, specialist) in [
        ("asada", true),
        ("fujii", false),
        ("murata", false),
        ("sato", true),
    ] {
        let mut worker = Worker::new(name);
        worker.is_specialist = specialist;
        worker
            .rules
            .push(AssignmentRule::new("central", everyday, ShiftKind::Night));
        worker.rules.push(AssignmentRule::new(
            "central",
            [Weekday::Mon, Weekday::Thu],
            ShiftKind::Day,
        ));
        worker.rules.push(AssignmentRule::new(
            "hillside-clinic",
            [Weekday::Tue],
            ShiftKind::Am,
        ));
        worker.rules.push(AssignmentRule::new(
            "hillside-clinic",
            [Weekday::Tue],
            ShiftKind::Pm,
        ));
        input.workers.push(worker);
    }

    let mut preferences = PreferenceSet::default();
    preferences.push("fujii", ymd(17), ShiftKind::Night, Preference::Desired);
    preferences.push("murata", ymd(24), ShiftKind::Night, Preference::Forbidden);
    input.preferences = Some(preferences);

    let mut caps = CapTable::default();
    caps.push("asada", "central", 12);
    caps.push("sato", "central", 12);
    input.caps = Some(caps);

    let solver = RosterSolver::new(RosterSettings::default())?;
    let result = solver.solve(&input)?;

    println!(
        "{} duties assigned, objective {:.1}, solved in {:.3}s",
        result.assignment_count(),
        result.objective_value,
        result.solve_time_seconds
    );
    for assignment in &result.assignments {
        println!(
            "  {} {:>5}  {} -> {}",
            assignment.date, assignment.shift, assignment.hospital, assignment.worker
        );
    }

    let report = PenaltyReport::from_items(&result.penalty_items, 10);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
