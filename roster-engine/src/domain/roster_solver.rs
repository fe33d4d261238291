use shared::EngineResult;

use crate::infrastructure::config::RosterSettings;

use super::calendar::MonthCalendar;
use super::entities::{RosterInput, SolveResult};
use super::rules::{build_registry, validate_context, RuleContext};
use super::services::{RosterModel, SolverDriver, VariableBuilder};
use super::validation::validate_input;

/// The engine pipeline: calendar, variable sieve, rule application,
/// solve, extraction. One `solve` call is one independent solver
/// session; callers wanting several months run several sessions.
pub struct RosterSolver {
    settings: RosterSettings,
}

impl RosterSolver {
    pub fn new(settings: RosterSettings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &RosterSettings {
        &self.settings
    }

    pub fn solve(&self, input: &RosterInput) -> EngineResult<SolveResult> {
        let span =
            tracing::info_span!("roster_solve", year = input.year, month = input.month);
        let _guard = span.enter();

        validate_input(input)?;
        let registry = build_registry(&self.settings)?;

        let calendar = MonthCalendar::build(input.year, input.month, &input.holidays)?;
        let universe = VariableBuilder::new(
            &calendar,
            &input.hospitals,
            &input.workers,
            &input.specified_days,
        )
        .build();

        let mut model = RosterModel::new();
        model.materialize(universe.keys().cloned());

        let ctx = RuleContext {
            calendar: &calendar,
            hospitals: &input.hospitals,
            workers: &input.workers,
            universe: &universe,
            preferences: input.preferences.as_ref(),
            caps: input.caps.as_ref(),
            settings: &self.settings,
        };
        validate_context(&registry, &ctx)?;

        for rule in &registry {
            tracing::debug!(rule = rule.name(), "applying rule");
            rule.apply(&mut model, &ctx)?;
        }
        tracing::info!(
            variables = model.decision_count(),
            constraints = model.constraint_count(),
            penalty_items = model.ledger().len(),
            rules = registry.len(),
            "model assembled"
        );

        SolverDriver::new(&self.settings).solve(model, &universe)
    }
}
