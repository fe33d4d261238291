use good_lp::{default_solver, Expression, ResolutionError, Solution, SolverModel, Variable};
use shared::{EngineError, EngineResult, SolveStatus};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::domain::entities::{RosterAssignment, SolveResult, VarKey};
use crate::infrastructure::config::RosterSettings;

use super::model::RosterModel;
use super::penalty::PenaltyLedger;
use super::variable_builder::VariableUniverse;

/// Builds the objective, runs the MILP solver, and reads the integer
/// assignment back. One driver call consumes one model; the session's
/// variables, constraints, and ledger end with it on every exit path.
pub struct SolverDriver<'a> {
    settings: &'a RosterSettings,
}

impl<'a> SolverDriver<'a> {
    pub fn new(settings: &'a RosterSettings) -> Self {
        Self { settings }
    }

    pub fn solve(
        &self,
        model: RosterModel,
        universe: &VariableUniverse,
    ) -> EngineResult<SolveResult> {
        let (variables, decisions, constraints, ledger) = model.into_parts();

        let assignment_total: Expression =
            decisions.values().map(|&v| Expression::from(v)).sum();
        let objective = assignment_total - ledger.weighted_sum();

        if let Some(limit) = self.settings.solver_time_limit_seconds {
            // The pure-Rust backend exposes no wall-clock knob; the bound
            // only takes effect on backends that support one.
            tracing::warn!(
                limit_seconds = limit,
                "solver backend ignores the configured time limit"
            );
        }

        tracing::debug!(
            variables = decisions.len(),
            constraints = constraints.len(),
            penalty_items = ledger.len(),
            "handing model to solver"
        );

        let mut problem = variables.maximise(objective.clone()).using(default_solver);
        for constraint in constraints {
            problem = problem.with(constraint);
        }

        let started = Instant::now();
        let outcome = problem.solve();
        let solve_time_seconds = started.elapsed().as_secs_f64();

        match outcome {
            Ok(solution) => {
                self.extract(&solution, objective, decisions, ledger, solve_time_seconds)
            }
            Err(ResolutionError::Infeasible) => {
                let unstaffable = universe.binding_diagnostics();
                tracing::info!(
                    binding_points = unstaffable.len(),
                    solve_time_seconds,
                    "solver reported infeasibility"
                );
                Err(EngineError::Infeasible { unstaffable })
            }
            Err(ResolutionError::Unbounded) => Err(EngineError::Solver(
                "Solver reported an unbounded model".to_string(),
            )),
            Err(ResolutionError::Other(message)) => Err(EngineError::Solver(message.to_string())),
            Err(ResolutionError::Str(message)) => Err(EngineError::Solver(message)),
        }
    }

    fn extract<S: Solution>(
        &self,
        solution: &S,
        objective: Expression,
        decisions: BTreeMap<VarKey, Variable>,
        ledger: PenaltyLedger,
        solve_time_seconds: f64,
    ) -> EngineResult<SolveResult> {
        let mut values = BTreeMap::new();
        let mut assignments = Vec::new();
        for (key, var) in &decisions {
            let raw = solution.value(*var);
            let rounded = raw.round();
            if (raw - rounded).abs() > 1e-4 || !(rounded == 0.0 || rounded == 1.0) {
                return Err(EngineError::Solver(format!(
                    "Decision {} resolved to non-binary value {}",
                    key, raw
                )));
            }
            let selected = rounded as u8;
            if selected == 1 {
                assignments.push(RosterAssignment::from(key.clone()));
            }
            values.insert(key.clone(), selected);
        }

        let penalty_items = ledger.resolve(solution);
        let objective_value = solution.eval(objective);

        tracing::info!(
            assignments = assignments.len(),
            objective = objective_value,
            solve_time_seconds,
            "solve finished"
        );

        Ok(SolveResult {
            status: SolveStatus::Optimal,
            objective_value,
            decisions: values,
            assignments,
            penalty_items,
            solve_time_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::MonthCalendar;
    use crate::domain::services::variable_builder::VariableBuilder;
    use chrono::NaiveDate;
    use good_lp::constraint;
    use serde_json::json;
    use shared::ShiftKind;
    use std::collections::BTreeSet;

    fn empty_universe() -> VariableUniverse {
        let calendar = MonthCalendar::build(2025, 10, &BTreeSet::new()).unwrap();
        VariableBuilder::new(&calendar, &[], &[], &[]).build()
    }

    fn key(worker: &str) -> VarKey {
        VarKey::new(
            "H1",
            worker,
            NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
            ShiftKind::Night,
        )
    }

    #[test]
    fn test_maximizes_assignments_under_constraints() {
        let settings = RosterSettings::default();
        let mut model = RosterModel::new();
        model.materialize([key("W1"), key("W2")]);
        let sum = model.sum([&key("W1"), &key("W2")]);
        model.constrain(constraint!(sum == 1));

        let result = SolverDriver::new(&settings)
            .solve(model, &empty_universe())
            .unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.assignment_count(), 1);
        assert!((result.objective_value - 1.0).abs() < 1e-6);
        assert_eq!(result.decisions.len(), 2);
    }

    #[test]
    fn test_penalty_mass_subtracts_from_objective() {
        let settings = RosterSettings::default();
        let mut model = RosterModel::new();
        model.materialize([key("W1")]);
        let var = model.decision(&key("W1")).unwrap();
        // Selecting the assignment costs 0.25, so it is still worth it.
        model.penalize(Expression::from(var), 0.25, "toll", json!({}));

        let result = SolverDriver::new(&settings)
            .solve(model, &empty_universe())
            .unwrap();

        assert_eq!(result.assignment_count(), 1);
        assert!((result.objective_value - 0.75).abs() < 1e-6);
        assert!((result.total_penalty() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_model_surfaces_diagnostics() {
        let settings = RosterSettings::default();
        let mut model = RosterModel::new();
        model.materialize([key("W1")]);
        let sum = model.sum([&key("W1")]);
        model.constrain(constraint!(sum == 2));

        let err = SolverDriver::new(&settings)
            .solve(model, &empty_universe())
            .unwrap_err();

        assert!(matches!(err, EngineError::Infeasible { .. }));
    }
}
