use good_lp::constraint;
use shared::EngineResult;

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Rule: no remote-hospital duty on the day after a night duty.
///
/// Linearized pairwise: each remote decision on d+1 plus the worker's
/// night sum on d stays at most one.
pub struct NoRemoteAfterNightRule;

impl NoRemoteAfterNightRule {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintRule for NoRemoteAfterNightRule {
    fn name(&self) -> &'static str {
        "no_remote_after_night"
    }

    fn summary(&self) -> &'static str {
        "No remote duty the day after a night duty"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for worker in ctx.workers {
            let keys = ctx.universe.worker_keys(&worker.name);
            for day in ctx.calendar.days() {
                let nights: Vec<&VarKey> = keys
                    .iter()
                    .filter(|key| key.date == day.date && key.shift.is_night())
                    .collect();
                if nights.is_empty() {
                    continue;
                }
                let next = match day.date.succ_opt() {
                    Some(next) => next,
                    None => continue,
                };
                let remotes: Vec<&VarKey> = keys
                    .iter()
                    .filter(|key| key.date == next && ctx.is_remote_hospital(&key.hospital))
                    .collect();
                if remotes.is_empty() {
                    continue;
                }

                let night_sum = model.sum(nights);
                for remote in remotes {
                    if let Some(var) = model.decision(remote) {
                        model.constrain(constraint!(night_sum.clone() + var <= 1));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AssignmentRule, DemandRule, Hospital, RosterInput, Worker};
    use crate::domain::rules::harness::RuleHarness;
    use shared::{ShiftKind, Weekday};

    #[test]
    fn test_remote_day_after_night_is_paired_off() {
        let mut input = RosterInput::new(2025, 10);
        let mut base = Hospital::new("H1");
        base.demand
            .push(DemandRule::weekly(ShiftKind::Night, [Weekday::Fri]));
        let mut remote = Hospital::new("R1");
        remote.is_remote = true;
        remote
            .demand
            .push(DemandRule::weekly(ShiftKind::Day, [Weekday::Sat]));
        input.hospitals.extend([base, remote]);
        let mut worker = Worker::new("W1");
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Night));
        worker
            .rules
            .push(AssignmentRule::new("R1", [Weekday::Sat], ShiftKind::Day));
        input.workers.push(worker);

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        NoRemoteAfterNightRule::new()
            .apply(&mut model, &harness.ctx())
            .unwrap();

        // One pairwise constraint per Friday-night/Saturday-remote pair;
        // Oct 31 has no Saturday successor inside the month.
        assert_eq!(model.constraint_count(), 4);
    }

    #[test]
    fn test_non_remote_next_day_is_ignored() {
        let mut input = RosterInput::new(2025, 10);
        let mut base = Hospital::new("H1");
        base.demand
            .push(DemandRule::weekly(ShiftKind::Night, [Weekday::Fri]));
        base.demand
            .push(DemandRule::weekly(ShiftKind::Day, [Weekday::Sat]));
        input.hospitals.push(base);
        let mut worker = Worker::new("W1");
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Night));
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Sat], ShiftKind::Day));
        input.workers.push(worker);

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        NoRemoteAfterNightRule::new()
            .apply(&mut model, &harness.ctx())
            .unwrap();

        assert_eq!(model.constraint_count(), 0);
    }
}
