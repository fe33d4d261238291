use good_lp::Expression;
use serde_json::json;
use shared::{EngineResult, ShiftKind};

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::linearize::and_indicator;
use crate::domain::services::model::RosterModel;

/// Soft rule: discourage a night duty combined with a remote day or
/// afternoon duty on the same date.
pub struct NightRemoteSameDayRule {
    weight: f64,
}

impl NightRemoteSameDayRule {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl ConstraintRule for NightRemoteSameDayRule {
    fn name(&self) -> &'static str {
        "night_remote_same_day"
    }

    fn summary(&self) -> &'static str {
        "Avoid night plus remote day/afternoon duty on one date"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        check_weight(self.name(), self.weight)?;

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
                let remote_days: Vec<&VarKey> = keys
                    .iter()
                    .filter(|key| {
                        key.date == day.date
                            && matches!(key.shift, ShiftKind::Day | ShiftKind::Pm)
                            && ctx.is_remote_hospital(&key.hospital)
                    })
                    .collect();
                if remote_days.is_empty() {
                    continue;
                }

                let night_sum = model.sum(nights);
                let remote_sum = model.sum(remote_days);
                let both = and_indicator(
                    model,
                    night_sum,
                    remote_sum,
                    format!("night_remote_{}_{}", worker.name, day.date),
                );
                model.penalize(
                    Expression::from(both),
                    self.weight,
                    "night_remote_same_day",
                    json!({
                        "worker": worker.name,
                        "date": day.date.to_string(),
                    }),
                );
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
    use shared::Weekday;

    #[test]
    fn test_night_with_remote_afternoon_charged() {
        let mut input = RosterInput::new(2025, 10);
        let mut base = Hospital::new("H1");
        base.demand
            .push(DemandRule::weekly(ShiftKind::Night, [Weekday::Fri]));
        let mut remote = Hospital::new("R1");
        remote.is_remote = true;
        remote
            .demand
            .push(DemandRule::weekly(ShiftKind::Pm, [Weekday::Fri]));
        input.hospitals.extend([base, remote]);
        let mut worker = Worker::new("W1");
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Night));
        worker
            .rules
            .push(AssignmentRule::new("R1", [Weekday::Fri], ShiftKind::Pm));
        input.workers.push(worker);

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        NightRemoteSameDayRule::new(3.0)
            .apply(&mut model, &harness.ctx())
            .unwrap();

        // One indicator per Friday, each worth 3.0.
        assert_eq!(model.ledger().len(), 5);
        assert!(model.ledger().items().iter().all(|item| item.weight == 3.0));
    }

    #[test]
    fn test_non_remote_combination_is_free() {
        let mut input = RosterInput::new(2025, 10);
        let mut base = Hospital::new("H1");
        base.demand
            .push(DemandRule::weekly(ShiftKind::Night, [Weekday::Fri]));
        base.demand
            .push(DemandRule::weekly(ShiftKind::Pm, [Weekday::Fri]));
        input.hospitals.push(base);
        let mut worker = Worker::new("W1");
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Night));
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Pm));
        input.workers.push(worker);

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        NightRemoteSameDayRule::new(3.0)
            .apply(&mut model, &harness.ctx())
            .unwrap();

        assert_eq!(model.ledger().len(), 0);
    }
}
