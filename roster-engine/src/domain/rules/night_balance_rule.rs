use good_lp::{constraint, Expression};
use serde_json::json;
use shared::EngineResult;

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Soft rule: keep every worker's night count close to the fleet target.
///
/// The target is `round(total night points / night-capable workers)`.
/// Deviation in either direction is charged linearly through an
/// over/under slack pair.
pub struct NightBalanceRule {
    weight: f64,
}

impl NightBalanceRule {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl ConstraintRule for NightBalanceRule {
    fn name(&self) -> &'static str {
        "night_balance"
    }

    fn summary(&self) -> &'static str {
        "Night duties balanced around the per-worker target"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        check_weight(self.name(), self.weight)?;

        let total_nights = ctx
            .universe
            .required()
            .filter(|slot| slot.shift.is_night())
            .count();
        let active: Vec<_> = ctx
            .workers
            .iter()
            .filter(|worker| {
                ctx.universe
                    .worker_keys(&worker.name)
                    .iter()
                    .any(|key| key.shift.is_night())
            })
            .collect();
        if total_nights == 0 || active.is_empty() {
            return Ok(());
        }
        let target = (total_nights as f64 / active.len() as f64).round();

        for worker in active {
            let nights: Vec<&VarKey> = ctx
                .universe
                .worker_keys(&worker.name)
                .iter()
                .filter(|key| key.shift.is_night())
                .collect();
            let count = model.sum(nights);
            let over = model.add_nonneg_slack(format!("night_over_{}", worker.name));
            let under = model.add_nonneg_slack(format!("night_under_{}", worker.name));
            model.constrain(constraint!(count - over + under == target));
            model.penalize(
                Expression::from(over) + under,
                self.weight,
                "night_balance",
                json!({
                    "worker": worker.name,
                    "target": target,
                }),
            );
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
    fn test_one_slack_pair_per_night_capable_worker() {
        let mut input = RosterInput::new(2025, 10);
        let mut hospital = Hospital::new("H1");
        hospital
            .demand
            .push(DemandRule::weekly(ShiftKind::Night, [Weekday::Fri]));
        input.hospitals.push(hospital);
        for name in ["W1", "W2"] {
            let mut worker = Worker::new(name);
            worker
                .rules
                .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Night));
            input.workers.push(worker);
        }
        // W3 never works nights.
        input.workers.push(Worker::new("W3"));

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        NightBalanceRule::new(2.0)
            .apply(&mut model, &harness.ctx())
            .unwrap();

        assert_eq!(model.ledger().len(), 2);
        assert_eq!(model.constraint_count(), 2);
        // Five nights over two candidates rounds to 3 each.
        assert_eq!(model.ledger().items()[0].meta["target"], 3.0);
    }

    #[test]
    fn test_no_nights_means_no_slack() {
        let mut input = RosterInput::new(2025, 10);
        input.hospitals.push(Hospital::new("H1"));
        input.workers.push(Worker::new("W1"));

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        NightBalanceRule::new(2.0)
            .apply(&mut model, &harness.ctx())
            .unwrap();

        assert_eq!(model.ledger().len(), 0);
    }
}
