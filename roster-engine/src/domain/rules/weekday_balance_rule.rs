use good_lp::{constraint, Expression};
use serde_json::json;
use shared::{EngineResult, Weekday};

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Soft rule: keep non-night duty counts per weekday even across workers.
///
/// For every weekday, each worker's non-night count is pulled towards the
/// mean over the workers holding any non-night candidacy; deviation in
/// either direction is charged through one slack per (worker, weekday).
pub struct WeekdayBalanceRule {
    weight: f64,
}

impl WeekdayBalanceRule {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl ConstraintRule for WeekdayBalanceRule {
    fn name(&self) -> &'static str {
        "weekday_balance"
    }

    fn summary(&self) -> &'static str {
        "Non-night duties per weekday spread evenly across workers"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        check_weight(self.name(), self.weight)?;

        let active: Vec<_> = ctx
            .workers
            .iter()
            .filter(|worker| {
                ctx.universe
                    .worker_keys(&worker.name)
                    .iter()
                    .any(|key| !key.shift.is_night())
            })
            .collect();
        if active.len() < 2 {
            return Ok(());
        }

        for weekday in Weekday::ALL {
            let counts: Vec<(&str, Expression)> = active
                .iter()
                .map(|worker| {
                    let keys: Vec<&VarKey> = ctx
                        .universe
                        .worker_keys(&worker.name)
                        .iter()
                        .filter(|key| {
                            !key.shift.is_night() && Weekday::of(key.date) == weekday
                        })
                        .collect();
                    (worker.name.as_str(), model.sum(keys))
                })
                .collect();
            let any_candidates = ctx.universe.keys().any(|key| {
                !key.shift.is_night() && Weekday::of(key.date) == weekday
            });
            if !any_candidates {
                continue;
            }

            let total: Expression = counts.iter().map(|(_, c)| c.clone()).sum();
            let mean = total * (1.0 / counts.len() as f64);

            for (name, count) in counts {
                let deviation =
                    model.add_nonneg_slack(format!("weekday_dev_{}_{:?}", name, weekday));
                model.constrain(constraint!(
                    count.clone() - mean.clone() - deviation <= 0
                ));
                model.constrain(constraint!(mean.clone() - count - deviation <= 0));
                model.penalize(
                    Expression::from(deviation),
                    self.weight,
                    "weekday_balance",
                    json!({
                        "worker": name,
                        "weekday": format!("{:?}", weekday),
                    }),
                );
            }
        }
        Ok(())
    }
}
