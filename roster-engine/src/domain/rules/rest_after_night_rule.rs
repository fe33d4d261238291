use good_lp::Expression;
use serde_json::json;
use shared::{EngineResult, ShiftKind};

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::linearize::and_indicator;
use crate::domain::services::model::RosterModel;

/// Soft rule: discourage day or morning duty right after a night duty.
pub struct RestAfterNightRule {
    weight: f64,
}

impl RestAfterNightRule {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl ConstraintRule for RestAfterNightRule {
    fn name(&self) -> &'static str {
        "rest_after_night"
    }

    fn summary(&self) -> &'static str {
        "Rest after a night duty instead of day or morning work"
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
                let next = match day.date.succ_opt() {
                    Some(next) => next,
                    None => continue,
                };
                let morning_after: Vec<&VarKey> = keys
                    .iter()
                    .filter(|key| {
                        key.date == next
                            && matches!(key.shift, ShiftKind::Day | ShiftKind::Am)
                    })
                    .collect();
                if morning_after.is_empty() {
                    continue;
                }

                let night_sum = model.sum(nights);
                let morning_sum = model.sum(morning_after);
                let tired = and_indicator(
                    model,
                    night_sum,
                    morning_sum,
                    format!("tired_{}_{}", worker.name, day.date),
                );
                model.penalize(
                    Expression::from(tired),
                    self.weight,
                    "rest_after_night",
                    json!({
                        "worker": worker.name,
                        "night": day.date.to_string(),
                        "next_day": next.to_string(),
                    }),
                );
            }
        }
        Ok(())
    }
}
