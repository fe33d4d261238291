use chrono::Duration;
use good_lp::constraint;
use shared::EngineResult;
use std::collections::BTreeMap;

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::services::model::RosterModel;

/// Rule: two night duties of the same worker are at least `min_gap` days
/// apart.
///
/// Linearized as a rolling window: for every worker and date d, the sum
/// of night decisions over [d, d + min_gap − 1] is at most one.
pub struct NightGapRule {
    min_gap: u32,
}

impl NightGapRule {
    pub fn new(min_gap: u32) -> Self {
        Self { min_gap }
    }
}

impl ConstraintRule for NightGapRule {
    fn name(&self) -> &'static str {
        "night_gap"
    }

    fn summary(&self) -> &'static str {
        "Minimum spacing between night duties"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for worker in ctx.workers {
            let mut nights = BTreeMap::new();
            for key in ctx.universe.worker_keys(&worker.name) {
                if key.shift.is_night() {
                    nights.entry(key.date).or_insert_with(Vec::new).push(key);
                }
            }
            if nights.len() < 2 {
                continue;
            }

            for day in ctx.calendar.days() {
                let end = match day
                    .date
                    .checked_add_signed(Duration::days(i64::from(self.min_gap) - 1))
                {
                    Some(end) => end,
                    None => continue,
                };
                let window: Vec<_> = nights
                    .range(day.date..=end)
                    .flat_map(|(_, keys)| keys.iter().copied())
                    .collect();
                if window.len() >= 2 {
                    let sum = model.sum(window);
                    model.constrain(constraint!(sum <= 1));
                }
            }
        }
        Ok(())
    }
}
