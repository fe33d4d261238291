use good_lp::Expression;
use serde_json::json;
use shared::EngineResult;
use std::collections::BTreeMap;

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::services::linearize::and_indicator;
use crate::domain::services::model::RosterModel;

/// Soft rule: prefer night duties spread wider than the hard minimum.
///
/// Each consecutive pair of a worker's candidate night dates closer than
/// the window gets a pair indicator charged at `weight × (window − gap)`,
/// so tighter pairs cost more. Non-adjacent pairs are never charged.
pub struct NightSpreadRule {
    window: u32,
    weight: f64,
}

impl NightSpreadRule {
    pub fn new(window: u32, weight: f64) -> Self {
        Self { window, weight }
    }
}

impl ConstraintRule for NightSpreadRule {
    fn name(&self) -> &'static str {
        "night_spread"
    }

    fn summary(&self) -> &'static str {
        "Night duties spread out beyond the hard minimum"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        check_weight(self.name(), self.weight)?;

        for worker in ctx.workers {
            let mut nights = BTreeMap::new();
            for key in ctx.universe.worker_keys(&worker.name) {
                if key.shift.is_night() {
                    nights.entry(key.date).or_insert_with(Vec::new).push(key);
                }
            }
            let dates: Vec<_> = nights.keys().copied().collect();

            for pair_dates in dates.windows(2) {
                let (first, second) = (pair_dates[0], pair_dates[1]);
                let gap = (second - first).num_days() as u32;
                if gap >= self.window {
                    continue;
                }
                let a: Expression = model.sum(nights[&first].iter().copied());
                let b: Expression = model.sum(nights[&second].iter().copied());
                let pair = and_indicator(
                    model,
                    a,
                    b,
                    format!("night_pair_{}_{}_{}", worker.name, first, second),
                );
                model.penalize(
                    Expression::from(pair),
                    self.weight * f64::from(self.window - gap),
                    "night_spread",
                    json!({
                        "worker": worker.name,
                        "first": first.to_string(),
                        "second": second.to_string(),
                        "gap": gap,
                    }),
                );
            }
        }
        Ok(())
    }
}
