use good_lp::Expression;
use serde_json::json;
use shared::{EngineResult, Preference};

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::linearize::shortfall_indicator;
use crate::domain::services::model::RosterModel;

/// Soft rule: honor Desired preferences.
///
/// Each Desired entry whose worker has candidate decisions at that
/// (date, shift) gets a shortfall indicator charged when the worker is
/// left unassigned there.
pub struct DesiredPreferenceRule {
    weight: f64,
}

impl DesiredPreferenceRule {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl ConstraintRule for DesiredPreferenceRule {
    fn name(&self) -> &'static str {
        "desired_preference"
    }

    fn summary(&self) -> &'static str {
        "Desired preferences are honored where possible"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::Preferences]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        check_weight(self.name(), self.weight)?;

        for entry in ctx.preferences()?.with_preference(Preference::Desired) {
            let matching: Vec<&VarKey> = ctx
                .universe
                .worker_keys(&entry.worker)
                .iter()
                .filter(|key| key.date == entry.date && key.shift == entry.shift)
                .collect();
            if matching.is_empty() {
                continue;
            }
            let assigned = model.sum(matching);
            let missed = shortfall_indicator(
                model,
                assigned,
                format!("desired_{}_{}_{}", entry.worker, entry.date, entry.shift),
            );
            model.penalize(
                Expression::from(missed),
                self.weight,
                "desired_preference",
                json!({
                    "worker": entry.worker,
                    "date": entry.date.to_string(),
                    "shift": entry.shift.as_str(),
                }),
            );
        }
        Ok(())
    }
}
