use good_lp::Expression;
use serde_json::json;
use shared::{EngineResult, Preference};

use super::{check_weight, ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::linearize::shortfall_indicator;
use crate::domain::services::model::RosterModel;

/// Soft rule: mildly prefer workers who explicitly volunteered as
/// Available for a (date, shift) over silent candidates. The shape is the
/// same as for Desired entries, at a fraction of the weight.
pub struct AvailablePreferenceRule {
    weight: f64,
}

impl AvailablePreferenceRule {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl ConstraintRule for AvailablePreferenceRule {
    fn name(&self) -> &'static str {
        "available_preference"
    }

    fn summary(&self) -> &'static str {
        "Explicit Available volunteers are used where possible"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::Preferences]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        check_weight(self.name(), self.weight)?;

        for entry in ctx.preferences()?.with_preference(Preference::Available) {
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
            let unused = shortfall_indicator(
                model,
                assigned,
                format!("available_{}_{}_{}", entry.worker, entry.date, entry.shift),
            );
            model.penalize(
                Expression::from(unused),
                self.weight,
                "available_preference",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        AssignmentRule, DemandRule, Hospital, PreferenceSet, RosterInput, Worker,
    };
    use crate::domain::rules::harness::RuleHarness;
    use chrono::NaiveDate;
    use shared::{ShiftKind, Weekday};

    #[test]
    fn test_only_explicit_entries_are_tracked() {
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

        let mut prefs = PreferenceSet::default();
        let friday = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
        prefs.push("W1", friday, ShiftKind::Night, Preference::Available);
        input.preferences = Some(prefs);

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        AvailablePreferenceRule::new(1.0)
            .apply(&mut model, &harness.ctx())
            .unwrap();

        // W2 volunteered nothing explicitly, so only W1's entry counts.
        assert_eq!(model.ledger().len(), 1);
        assert_eq!(model.ledger().items()[0].weight, 1.0);
        assert_eq!(model.ledger().items()[0].meta["worker"], "W1");
    }
}
