use good_lp::constraint;
use shared::{EngineResult, Preference};

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Rule: a Forbidden preference zeroes every matching decision.
pub struct ForbiddenPreferenceRule;

impl ForbiddenPreferenceRule {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintRule for ForbiddenPreferenceRule {
    fn name(&self) -> &'static str {
        "forbidden_preference"
    }

    fn summary(&self) -> &'static str {
        "Forbidden preferences are never violated"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::Preferences]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for entry in ctx.preferences()?.with_preference(Preference::Forbidden) {
            let matching: Vec<&VarKey> = ctx
                .universe
                .worker_keys(&entry.worker)
                .iter()
                .filter(|key| key.date == entry.date && key.shift == entry.shift)
                .collect();
            if matching.is_empty() {
                continue;
            }
            let sum = model.sum(matching);
            model.constrain(constraint!(sum == 0));
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
    fn test_forbidden_entries_zero_matching_variables() {
        let mut input = RosterInput::new(2025, 10);
        let mut hospital = Hospital::new("H1");
        hospital
            .demand
            .push(DemandRule::weekly(ShiftKind::Night, [Weekday::Fri]));
        input.hospitals.push(hospital);
        let mut worker = Worker::new("W1");
        worker
            .rules
            .push(AssignmentRule::new("H1", [Weekday::Fri], ShiftKind::Night));
        input.workers.push(worker);

        let mut prefs = PreferenceSet::default();
        let friday = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        prefs.push("W1", friday, ShiftKind::Night, Preference::Forbidden);
        // No materialized variable matches this one.
        prefs.push("W1", friday, ShiftKind::Day, Preference::Forbidden);
        input.preferences = Some(prefs);

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        ForbiddenPreferenceRule::new()
            .apply(&mut model, &harness.ctx())
            .unwrap();

        assert_eq!(model.constraint_count(), 1);
    }

    #[test]
    fn test_missing_preferences_is_config_error() {
        let mut input = RosterInput::new(2025, 10);
        input.hospitals.push(Hospital::new("H1"));

        let harness = RuleHarness::new(input);
        let mut model = harness.model();
        let err = ForbiddenPreferenceRule::new()
            .apply(&mut model, &harness.ctx())
            .unwrap_err();

        assert!(matches!(err, shared::EngineError::Config(_)));
    }
}
