use good_lp::constraint;
use shared::{CoverageSlot, EngineResult, ShiftKind};

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Rule: on the last day of a holiday run, a university hospital's night
/// duty goes to a specialist.
///
/// Holiday runs are evaluated per hospital, including the hospital-local
/// holiday dates contributed by specified days.
pub struct SpecialistHolidayNightRule;

impl SpecialistHolidayNightRule {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintRule for SpecialistHolidayNightRule {
    fn name(&self) -> &'static str {
        "specialist_holiday_night"
    }

    fn summary(&self) -> &'static str {
        "University night duty on the last holiday of a run needs a specialist"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for hospital in ctx.hospitals.iter().filter(|h| h.is_university) {
            let extra = ctx.universe.extra_holidays(&hospital.name);
            for day in ctx.calendar.days() {
                if !ctx
                    .calendar
                    .is_last_day_of_holiday_run_with(day.date, &extra)
                {
                    continue;
                }
                let slot = CoverageSlot::new(hospital.name.clone(), day.date, ShiftKind::Night);
                if !ctx.universe.is_required(&slot) {
                    continue;
                }
                let non_specialists: Vec<&VarKey> = ctx
                    .universe
                    .slot_candidates(&slot)
                    .iter()
                    .filter(|key| {
                        ctx.worker(&key.worker)
                            .map_or(true, |worker| !worker.is_specialist)
                    })
                    .collect();
                if non_specialists.is_empty() {
                    continue;
                }
                let sum = model.sum(non_specialists);
                model.constrain(constraint!(sum == 0));
            }
        }
        Ok(())
    }
}
