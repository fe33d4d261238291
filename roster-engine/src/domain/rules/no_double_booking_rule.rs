use good_lp::constraint;
use shared::{EngineResult, ShiftKind};

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Rule: a worker holds at most one duty at any one time.
///
/// Per worker and date: each shift kind is held at most once across
/// hospitals, and the full-day shift overlaps both half-day shifts, so
/// Day+Am and Day+Pm are each limited to one as well.
pub struct NoDoubleBookingRule;

impl NoDoubleBookingRule {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintRule for NoDoubleBookingRule {
    fn name(&self) -> &'static str {
        "no_double_booking"
    }

    fn summary(&self) -> &'static str {
        "No overlapping duties for the same worker"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for worker in ctx.workers {
            for day in ctx.calendar.days() {
                let todays: Vec<&VarKey> = ctx
                    .universe
                    .worker_keys(&worker.name)
                    .iter()
                    .filter(|key| key.date == day.date)
                    .collect();
                if todays.len() < 2 {
                    continue;
                }

                for shift in ShiftKind::ALL {
                    let same_shift: Vec<&VarKey> = todays
                        .iter()
                        .copied()
                        .filter(|key| key.shift == shift)
                        .collect();
                    if same_shift.len() >= 2 {
                        let sum = model.sum(same_shift);
                        model.constrain(constraint!(sum <= 1));
                    }
                }

                for half in [ShiftKind::Am, ShiftKind::Pm] {
                    let overlapping: Vec<&VarKey> = todays
                        .iter()
                        .copied()
                        .filter(|key| key.shift == ShiftKind::Day || key.shift == half)
                        .collect();
                    if overlapping.len() >= 2 {
                        let sum = model.sum(overlapping);
                        model.constrain(constraint!(sum <= 1));
                    }
                }
            }
        }
        Ok(())
    }
}
