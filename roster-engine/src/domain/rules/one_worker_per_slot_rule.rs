use good_lp::constraint;
use shared::EngineResult;

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::services::model::RosterModel;

/// Rule: every required coverage point is staffed by exactly one worker.
///
/// A point with no candidate workers produces an unsatisfiable row on
/// purpose; the builder keeps such points for the infeasibility
/// diagnostics instead of repairing them.
pub struct OneWorkerPerSlotRule;

impl OneWorkerPerSlotRule {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintRule for OneWorkerPerSlotRule {
    fn name(&self) -> &'static str {
        "one_worker_per_slot"
    }

    fn summary(&self) -> &'static str {
        "Exactly one worker per required coverage point"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::RequiredCoverage]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for slot in ctx.universe.required() {
            let staffed = model.sum(ctx.universe.slot_candidates(slot));
            model.constrain(constraint!(staffed == 1));
        }
        Ok(())
    }
}
