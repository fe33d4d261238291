use good_lp::constraint;
use shared::EngineResult;

use super::{ConstraintRule, ContextKey, RuleContext};
use crate::domain::entities::VarKey;
use crate::domain::services::model::RosterModel;

/// Rule: a worker's monthly assignments at one hospital stay within the
/// configured cap. Pairs without a cap entry are unbounded.
pub struct HospitalCapRule;

impl HospitalCapRule {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintRule for HospitalCapRule {
    fn name(&self) -> &'static str {
        "hospital_cap"
    }

    fn summary(&self) -> &'static str {
        "Per-worker per-hospital monthly assignment caps"
    }

    fn required_context(&self) -> &'static [ContextKey] {
        &[ContextKey::Caps]
    }

    fn apply(&self, model: &mut RosterModel, ctx: &RuleContext<'_>) -> EngineResult<()> {
        for entry in ctx.caps()?.entries() {
            let keys: Vec<&VarKey> = ctx
                .universe
                .worker_keys(&entry.worker)
                .iter()
                .filter(|key| key.hospital == entry.hospital)
                .collect();
            if keys.is_empty() {
                continue;
            }
            let sum = model.sum(keys);
            let limit = f64::from(entry.max_assignments);
            model.constrain(constraint!(sum <= limit));
        }
        Ok(())
    }
}
