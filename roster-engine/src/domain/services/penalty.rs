use good_lp::{Expression, Solution};

use crate::domain::entities::ResolvedPenalty;

/// One soft-rule charge: a linear expression over model variables, a
/// non-negative weight, the name of the rule that registered it, and
/// structured metadata for reporting.
pub struct PenaltyItem {
    pub expr: Expression,
    pub weight: f64,
    pub source: &'static str,
    pub meta: serde_json::Value,
}

/// Append-only sequence of penalty items, keyed by insertion order.
#[derive(Default)]
pub struct PenaltyLedger {
    items: Vec<PenaltyItem>,
}

impl PenaltyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        expr: Expression,
        weight: f64,
        source: &'static str,
        meta: serde_json::Value,
    ) {
        self.items.push(PenaltyItem {
            expr,
            weight,
            source,
            meta,
        });
    }

    pub fn items(&self) -> &[PenaltyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `Σ weight · expr`, the penalty part of the objective.
    pub fn weighted_sum(&self) -> Expression {
        self.items
            .iter()
            .map(|item| item.expr.clone() * item.weight)
            .sum()
    }

    /// Resolve every item against a solution, in insertion order.
    pub fn resolve<S: Solution>(&self, solution: &S) -> Vec<ResolvedPenalty> {
        self.items
            .iter()
            .map(|item| {
                let value = solution.eval(item.expr.clone());
                ResolvedPenalty {
                    source: item.source.to_string(),
                    weight: item.weight,
                    value,
                    cost: item.weight * value,
                    meta: item.meta.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use good_lp::{variable, ProblemVariables, SolutionStatus, Variable};
    use serde_json::json;

    /// Values every variable at 1.0.
    struct AllOnes;

    impl Solution for AllOnes {
        fn status(&self) -> SolutionStatus {
            SolutionStatus::Optimal
        }

        fn value(&self, _variable: Variable) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_weighted_resolution_in_insertion_order() {
        let mut vars = ProblemVariables::new();
        let a = vars.add(variable().binary());
        let b = vars.add(variable().binary());

        let mut ledger = PenaltyLedger::new();
        ledger.push(Expression::from(a), 5.0, "first", json!({"worker": "W1"}));
        ledger.push(
            Expression::from(a) + Expression::from(b),
            2.0,
            "second",
            json!({}),
        );

        let resolved = ledger.resolve(&AllOnes);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].source, "first");
        assert_eq!(resolved[0].cost, 5.0);
        assert_eq!(resolved[1].value, 2.0);
        assert_eq!(resolved[1].cost, 4.0);
        assert_eq!(resolved[0].meta["worker"], "W1");
    }
}
