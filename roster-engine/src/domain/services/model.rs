use good_lp::{variable, Constraint, Expression, ProblemVariables, Variable};
use std::collections::BTreeMap;

use crate::domain::entities::VarKey;

use super::penalty::PenaltyLedger;

/// The model under construction for one solver session: the variable
/// pool, the decision map, the accumulated constraints, and the penalty
/// ledger. Rules reference decisions through the stable `VarKey` map;
/// slack variables are created here so naming stays deterministic.
pub struct RosterModel {
    variables: ProblemVariables,
    decisions: BTreeMap<VarKey, Variable>,
    constraints: Vec<Constraint>,
    ledger: PenaltyLedger,
}

impl Default for RosterModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterModel {
    pub fn new() -> Self {
        Self {
            variables: ProblemVariables::new(),
            decisions: BTreeMap::new(),
            constraints: Vec::new(),
            ledger: PenaltyLedger::new(),
        }
    }

    /// Create one binary decision per key, in key order.
    pub fn materialize(&mut self, keys: impl IntoIterator<Item = VarKey>) {
        for key in keys {
            let var = self.variables.add(variable().binary().name(format!("x_{}", key)));
            self.decisions.insert(key, var);
        }
    }

    pub fn decision(&self, key: &VarKey) -> Option<Variable> {
        self.decisions.get(key).copied()
    }

    pub fn decisions(&self) -> &BTreeMap<VarKey, Variable> {
        &self.decisions
    }

    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    /// A fresh 0/1 slack variable.
    pub fn add_binary_slack(&mut self, name: impl Into<String>) -> Variable {
        self.variables.add(variable().binary().name(name))
    }

    /// A fresh continuous, non-negative slack variable.
    pub fn add_nonneg_slack(&mut self, name: impl Into<String>) -> Variable {
        self.variables.add(variable().min(0.0).name(name))
    }

    pub fn constrain(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn penalize(
        &mut self,
        expr: Expression,
        weight: f64,
        source: &'static str,
        meta: serde_json::Value,
    ) {
        self.ledger.push(expr, weight, source, meta);
    }

    pub fn ledger(&self) -> &PenaltyLedger {
        &self.ledger
    }

    /// Sum of the decisions behind the given keys. Keys without a
    /// materialized variable contribute nothing.
    pub fn sum<'a>(&self, keys: impl IntoIterator<Item = &'a VarKey>) -> Expression {
        keys.into_iter()
            .filter_map(|key| self.decision(key))
            .map(Expression::from)
            .sum()
    }

    /// `Σ x` over every decision variable.
    pub fn assignment_total(&self) -> Expression {
        self.decisions.values().map(|&v| Expression::from(v)).sum()
    }

    pub fn into_parts(
        self,
    ) -> (
        ProblemVariables,
        BTreeMap<VarKey, Variable>,
        Vec<Constraint>,
        PenaltyLedger,
    ) {
        (self.variables, self.decisions, self.constraints, self.ledger)
    }
}
