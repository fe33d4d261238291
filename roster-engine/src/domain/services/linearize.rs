use good_lp::{constraint, Expression, Variable};

use super::model::RosterModel;

/// Binary indicator for `a AND b`, where `a` and `b` are expressions each
/// bounded above by 1. Adds `y ≥ a + b − 1`, `y ≤ a`, `y ≤ b`.
pub fn and_indicator(
    model: &mut RosterModel,
    a: Expression,
    b: Expression,
    name: impl Into<String>,
) -> Variable {
    let y = model.add_binary_slack(name);
    model.constrain(constraint!(a.clone() + b.clone() - y <= 1));
    model.constrain(constraint!(Expression::from(y) - a <= 0));
    model.constrain(constraint!(Expression::from(y) - b <= 0));
    y
}

/// Binary indicator that `sum` (bounded above by 1) fell short of 1.
/// Adds `sum + y ≥ 1`, so minimizing `y` charges exactly the shortfall.
pub fn shortfall_indicator(
    model: &mut RosterModel,
    sum: Expression,
    name: impl Into<String>,
) -> Variable {
    let y = model.add_binary_slack(name);
    model.constrain(constraint!(sum + y >= 1));
    y
}
