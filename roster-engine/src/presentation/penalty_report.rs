use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::entities::ResolvedPenalty;

/// Aggregated penalty mass of one rule.
#[derive(Debug, Clone, Serialize)]
pub struct RulePenaltyTotal {
    pub source: String,
    pub total: f64,
    pub count: usize,
}

/// Operator-facing explanation of where the objective's penalty mass
/// went: the grand total, per-rule totals in descending order, and the
/// costliest individual items.
#[derive(Debug, Clone, Serialize)]
pub struct PenaltyReport {
    pub total_penalty: f64,
    pub by_rule: Vec<RulePenaltyTotal>,
    pub top_items: Vec<ResolvedPenalty>,
}

impl PenaltyReport {
    pub fn from_items(items: &[ResolvedPenalty], top_n: usize) -> Self {
        let total_penalty = items.iter().map(|item| item.cost).sum();

        let mut grouped: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for item in items {
            let entry = grouped.entry(item.source.as_str()).or_default();
            entry.0 += item.cost;
            entry.1 += 1;
        }
        let mut by_rule: Vec<RulePenaltyTotal> = grouped
            .into_iter()
            .map(|(source, (total, count))| RulePenaltyTotal {
                source: source.to_string(),
                total,
                count,
            })
            .collect();
        by_rule.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

        let mut top_items: Vec<ResolvedPenalty> = items
            .iter()
            .filter(|item| item.cost > 0.0)
            .cloned()
            .collect();
        top_items.sort_by(|a, b| b.cost.partial_cmp(&a.cost).unwrap_or(Ordering::Equal));
        top_items.truncate(top_n);

        Self {
            total_penalty,
            by_rule,
            top_items,
        }
    }
}
