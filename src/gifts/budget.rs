use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use super::catalog::Bundle;

/// Bundles trimmed to a single budget may still overshoot it by this factor.
pub const TRIM_TOLERANCE: Decimal = Decimal::from_parts(105, 0, 0, false, 2);

/// Caller-supplied spending limit.
///
/// The shape picks the filtering strategy: a single value trims bundles down
/// to the budget, a range drops bundles priced outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetConstraint {
    Max(Decimal),
    Range { min: Decimal, max: Decimal },
}

impl BudgetConstraint {
    /// Reads a budget from request JSON: a number, a numeric string, or a
    /// `{ "min": .., "max": .. }` object.
    ///
    /// Anything else (including `min > max`) yields `None`, meaning no
    /// constraint. Bad budgets never fail a request.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let min = map.get("min").and_then(decimal_from_json)?;
                let max = map.get("max").and_then(decimal_from_json)?;
                if min > max {
                    debug!("ignoring inverted budget range {}..{}", min, max);
                    return None;
                }
                Some(BudgetConstraint::Range { min, max })
            }
            other => decimal_from_json(other).map(BudgetConstraint::Max),
        }
    }

    pub fn apply(&self, bundles: Vec<Bundle>) -> Vec<Bundle> {
        match *self {
            BudgetConstraint::Max(limit) => trim_to_budget(bundles, limit),
            BudgetConstraint::Range { min, max } => filter_to_range(bundles, min, max),
        }
    }
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Range strategy: keep bundles with `min <= total <= max`.
///
/// If nothing fits, every candidate is returned as-is.
pub fn filter_to_range(bundles: Vec<Bundle>, min: Decimal, max: Decimal) -> Vec<Bundle> {
    let in_range: Vec<Bundle> = bundles
        .iter()
        .filter(|b| b.total_price() >= min && b.total_price() <= max)
        .cloned()
        .collect();

    if in_range.is_empty() {
        debug!(candidates = bundles.len(), "no bundle within {}..{}, returning all", min, max);
        return bundles;
    }
    in_range
}

/// Trim strategy: shed the priciest item until the bundle fits `limit` or
/// only one item is left, then keep bundles within `limit * 1.05`.
///
/// If no trimmed bundle is within tolerance, all trimmed bundles are returned.
pub fn trim_to_budget(bundles: Vec<Bundle>, limit: Decimal) -> Vec<Bundle> {
    let trimmed: Vec<Bundle> = bundles
        .into_iter()
        .map(|mut bundle| {
            while bundle.total_price() > limit && bundle.len() > 1 {
                bundle.drop_most_expensive();
            }
            bundle
        })
        .collect();

    // A limit near Decimal::MAX has no representable ceiling; nothing can exceed it
    let Some(ceiling) = limit.checked_mul(TRIM_TOLERANCE) else {
        return trimmed;
    };
    let passing: Vec<Bundle> = trimmed
        .iter()
        .filter(|b| b.total_price() <= ceiling)
        .cloned()
        .collect();

    if passing.is_empty() {
        debug!(
            candidates = trimmed.len(),
            "no bundle within {} after trimming, returning all", ceiling
        );
        return trimmed;
    }
    passing
}
