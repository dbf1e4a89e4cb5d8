//! Reconciliation and aggregation engine
//!
//! Aligns two snapshots by holding name and separates two effects that a
//! plain value difference conflates:
//!
//! - **Wealth change**: `value_after - value_before`. Includes money added
//!   or withdrawn.
//! - **Market performance**: the price ratio `(price_after - price_before) /
//!   price_before`. Quantity changes (deposits) do not move the price, so
//!   this isolates market movement.
//!
//! The portfolio-level market return is the average of per-holding market
//! performance weighted by starting value. The engine is a pure function of
//! its two inputs and never fails: money sums saturate at the `Decimal`
//! range and a per-holding ratio that overflows is reported as not
//! computable.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::snapshot::{consolidate, HoldingRecord};

/// One holding aligned across both snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRow {
    pub name: String,
    pub value_before: Decimal,
    pub value_after: Decimal,
    pub price_before: Decimal,
    pub price_after: Decimal,
    pub wealth_change: Decimal,
    /// `None` when there is no positive starting price to compare against
    pub market_perf_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub total_before: Decimal,
    pub total_after: Decimal,
    /// Deposits/withdrawals plus market gains
    pub net_growth: Decimal,
    /// Market movement only; 0 when no holding has a comparable start
    pub weighted_market_return_pct: Decimal,
}

/// Result of one comparison run, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ReconciledRow>,
    pub summary: PortfolioSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Best performers first (not computable last)
    #[default]
    Descending,
    /// Worst performers first (not computable first)
    Ascending,
}

/// Compare an older snapshot (`before`) with a newer one (`after`).
///
/// Rows follow the order holdings first appear in `before`, then holdings
/// that only exist in `after`. Duplicate names within one side are merged
/// first (values summed, last known price kept).
pub fn compare(before: &[HoldingRecord], after: &[HoldingRecord]) -> Comparison {
    let before = consolidate(before.iter().cloned());
    let after = consolidate(after.iter().cloned());

    let after_index: HashMap<&str, &HoldingRecord> =
        after.iter().map(|r| (r.name.as_str(), r)).collect();
    let before_names: HashSet<&str> = before.iter().map(|r| r.name.as_str()).collect();

    let mut rows = Vec::with_capacity(before.len() + after.len());

    for old in &before {
        let new = after_index.get(old.name.as_str()).copied();
        rows.push(reconcile(&old.name, Some(old), new));
    }
    for new in after.iter().filter(|r| !before_names.contains(r.name.as_str())) {
        rows.push(reconcile(&new.name, None, Some(new)));
    }

    let summary = summarize(&rows);
    Comparison { rows, summary }
}

/// Price-based return in percent, or `None` without a positive baseline or
/// when the ratio does not fit in a `Decimal`
pub fn market_performance(price_before: Decimal, price_after: Decimal) -> Option<Decimal> {
    if price_before <= Decimal::ZERO {
        return None;
    }
    price_after
        .checked_sub(price_before)?
        .checked_div(price_before)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Aggregate reconciled rows into portfolio totals and the weighted return
pub fn summarize(rows: &[ReconciledRow]) -> PortfolioSummary {
    let total_before = saturating_sum(rows.iter().map(|r| r.value_before));
    let total_after = saturating_sum(rows.iter().map(|r| r.value_after));

    PortfolioSummary {
        total_before,
        total_after,
        net_growth: total_after.saturating_sub(total_before),
        weighted_market_return_pct: weighted_market_return(rows),
    }
}

/// Starting-value weighted average of market performance.
///
/// Only holdings with a positive starting value and a computable market
/// performance take part; the weights are normalised over that same set.
/// If the raw sums overflow, the weights are first scaled by the largest
/// starting value, which leaves the average unchanged.
pub fn weighted_market_return(rows: &[ReconciledRow]) -> Decimal {
    let eligible: Vec<(Decimal, Decimal)> = rows
        .iter()
        .filter(|r| r.value_before > Decimal::ZERO)
        .filter_map(|r| r.market_perf_pct.map(|pct| (r.value_before, pct)))
        .collect();

    if eligible.is_empty() {
        return Decimal::ZERO;
    }
    if let Some(pct) = weighted_average(eligible.iter().copied()) {
        return pct;
    }

    let largest = eligible
        .iter()
        .map(|(value, _)| *value)
        .max()
        .unwrap_or(Decimal::ONE);
    let scaled = eligible
        .iter()
        .filter_map(|(value, pct)| value.checked_div(largest).map(|weight| (weight, *pct)));
    weighted_average(scaled).unwrap_or_else(|| {
        warn!("Weighted market return is out of range; reporting 0");
        Decimal::ZERO
    })
}

/// `Σ(w·p)/Σw`, or `None` on overflow or an empty weight base
fn weighted_average(mut pairs: impl Iterator<Item = (Decimal, Decimal)>) -> Option<Decimal> {
    let (weighted, base) = pairs.try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(weighted, base), (weight, pct)| {
            Some((
                weighted.checked_add(weight.checked_mul(pct)?)?,
                base.checked_add(weight)?,
            ))
        },
    )?;
    weighted.checked_div(base)
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Order rows by market performance; not computable sorts below any number.
/// Stable, so ties keep their join order.
pub fn sort_by_market_perf(rows: &mut [ReconciledRow], order: SortOrder) {
    match order {
        SortOrder::Descending => rows.sort_by(|a, b| b.market_perf_pct.cmp(&a.market_perf_pct)),
        SortOrder::Ascending => rows.sort_by(|a, b| a.market_perf_pct.cmp(&b.market_perf_pct)),
    }
}

fn reconcile(name: &str, old: Option<&HoldingRecord>, new: Option<&HoldingRecord>) -> ReconciledRow {
    let value_before = old.map(|r| r.total_value).unwrap_or(Decimal::ZERO);
    let value_after = new.map(|r| r.total_value).unwrap_or(Decimal::ZERO);
    let price_before = old.and_then(|r| r.price).unwrap_or(Decimal::ZERO);
    let resolved_after = new.and_then(|r| r.price);
    let price_after = resolved_after.unwrap_or(Decimal::ZERO);

    ReconciledRow {
        name: name.to_string(),
        value_before,
        value_after,
        price_before,
        price_after,
        wealth_change: value_after.saturating_sub(value_before),
        // unresolved closing price: unknown, not -100%
        market_perf_pct: resolved_after.and_then(|after| market_performance(price_before, after)),
    }
}
