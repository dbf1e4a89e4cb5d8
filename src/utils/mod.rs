//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency and percentage values throughout the application.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown when a market performance cannot be computed
pub const NOT_COMPUTABLE: &str = "-";

/// Round half away from zero to two places
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as euros: "€1,234.56".
///
/// Rounds half away from zero to cents, groups thousands with `,` and puts
/// the sign after the symbol: `€-200.00`.
///
/// # Examples
/// ```
/// use snapdiff::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "€1,234.56");
/// assert_eq!(format_currency(dec!(-500)), "€-500.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_cents(value);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    format!("€{}{}.{}", sign, with_separators, decimal_part)
}

/// Format a percentage with two decimals: "10.00%"
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_cents(value))
}

/// Format a market performance, using [`NOT_COMPUTABLE`] when absent
pub fn format_market_perf(value: Option<Decimal>) -> String {
    value
        .map(format_percent)
        .unwrap_or_else(|| NOT_COMPUTABLE.to_string())
}
