//! Price performance.
//!
//! Performance = (current / previous - 1) * 100. The quotient is rounded
//! half up to 4 places before the result is rounded to 2 places.

use crate::domain::history::QuotationHistory;
use crate::domain::indicator::round_half_up;
use crate::domain::quotation::Quotation;
use rust_decimal::Decimal;

/// Trading days per quarter in a 252-bar year.
pub const TRADING_DAYS_PER_QUARTER: usize = 63;

/// Percent change from `previous` to `current`; zero when `previous` is zero.
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    let ratio = round_half_up(current / previous, 4);
    round_half_up((ratio - Decimal::ONE) * Decimal::ONE_HUNDRED, 2)
}

pub fn performance(current: &Quotation, previous: &Quotation) -> Decimal {
    percent_change(current.close, previous.close)
}

/// Performance of the target against the bar `days` trading days older.
pub fn n_day_performance(days: usize, index: usize, history: &QuotationHistory) -> Decimal {
    if days == 0 {
        return Decimal::ZERO;
    }
    match (history.get(index), history.older(index, days)) {
        (Some(current), Some(previous)) => performance(current, previous),
        _ => Decimal::ZERO,
    }
}

/// Performance of the target against the previous trading day.
pub fn day_performance(index: usize, history: &QuotationHistory) -> Option<Decimal> {
    let current = history.get(index)?;
    let previous = history.older(index, 1)?;
    Some(performance(current, previous))
}

/// Lookback in bars for a performance over `quarters` quarters: 62, 125, 188, 251.
pub fn quarter_lookback(quarters: usize) -> usize {
    quarters * TRADING_DAYS_PER_QUARTER - 1
}

/// Weighted sum of the 3, 6, 9 and 12 month performances, 3 months counted twice.
/// Periods without enough history contribute zero.
pub fn rs_percent_sum(index: usize, history: &QuotationHistory) -> Decimal {
    let three_months = n_day_performance(quarter_lookback(1), index, history);
    let six_months = n_day_performance(quarter_lookback(2), index, history);
    let nine_months = n_day_performance(quarter_lookback(3), index, history);
    let twelve_months = n_day_performance(quarter_lookback(4), index, history);

    three_months * Decimal::TWO + six_months + nine_months + twelve_months
}
