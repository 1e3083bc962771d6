//! Stochastic oscillator and Average True Range percent.

use crate::domain::history::QuotationHistory;
use crate::domain::indicator::round_half_up;
use rust_decimal::Decimal;

/// Number of consecutive Stochastic values averaged into the Slow Stochastic.
pub const SLOW_STOCHASTIC_SMOOTHING: usize = 3;

/// %K = (close - lowest low) / (highest high - lowest low) * 100 over `days` bars.
pub fn stochastic(days: usize, index: usize, history: &QuotationHistory) -> Decimal {
    let Some(window) = history.window(index, days) else {
        return Decimal::ZERO;
    };

    let lowest_low = window.iter().map(|q| q.low).min().unwrap_or_default();
    let highest_high = window.iter().map(|q| q.high).max().unwrap_or_default();
    let range = highest_high - lowest_low;
    if range.is_zero() {
        return Decimal::ZERO;
    }

    let close = window[0].close;
    round_half_up((close - lowest_low) / range * Decimal::ONE_HUNDRED, 2)
}

/// Mean of the Stochastic of the target day and the two days before it.
pub fn slow_stochastic(days: usize, index: usize, history: &QuotationHistory) -> Decimal {
    if history
        .window(index, days + SLOW_STOCHASTIC_SMOOTHING - 1)
        .is_none()
    {
        return Decimal::ZERO;
    }

    let sum: Decimal = (index..index + SLOW_STOCHASTIC_SMOOTHING)
        .map(|i| stochastic(days, i, history))
        .sum();
    round_half_up(sum / Decimal::from(SLOW_STOCHASTIC_SMOOTHING as u64), 2)
}

/// ATR over `days` bars as a percentage of the target close.
///
/// Each true range is rounded to 2 places before summing. The oldest bar of
/// the window needs its previous close, so `days + 1` bars are required.
pub fn average_true_range_percent(
    days: usize,
    index: usize,
    history: &QuotationHistory,
) -> Decimal {
    let Some(window) = history.window(index, days + 1) else {
        return Decimal::ZERO;
    };
    if days == 0 {
        return Decimal::ZERO;
    }

    let close = window[0].close;
    if close.is_zero() {
        return Decimal::ZERO;
    }

    let true_range_sum: Decimal = window
        .windows(2)
        .map(|pair| {
            let (current, previous) = (&pair[0], &pair[1]);
            let high_low = current.high - current.low;
            let high_close = (current.high - previous.close).abs();
            let low_close = (current.low - previous.close).abs();
            round_half_up(high_low.max(high_close).max(low_close), 2)
        })
        .sum();

    let atr = true_range_sum / Decimal::from(days as u64);
    round_half_up(atr / close * Decimal::ONE_HUNDRED, 2)
}
