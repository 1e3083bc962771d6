//! Single-day price and volume classifications used by the rules.
//!
//! Functions that need an [`IndicatorSet`] return
//! `Err(HealthCheckError::MissingIndicator)` when it was never computed or
//! when the value they rely on is the zero sentinel; the calling rule skips
//! that day.

use crate::domain::error::HealthCheckError;
use crate::domain::history::QuotationHistory;
use crate::domain::indicator::IndicatorSet;
use crate::domain::indicator::performance::day_performance;
use crate::domain::quotation::Quotation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const UP_ON_VOLUME_PERCENT: Decimal = dec!(3);
pub const DOWN_ON_VOLUME_PERCENT: Decimal = dec!(-3);
pub const CHURNING_PERCENT: Decimal = dec!(1);
pub const BULLISH_REVERSAL_POSITION: Decimal = dec!(0.6);
pub const BEARISH_REVERSAL_POSITION: Decimal = dec!(0.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reversal {
    Bullish,
    Bearish,
}

/// Close strictly above the midpoint of the day's range. A close exactly
/// on the midpoint is a bad close.
pub fn is_good_close(quotation: &Quotation) -> bool {
    quotation.close > quotation.midpoint()
}

/// Position of `price` within the day's range, 0 at the low and 1 at the
/// high. `None` for a zero range.
pub fn position_in_range(quotation: &Quotation, price: Decimal) -> Option<Decimal> {
    let range = quotation.range();
    if range.is_zero() {
        None
    } else {
        Some((price - quotation.low) / range)
    }
}

/// Close in the top `1 - threshold` of the range (inclusive).
pub fn is_close_near_high(quotation: &Quotation, threshold: Decimal) -> bool {
    position_in_range(quotation, quotation.close).is_some_and(|p| p >= threshold)
}

/// Close in the bottom `threshold` of the range (exclusive).
pub fn is_close_near_low(quotation: &Quotation, threshold: Decimal) -> bool {
    position_in_range(quotation, quotation.close).is_some_and(|p| p < threshold)
}

pub fn is_up_day(index: usize, history: &QuotationHistory) -> Option<bool> {
    let current = history.get(index)?;
    let previous = history.older(index, 1)?;
    Some(current.close > previous.close)
}

pub fn is_down_day(index: usize, history: &QuotationHistory) -> Option<bool> {
    let current = history.get(index)?;
    let previous = history.older(index, 1)?;
    Some(current.close < previous.close)
}

pub fn indicators_of(quotation: &Quotation) -> Result<&IndicatorSet, HealthCheckError> {
    quotation
        .indicators
        .as_ref()
        .ok_or(HealthCheckError::MissingIndicator {
            date: quotation.date,
        })
}

/// 30-day average volume of the day; a zero average counts as missing.
pub fn average_volume(quotation: &Quotation) -> Result<u64, HealthCheckError> {
    let average = indicators_of(quotation)?.sma30_volume;
    if average == 0 {
        return Err(HealthCheckError::MissingIndicator {
            date: quotation.date,
        });
    }
    Ok(average)
}

pub fn is_above_average_volume(quotation: &Quotation) -> Result<bool, HealthCheckError> {
    Ok(quotation.volume > average_volume(quotation)?)
}

/// Day performance of the bar at `index`; the oldest bar has none.
pub fn day_performance_of(
    index: usize,
    history: &QuotationHistory,
) -> Result<Decimal, HealthCheckError> {
    let date = history.get(index).map(|q| q.date).unwrap_or_default();
    day_performance(index, history).ok_or(HealthCheckError::MissingIndicator { date })
}

/// Day performance of at least +3 % on above-average volume.
pub fn is_up_on_volume(
    index: usize,
    history: &QuotationHistory,
) -> Result<bool, HealthCheckError> {
    let Some(quotation) = history.get(index) else {
        return Ok(false);
    };
    let performance = day_performance_of(index, history)?;
    Ok(performance >= UP_ON_VOLUME_PERCENT && is_above_average_volume(quotation)?)
}

/// Day performance of at most -3 % on above-average volume.
pub fn is_down_on_volume(
    index: usize,
    history: &QuotationHistory,
) -> Result<bool, HealthCheckError> {
    let Some(quotation) = history.get(index) else {
        return Ok(false);
    };
    let performance = day_performance_of(index, history)?;
    Ok(performance <= DOWN_ON_VOLUME_PERCENT && is_above_average_volume(quotation)?)
}

/// Day performance within [-1 %, +1 %] on above-average volume.
pub fn is_churning(index: usize, history: &QuotationHistory) -> Result<bool, HealthCheckError> {
    let Some(quotation) = history.get(index) else {
        return Ok(false);
    };
    let performance = day_performance_of(index, history)?;
    Ok(performance.abs() <= CHURNING_PERCENT && is_above_average_volume(quotation)?)
}

/// Open and close both in the upper 40 % of the range (bullish) or both in
/// the lower 40 % (bearish).
pub fn reversal(quotation: &Quotation) -> Option<Reversal> {
    let open = position_in_range(quotation, quotation.open)?;
    let close = position_in_range(quotation, quotation.close)?;
    if open >= BULLISH_REVERSAL_POSITION && close >= BULLISH_REVERSAL_POSITION {
        Some(Reversal::Bullish)
    } else if open < BEARISH_REVERSAL_POSITION && close < BEARISH_REVERSAL_POSITION {
        Some(Reversal::Bearish)
    } else {
        None
    }
}

/// Reversal candle on above-average volume.
pub fn high_volume_reversal(
    quotation: &Quotation,
) -> Result<Option<Reversal>, HealthCheckError> {
    let Some(direction) = reversal(quotation) else {
        return Ok(None);
    };
    Ok(is_above_average_volume(quotation)?.then_some(direction))
}
