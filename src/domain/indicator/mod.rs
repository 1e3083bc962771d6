//! Technical indicator engines.
//!
//! Every window-based function takes a window length, the index of the
//! target quotation and the history. The window is the target bar plus the
//! older bars behind it. When the history does not reach back far enough
//! the function returns zero; callers treat zero as "unavailable".
//!
//! - [`moving_average`]: SMA/EMA of price, SMA of volume
//! - [`volatility`]: standard deviation, Bollinger BandWidth
//! - [`oscillator`]: Stochastic, Slow Stochastic, ATR percent
//! - [`performance`]: point-to-point, N-day and RS percent sum
//! - [`structure`]: 52-week distances, base length, volume ratios, liquidity
//! - [`ranking`]: RS numbers across a population
//! - [`calculator`]: fills [`IndicatorSet`] for a whole history

pub mod calculator;
pub mod moving_average;
pub mod oscillator;
pub mod performance;
pub mod ranking;
pub mod structure;
pub mod volatility;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Shortest trailing history (in bars) for which an indicator set is created.
pub const MIN_TRAILING_BARS: usize = 10;

/// Indicator snapshot of one quotation. Zero means "not available".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub date: NaiveDate,

    pub sma10: Decimal,
    pub sma20: Decimal,
    pub sma50: Decimal,
    pub sma150: Decimal,
    pub sma200: Decimal,
    pub ema10: Decimal,
    pub ema21: Decimal,
    pub sma30_volume: u64,

    pub bollinger_bandwidth: Decimal,
    pub atr_percent: Decimal,
    pub stochastic: Decimal,
    pub slow_stochastic: Decimal,

    pub performance_5_days: Decimal,
    pub rs_percent_sum: Decimal,

    pub rs_number: u32,
    pub rs_number_distance_52_week_high: u32,
    pub rs_number_up_down_volume_ratio: u32,

    pub base_length_weeks: u32,
    pub volume_differential: Decimal,
    pub distance_to_52_week_high: Decimal,
    pub distance_to_52_week_low: Decimal,
    pub up_down_volume_ratio: Decimal,
    pub liquidity: Decimal,
}

impl IndicatorSet {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }
}

/// Round half up to `dp` decimal places.
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
