//! Fills the [`IndicatorSet`] of every quotation in a history.
//!
//! The most recent quotation gets the full set. Older quotations only get
//! the subset needed for charting and the health-check rules; the remaining
//! fields keep the zero sentinel. Quotations with fewer than
//! [`MIN_TRAILING_BARS`] bars of trailing history get no set at all.

use crate::domain::history::QuotationHistory;
use crate::domain::indicator::moving_average::{
    exponential_moving_average, simple_moving_average, simple_moving_average_volume,
};
use crate::domain::indicator::oscillator::{
    average_true_range_percent, slow_stochastic, stochastic,
};
use crate::domain::indicator::performance::{n_day_performance, rs_percent_sum};
use crate::domain::indicator::structure::{
    base_length_weeks, distance_to_52_week_high, distance_to_52_week_low, liquidity,
    up_down_volume_ratio, volume_differential,
};
use crate::domain::indicator::volatility::bollinger_bandwidth;
use crate::domain::indicator::{IndicatorSet, MIN_TRAILING_BARS};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub bollinger_days: usize,
    pub bollinger_multiplier: Decimal,
    pub stochastic_days: usize,
    pub atrp_days: usize,
    pub up_down_volume_days: usize,
    pub liquidity_days: usize,
    pub volume_differential_long_days: usize,
    pub volume_differential_short_days: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            bollinger_days: 10,
            bollinger_multiplier: dec!(2),
            stochastic_days: 14,
            atrp_days: 10,
            up_down_volume_days: 50,
            liquidity_days: 20,
            volume_differential_long_days: 30,
            volume_differential_short_days: 5,
        }
    }
}

/// Which fields of an [`IndicatorSet`] get computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationScope {
    /// Every field; used for the most recent quotation.
    MostRecent,
    /// Moving averages, volatility, oscillators and the 5-day performance.
    Historical,
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorCalculator {
    settings: IndicatorSettings,
}

impl IndicatorCalculator {
    pub fn new(settings: IndicatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Scope for the quotation at `index`, or `None` when its trailing
    /// history is too short for any indicator set.
    pub fn scope_for(
        &self,
        index: usize,
        history: &QuotationHistory,
    ) -> Option<CalculationScope> {
        if history.trailing_len(index) < MIN_TRAILING_BARS {
            None
        } else if index == 0 {
            Some(CalculationScope::MostRecent)
        } else {
            Some(CalculationScope::Historical)
        }
    }

    /// Sorts the history and (re)computes the indicator set of every quotation,
    /// replacing any set computed before.
    pub fn calculate_all(&self, history: &mut QuotationHistory) {
        history.sort_by_date_descending();

        let sets: Vec<Option<IndicatorSet>> = (0..history.len())
            .map(|index| self.calculate(index, history))
            .collect();

        let mut created = 0usize;
        for (index, set) in sets.into_iter().enumerate() {
            created += usize::from(set.is_some());
            if let Some(quotation) = history.get_mut(index) {
                quotation.indicators = set;
            }
        }

        tracing::debug!(
            quotations = history.len(),
            indicator_sets = created,
            "calculated indicators"
        );
    }

    /// Indicator set for the quotation at `index` of a sorted history.
    pub fn calculate(&self, index: usize, history: &QuotationHistory) -> Option<IndicatorSet> {
        let scope = self.scope_for(index, history)?;
        let quotation = history.get(index)?;

        let mut set = IndicatorSet::new(quotation.date);
        self.fill_historical(&mut set, index, history);
        if scope == CalculationScope::MostRecent {
            self.fill_most_recent(&mut set, index, history);
        }
        Some(set)
    }

    fn fill_historical(&self, set: &mut IndicatorSet, index: usize, history: &QuotationHistory) {
        let s = &self.settings;

        set.sma10 = simple_moving_average(10, index, history);
        set.sma20 = simple_moving_average(20, index, history);
        set.sma50 = simple_moving_average(50, index, history);
        set.sma150 = simple_moving_average(150, index, history);
        set.sma200 = simple_moving_average(200, index, history);
        set.ema10 = exponential_moving_average(10, index, history);
        set.ema21 = exponential_moving_average(21, index, history);
        set.sma30_volume = simple_moving_average_volume(30, index, history);

        set.bollinger_bandwidth =
            bollinger_bandwidth(s.bollinger_days, s.bollinger_multiplier, index, history);
        set.atr_percent = average_true_range_percent(s.atrp_days, index, history);
        set.stochastic = stochastic(s.stochastic_days, index, history);
        set.slow_stochastic = slow_stochastic(s.stochastic_days, index, history);
        set.performance_5_days = n_day_performance(5, index, history);
    }

    fn fill_most_recent(&self, set: &mut IndicatorSet, index: usize, history: &QuotationHistory) {
        let s = &self.settings;

        set.rs_percent_sum = rs_percent_sum(index, history);
        set.distance_to_52_week_high = distance_to_52_week_high(index, history);
        set.distance_to_52_week_low = distance_to_52_week_low(index, history);
        set.base_length_weeks = base_length_weeks(index, history);
        set.up_down_volume_ratio = up_down_volume_ratio(s.up_down_volume_days, index, history);
        set.volume_differential = volume_differential(
            s.volume_differential_long_days,
            s.volume_differential_short_days,
            index,
            history,
        );
        set.liquidity = liquidity(s.liquidity_days, index, history);
    }
}
