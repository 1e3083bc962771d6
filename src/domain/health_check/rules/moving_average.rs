//! Moving-average breach rules: the day the close falls below the average
//! after closing at or above it the day before.

use crate::domain::error::HealthCheckError;
use crate::domain::health_check::day_pattern::{indicators_of, is_above_average_volume};
use crate::domain::health_check::protocol::ProtocolEntry;
use crate::domain::health_check::rules::walk_days;
use crate::domain::history::QuotationHistory;
use crate::domain::indicator::IndicatorSet;
use crate::domain::quotation::Quotation;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovingAverage {
    Sma50,
    Ema21,
}

impl MovingAverage {
    fn label(&self) -> &'static str {
        match self {
            MovingAverage::Sma50 => "SMA(50)",
            MovingAverage::Ema21 => "EMA(21)",
        }
    }

    /// The average of the day, with the zero sentinel reported as missing.
    fn value_of(&self, quotation: &Quotation) -> Result<Decimal, HealthCheckError> {
        let set: &IndicatorSet = indicators_of(quotation)?;
        let value = match self {
            MovingAverage::Sma50 => set.sma50,
            MovingAverage::Ema21 => set.ema21,
        };
        if value.is_zero() {
            return Err(HealthCheckError::MissingIndicator {
                date: quotation.date,
            });
        }
        Ok(value)
    }
}

fn close_below(
    start_index: usize,
    history: &QuotationHistory,
    average: MovingAverage,
) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        let previous = history
            .older(index, 1)
            .ok_or(HealthCheckError::MissingIndicator {
                date: quotation.date,
            })?;

        let today = average.value_of(quotation)?;
        let yesterday = average.value_of(previous)?;
        if quotation.close >= today || previous.close < yesterday {
            return Ok(None);
        }

        let volume = if is_above_average_volume(quotation)? {
            "above"
        } else {
            "below"
        };
        Ok(Some(ProtocolEntry::violation(
            quotation.date,
            format!("Close below {} on {volume}-average volume", average.label()),
        )))
    })
}

pub(super) fn close_below_sma50(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    close_below(start_index, history, MovingAverage::Sma50)
}

pub(super) fn close_below_ema21(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    close_below(start_index, history, MovingAverage::Ema21)
}
