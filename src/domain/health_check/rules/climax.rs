//! Climax rules: unsustainably fast advances.

use crate::domain::error::HealthCheckError;
use crate::domain::health_check::protocol::ProtocolEntry;
use crate::domain::health_check::rules::walk_days;
use crate::domain::history::QuotationHistory;
use crate::domain::indicator::performance::n_day_performance;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const FIVE_DAY_CLIMAX_PERCENT: Decimal = dec!(25);
pub const FIFTEEN_DAY_CLIMAX_PERCENT: Decimal = dec!(50);

fn climax(
    start_index: usize,
    history: &QuotationHistory,
    days: usize,
    threshold: Decimal,
) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        if history.older(index, days).is_none() {
            return Err(HealthCheckError::MissingIndicator {
                date: quotation.date,
            });
        }
        let performance = n_day_performance(days, index, history);
        Ok((performance >= threshold).then(|| {
            ProtocolEntry::uncertain(
                quotation.date,
                format!("Climax: up {performance:.2}% in {days} days"),
            )
        }))
    })
}

pub(super) fn five_day_climax(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    climax(start_index, history, 5, FIVE_DAY_CLIMAX_PERCENT)
}

pub(super) fn fifteen_day_climax(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    climax(start_index, history, 15, FIFTEEN_DAY_CLIMAX_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{day, history_from_ints};

    #[test]
    fn five_day_advance_of_a_quarter() {
        let history = history_from_ints(&[100, 104, 108, 112, 118, 125, 131]);
        let entries = five_day_climax(1, &history);
        assert_eq!(entries.len(), 2);
        let dates: Vec<_> = entries.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(6), day(5)]);
        assert_eq!(entries[1].text, "Climax: up 25.00% in 5 days");
    }

    #[test]
    fn fifteen_day_climax_needs_fifteen_bars() {
        let closes: Vec<i64> = (0..15).map(|i| 100 + 5 * i).collect();
        let history = history_from_ints(&closes);
        assert!(fifteen_day_climax(0, &history).is_empty());

        let closes: Vec<i64> = (0..16).map(|i| 100 + 5 * i).collect();
        let history = history_from_ints(&closes);
        // 175 / 100 -> 75 %
        assert_eq!(fifteen_day_climax(0, &history).len(), 1);
    }
}
