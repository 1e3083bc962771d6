//! Named price/volume patterns: follow-through day, pocket pivot and
//! distribution day.

use crate::domain::error::HealthCheckError;
use crate::domain::health_check::day_pattern::{day_performance_of, is_down_day, is_up_day};
use crate::domain::health_check::protocol::ProtocolEntry;
use crate::domain::health_check::rules::walk_days;
use crate::domain::history::QuotationHistory;
use crate::domain::indicator::performance::percent_change;
use crate::domain::quotation::Quotation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const FOLLOW_THROUGH_PERCENT: Decimal = dec!(1.7);
pub const DISTRIBUTION_DAY_PERCENT: Decimal = dec!(-0.2);
pub const DISTRIBUTION_RALLY_PERCENT: Decimal = dec!(5);

const RALLY_LOOKBACK: usize = 25;
const RALLY_DAY_MIN: usize = 4;
const RALLY_DAY_MAX: usize = 7;
const POCKET_PIVOT_LOOKBACK: usize = 10;
const DISTRIBUTION_LOOKAHEAD: usize = 25;

fn previous_of<'a>(
    index: usize,
    quotation: &Quotation,
    history: &'a QuotationHistory,
) -> Result<&'a Quotation, HealthCheckError> {
    history
        .older(index, 1)
        .ok_or(HealthCheckError::MissingIndicator {
            date: quotation.date,
        })
}

/// Strong up day on rising volume on day 4 to 7 of a rally attempt, counted
/// from the lowest close of the last 25 bars.
pub(super) fn follow_through_day(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        let performance = day_performance_of(index, history)?;
        let previous = previous_of(index, quotation, history)?;
        if performance < FOLLOW_THROUGH_PERCENT || quotation.volume <= previous.volume {
            return Ok(None);
        }

        let window = history
            .window(index, RALLY_LOOKBACK)
            .ok_or(HealthCheckError::MissingIndicator {
                date: quotation.date,
            })?;
        // most recent lowest close; the low day itself is rally day 1
        let mut low_offset = 0;
        for (offset, bar) in window.iter().enumerate() {
            if bar.close < window[low_offset].close {
                low_offset = offset;
            }
        }
        let rally_day = low_offset + 1;
        if !(RALLY_DAY_MIN..=RALLY_DAY_MAX).contains(&rally_day) {
            return Ok(None);
        }

        Ok(Some(ProtocolEntry::confirmation(
            quotation.date,
            format!("Follow-through day: up {performance:.2}% on day {rally_day} of the rally"),
        )))
    })
}

/// Up day whose volume exceeds every down-day volume of the 10 prior bars.
pub(super) fn pocket_pivot(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        if is_up_day(index, history) != Some(true) {
            return Ok(None);
        }
        if history.window(index + 1, POCKET_PIVOT_LOOKBACK + 1).is_none() {
            return Err(HealthCheckError::MissingIndicator {
                date: quotation.date,
            });
        }

        let largest_down_volume = (index + 1..=index + POCKET_PIVOT_LOOKBACK)
            .filter(|&i| is_down_day(i, history) == Some(true))
            .filter_map(|i| history.get(i))
            .map(|bar| bar.volume)
            .max();
        let Some(largest_down_volume) = largest_down_volume else {
            return Ok(None);
        };

        Ok((quotation.volume > largest_down_volume).then(|| {
            ProtocolEntry::confirmation(
                quotation.date,
                format!(
                    "Pocket pivot: volume {} above down-day volume {largest_down_volume}",
                    quotation.volume
                ),
            )
        }))
    })
}

/// Down day on rising volume, unless a close within the next 25 bars is at
/// least 5 % above it.
pub(super) fn distribution_day(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        let performance = day_performance_of(index, history)?;
        let previous = previous_of(index, quotation, history)?;
        if performance > DISTRIBUTION_DAY_PERCENT || quotation.volume <= previous.volume {
            return Ok(None);
        }

        let rallied = (1..=DISTRIBUTION_LOOKAHEAD)
            .map_while(|bars| history.newer(index, bars))
            .any(|later| {
                percent_change(later.close, quotation.close) >= DISTRIBUTION_RALLY_PERCENT
            });
        if rallied {
            return Ok(None);
        }

        Ok(Some(ProtocolEntry::violation(
            quotation.date,
            format!("Distribution day: down {performance:.2}% on rising volume"),
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::health_check::protocol::ProtocolEntryCategory;
    use crate::domain::test_support::{day, history_from_bars};

    fn flat(close: Decimal, volume: u64) -> (Decimal, Decimal, Decimal, Decimal, u64) {
        (close, close, close, close, volume)
    }

    /// 25 bars falling from 124 to 100, then the given (close, volume) rally.
    fn decline_then(rally: &[(i64, u64)]) -> QuotationHistory {
        let mut bars: Vec<_> = (0..25)
            .map(|i| flat(Decimal::from(124 - i), 1000))
            .collect();
        bars.extend(rally.iter().map(|&(c, v)| flat(Decimal::from(c), v)));
        history_from_bars(&bars)
    }

    #[test]
    fn follow_through_on_fourth_rally_day() {
        // low at day 24 (rally day 1), then days 25, 26 and the jump on 27
        let history = decline_then(&[(101, 900), (102, 900), (105, 1500)]);
        let entries = follow_through_day(0, &history);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, day(27));
        assert_eq!(entries[0].category, ProtocolEntryCategory::Confirmation);
        assert_eq!(entries[0].text, "Follow-through day: up 2.94% on day 4 of the rally");
    }

    #[test]
    fn follow_through_too_early_in_the_rally() {
        let history = decline_then(&[(101, 900), (105, 1500)]);
        assert!(follow_through_day(0, &history).is_empty());
    }

    #[test]
    fn follow_through_needs_rising_volume() {
        let history = decline_then(&[(101, 900), (102, 1500), (105, 1500)]);
        assert!(follow_through_day(0, &history).is_empty());
    }

    #[test]
    fn pocket_pivot_beats_largest_down_volume() {
        let mut bars = vec![flat(Decimal::from(100), 1000)];
        for i in 0..10 {
            // alternating down and up days; down days carry 1200
            let (close, volume) = if i % 2 == 0 { (99, 1200) } else { (100, 800) };
            bars.push(flat(Decimal::from(close), volume));
        }
        bars.push(flat(Decimal::from(101), 1300));
        let history = history_from_bars(&bars);
        let entries = pocket_pivot(0, &history);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, day(11));
    }

    #[test]
    fn pocket_pivot_below_largest_down_volume() {
        let mut bars = vec![flat(Decimal::from(100), 1000)];
        for i in 0..10 {
            let (close, volume) = if i % 2 == 0 { (99, 1200) } else { (100, 800) };
            bars.push(flat(Decimal::from(close), volume));
        }
        bars.push(flat(Decimal::from(101), 1100));
        let history = history_from_bars(&bars);
        assert!(pocket_pivot(0, &history).is_empty());
    }

    #[test]
    fn distribution_day_without_rally() {
        let history = history_from_bars(&[
            flat(Decimal::from(100), 1000),
            flat(Decimal::from(99), 1500),
            flat(Decimal::from(101), 900),
        ]);
        let entries = distribution_day(1, &history);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, day(1));
        assert_eq!(entries[0].text, "Distribution day: down -1.00% on rising volume");
    }

    #[test]
    fn distribution_day_invalidated_by_rally() {
        let history = history_from_bars(&[
            flat(Decimal::from(100), 1000),
            flat(Decimal::from(99), 1500),
            flat(Decimal::from(104), 900),
        ]);
        assert!(distribution_day(1, &history).is_empty());
    }

    #[test]
    fn distribution_day_needs_rising_volume() {
        let history = history_from_bars(&[
            flat(Decimal::from(100), 1000),
            flat(Decimal::from(99), 1000),
        ]);
        assert!(distribution_day(0, &history).is_empty());
    }
}
