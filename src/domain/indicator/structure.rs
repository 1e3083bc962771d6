//! Structural metrics: 52-week distances, base length, volume ratios, liquidity.

use crate::domain::history::QuotationHistory;
use crate::domain::indicator::moving_average::{
    simple_moving_average, simple_moving_average_volume,
};
use crate::domain::indicator::performance::percent_change;
use crate::domain::indicator::round_half_up;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Trading days in one year.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Closes within this percentage of the 52-week high still belong to the base.
const BASE_TOLERANCE_PERCENT: Decimal = dec!(-5);

/// Index of the highest (or lowest) close of the trailing year; most recent wins ties.
fn trailing_year_extreme(
    index: usize,
    history: &QuotationHistory,
    highest: bool,
) -> Option<usize> {
    let days = history.trailing_len(index).min(TRADING_DAYS_PER_YEAR);
    let window = history.window(index, days)?;

    let mut best = 0;
    for (offset, quotation) in window.iter().enumerate() {
        let better = if highest {
            quotation.close > window[best].close
        } else {
            quotation.close < window[best].close
        };
        if better {
            best = offset;
        }
    }
    Some(index + best)
}

/// Percent distance of the close below the highest close of the trailing year.
pub fn distance_to_52_week_high(index: usize, history: &QuotationHistory) -> Decimal {
    distance_to_extreme(index, history, true)
}

/// Percent distance of the close above the lowest close of the trailing year.
pub fn distance_to_52_week_low(index: usize, history: &QuotationHistory) -> Decimal {
    distance_to_extreme(index, history, false)
}

fn distance_to_extreme(index: usize, history: &QuotationHistory, highest: bool) -> Decimal {
    let Some(extreme_index) = trailing_year_extreme(index, history, highest) else {
        return Decimal::ZERO;
    };
    match (history.get(index), history.get(extreme_index)) {
        (Some(current), Some(extreme)) => percent_change(current.close, extreme.close),
        _ => Decimal::ZERO,
    }
}

/// Weeks since the instrument last traded within 5 % of its 52-week high.
///
/// Starting at the 52-week high, the base end is moved toward the target as
/// long as each following close stays within the tolerance. The distance
/// from the target to that point in trading days is converted to weeks
/// (5 trading days, rounded half up).
pub fn base_length_weeks(index: usize, history: &QuotationHistory) -> u32 {
    let Some(high_index) = trailing_year_extreme(index, history, true) else {
        return 0;
    };
    let Some(high) = history.get(high_index).map(|q| q.close) else {
        return 0;
    };

    let mut base_end = high_index;
    while base_end > index {
        let Some(next) = history.get(base_end - 1) else {
            break;
        };
        if percent_change(next.close, high) < BASE_TOLERANCE_PERCENT {
            break;
        }
        base_end -= 1;
    }

    let days = (base_end - index) as u32;
    (2 * days + 5) / 10
}

/// Volume on up-closes divided by volume on down-closes over `days` bars.
pub fn up_down_volume_ratio(days: usize, index: usize, history: &QuotationHistory) -> Decimal {
    let Some(window) = history.window(index, days + 1) else {
        return Decimal::ZERO;
    };

    let mut up_volume: u64 = 0;
    let mut down_volume: u64 = 0;
    for pair in window.windows(2) {
        let (current, previous) = (&pair[0], &pair[1]);
        if current.close > previous.close {
            up_volume += current.volume;
        } else if current.close < previous.close {
            down_volume += current.volume;
        }
    }

    if down_volume == 0 {
        return Decimal::ZERO;
    }
    round_half_up(Decimal::from(up_volume) / Decimal::from(down_volume), 2)
}

/// Percent difference of the short-window volume average to the long-window one.
pub fn volume_differential(
    days_long: usize,
    days_short: usize,
    index: usize,
    history: &QuotationHistory,
) -> Decimal {
    let long = simple_moving_average_volume(days_long, index, history);
    if long == 0 {
        return Decimal::ZERO;
    }
    let short = simple_moving_average_volume(days_short, index, history);
    percent_change(Decimal::from(short), Decimal::from(long))
}

/// Average close times average volume, normalised to the currency's major unit.
pub fn liquidity(days: usize, index: usize, history: &QuotationHistory) -> Decimal {
    let Some(quotation) = history.get(index) else {
        return Decimal::ZERO;
    };
    let average_price = simple_moving_average(days, index, history);
    let average_volume = simple_moving_average_volume(days, index, history);

    average_price * Decimal::from(average_volume) / quotation.currency.major_unit_divisor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::QuotationHistory;
    use crate::domain::quotation::{Currency, Quotation};
    use crate::domain::test_support::{day, history_from_bars, history_from_ints};

    #[test]
    fn distance_to_high_and_low() {
        let history = history_from_ints(&[80, 100, 90]);
        assert_eq!(distance_to_52_week_high(0, &history), dec!(-10.00));
        assert_eq!(distance_to_52_week_low(0, &history), dec!(12.50));
    }

    #[test]
    fn distance_at_new_high_is_zero() {
        let history = history_from_ints(&[80, 100, 120]);
        assert_eq!(distance_to_52_week_high(0, &history), Decimal::ZERO);
    }

    #[test]
    fn distance_only_looks_back_one_year() {
        let mut closes = vec![100; 253];
        closes[0] = 200;
        let history = history_from_ints(&closes);
        // the 200 close is 252 bars back and outside the window
        assert_eq!(distance_to_52_week_high(0, &history), Decimal::ZERO);
        assert_eq!(distance_to_52_week_high(1, &history), dec!(-50.00));
    }

    #[test]
    fn base_length_zero_at_new_high() {
        let history = history_from_ints(&[90, 95, 100]);
        assert_eq!(base_length_weeks(0, &history), 0);
    }

    #[test]
    fn base_length_counts_from_end_of_tolerance_zone() {
        // high of 100 twelve bars back, then 96 and 95 within 5 %, then ten bars at 80
        let mut closes = vec![70, 100, 96, 95];
        closes.extend(vec![80; 10]);
        let history = history_from_ints(&closes);
        // base end is the 95 close, 10 trading days ago -> 2 weeks
        assert_eq!(base_length_weeks(0, &history), 2);
    }

    #[test]
    fn base_length_rounds_half_up() {
        let mut closes = vec![100];
        closes.extend(vec![80; 8]);
        let history = history_from_ints(&closes);
        // 8 trading days -> 1.6 weeks -> 2
        assert_eq!(base_length_weeks(0, &history), 2);

        let mut closes = vec![100];
        closes.extend(vec![80; 7]);
        let history = history_from_ints(&closes);
        // 7 trading days -> 1.4 weeks -> 1
        assert_eq!(base_length_weeks(0, &history), 1);
    }

    #[test]
    fn up_down_volume_ratio_splits_by_close_direction() {
        let zero = Decimal::ZERO;
        let history = history_from_bars(&[
            (dec!(10), dec!(10), dec!(10), dec!(10), 100),
            (dec!(11), dec!(11), dec!(11), dec!(11), 300),
            (dec!(10), dec!(10), dec!(10), dec!(10), 200),
            (dec!(10), dec!(10), dec!(10), dec!(10), 999),
            (dec!(12), dec!(12), dec!(12), dec!(12), 100),
            (zero, zero, zero, zero, 0),
        ]);
        // window of 4 ending at index 1: up 300 + 100, down 200, unchanged 999 ignored
        assert_eq!(up_down_volume_ratio(4, 1, &history), dec!(2.00));
        assert_eq!(up_down_volume_ratio(5, 1, &history), Decimal::ZERO);
    }

    #[test]
    fn up_down_volume_ratio_without_down_days() {
        let history = history_from_ints(&[1, 2, 3, 4]);
        assert_eq!(up_down_volume_ratio(3, 0, &history), Decimal::ZERO);
    }

    #[test]
    fn volume_differential_short_vs_long() {
        let zero = Decimal::ZERO;
        let mut bars = vec![(zero, zero, zero, zero, 1000); 8];
        bars.extend(vec![(zero, zero, zero, zero, 2000); 2]);
        let history = history_from_bars(&bars);
        // long(10) = 1200, short(2) = 2000
        assert_eq!(volume_differential(10, 2, 0, &history), dec!(66.67));
        assert_eq!(volume_differential(11, 2, 0, &history), Decimal::ZERO);
    }

    #[test]
    fn liquidity_in_major_units() {
        let history = history_from_ints(&[10, 20, 30]);
        // SMA 20 * 1000
        assert_eq!(liquidity(3, 0, &history), dec!(20000));

        let pence: Vec<Quotation> = (0..3)
            .map(|i| {
                let close = Decimal::from(10 * (i as i64 + 1));
                Quotation::new(day(i), close, close, close, close, 1000, Currency::GbpPence)
                    .unwrap()
            })
            .collect();
        let history = QuotationHistory::new(pence).unwrap();
        assert_eq!(liquidity(3, 0, &history), dec!(200));
    }

    #[test]
    fn liquidity_insufficient_history() {
        let history = history_from_ints(&[10, 20]);
        assert_eq!(liquidity(3, 0, &history), Decimal::ZERO);
    }
}
