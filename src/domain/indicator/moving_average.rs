//! Simple and exponential moving averages.
//!
//! SMA(n) = mean of the last n closes, rounded half up to 3 places.
//! EMA(n) is seeded with SMA(n) taken n bars before the target and then
//! walked forward with k = 2/(n+1): EMA = (C - EMA) * k + EMA.

use crate::domain::history::QuotationHistory;
use crate::domain::indicator::round_half_up;
use rust_decimal::Decimal;

pub fn simple_moving_average(days: usize, index: usize, history: &QuotationHistory) -> Decimal {
    let Some(window) = history.window(index, days) else {
        return Decimal::ZERO;
    };

    let sum: Decimal = window.iter().map(|q| q.close).sum();
    round_half_up(sum / Decimal::from(days as u64), 3)
}

/// Needs `2 * days` bars older than the target: `days` for the SMA seed and
/// `days` to walk the recurrence up to the target.
pub fn exponential_moving_average(
    days: usize,
    index: usize,
    history: &QuotationHistory,
) -> Decimal {
    if days == 0 || history.trailing_len(index) <= 2 * days {
        return Decimal::ZERO;
    }

    let seed_index = index + days;
    let mut ema = simple_moving_average(days, seed_index, history);
    let multiplier = Decimal::TWO / Decimal::from(days as u64 + 1);

    for i in (index..seed_index).rev() {
        let Some(quotation) = history.get(i) else {
            return Decimal::ZERO;
        };
        ema = (quotation.close - ema) * multiplier + ema;
    }

    round_half_up(ema, 3)
}

/// Mean volume of the last `days` bars, rounded half up to a whole number.
pub fn simple_moving_average_volume(
    days: usize,
    index: usize,
    history: &QuotationHistory,
) -> u64 {
    let Some(window) = history.window(index, days) else {
        return 0;
    };

    let sum: u128 = window.iter().map(|q| q.volume as u128).sum();
    let days = days as u128;
    ((2 * sum + days) / (2 * days)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{
        history_from_bars, history_from_closes, history_from_ints,
    };
    use rust_decimal_macros::dec;

    #[test]
    fn sma_of_increasing_closes() {
        let history = history_from_ints(&[100, 101, 102, 103, 104, 105, 106, 107, 108, 109]);
        assert_eq!(simple_moving_average(5, 0, &history), dec!(107.000));
        assert_eq!(simple_moving_average(10, 0, &history), dec!(104.5));
    }

    #[test]
    fn sma_walks_toward_older_bars() {
        let history = history_from_ints(&[100, 101, 102, 103, 104, 105, 106, 107, 108, 109]);
        // index 2 is the bar with close 107; window 107..103
        assert_eq!(simple_moving_average(5, 2, &history), dec!(105));
    }

    #[test]
    fn sma_rounds_to_three_places() {
        let history = history_from_closes(&[dec!(1), dec!(1), dec!(2)]);
        // 4 / 3 = 1.3333...
        assert_eq!(simple_moving_average(3, 0, &history), dec!(1.333));
        let history = history_from_closes(&[dec!(1.0005), dec!(1.001)]);
        // 2.0015 / 2 = 1.00075 -> 1.001
        assert_eq!(simple_moving_average(2, 0, &history), dec!(1.001));
    }

    #[test]
    fn sma_insufficient_history_is_zero() {
        let history = history_from_ints(&[100, 101, 102, 103]);
        assert_eq!(simple_moving_average(5, 0, &history), Decimal::ZERO);
        assert_eq!(simple_moving_average(4, 1, &history), Decimal::ZERO);
        assert_eq!(simple_moving_average(0, 0, &history), Decimal::ZERO);
    }

    #[test]
    fn ema_needs_twice_the_window_of_older_bars() {
        let history = history_from_ints(&[100, 100, 100, 100, 100, 100]);
        assert_eq!(exponential_moving_average(3, 0, &history), Decimal::ZERO);

        let history = history_from_ints(&[100, 100, 100, 100, 100, 100, 100]);
        assert_eq!(exponential_moving_average(3, 0, &history), dec!(100));
    }

    #[test]
    fn ema_constant_price_equals_price() {
        let closes = vec![dec!(42.5); 2 * 21 + 1];
        let history = history_from_closes(&closes);
        assert_eq!(exponential_moving_average(21, 0, &history), dec!(42.5));
    }

    #[test]
    fn ema_recurrence_from_seed() {
        // oldest first: seed SMA(2) over 20 and 30 = 25, then 40 -> 35, 50 -> 45
        let history = history_from_ints(&[10, 20, 30, 40, 50]);
        assert_eq!(exponential_moving_average(2, 0, &history), dec!(45.000));
    }

    #[test]
    fn ema_rounds_to_three_places() {
        // seed SMA(2) over 10 and 10 = 10, 11 -> 10.666.., 10 -> 10.222..
        let history = history_from_ints(&[10, 10, 10, 11, 10]);
        assert_eq!(exponential_moving_average(2, 0, &history), dec!(10.222));
    }

    #[test]
    fn sma_volume_rounds_half_up() {
        let zero = Decimal::ZERO;
        let history = history_from_bars(&[
            (zero, zero, zero, zero, 1),
            (zero, zero, zero, zero, 2),
            (zero, zero, zero, zero, 2),
            (zero, zero, zero, zero, 1),
        ]);
        assert_eq!(simple_moving_average_volume(4, 0, &history), 2);
        assert_eq!(simple_moving_average_volume(3, 0, &history), 2);
        assert_eq!(simple_moving_average_volume(2, 0, &history), 2);
        assert_eq!(simple_moving_average_volume(5, 0, &history), 0);
    }

    #[test]
    fn sma_volume_of_flat_bars() {
        let history = history_from_ints(&[1, 2, 3]);
        assert_eq!(simple_moving_average_volume(3, 0, &history), 1000);
    }
}
