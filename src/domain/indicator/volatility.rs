//! Standard deviation and Bollinger BandWidth.
//!
//! Population standard deviation (divides by N, not N-1), rounded to 4
//! places so that low-priced instruments keep a non-zero band.
//! BandWidth = (upper - lower) / middle * 100 with middle = SMA(n) and
//! upper/lower = middle +/- k * stddev.

use crate::domain::history::QuotationHistory;
use crate::domain::indicator::moving_average::simple_moving_average;
use crate::domain::indicator::round_half_up;
use rust_decimal::{Decimal, MathematicalOps};

pub fn standard_deviation(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }

    let n = Decimal::from(values.len() as u64);
    let mean = values.iter().copied().sum::<Decimal>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<Decimal>()
        / n;

    round_half_up(variance.sqrt().unwrap_or(Decimal::ZERO), 4)
}

pub fn bollinger_bandwidth(
    days: usize,
    multiplier: Decimal,
    index: usize,
    history: &QuotationHistory,
) -> Decimal {
    let Some(window) = history.window(index, days) else {
        return Decimal::ZERO;
    };

    let closes: Vec<Decimal> = window.iter().map(|q| q.close).collect();
    let std_dev = standard_deviation(&closes);
    let middle = simple_moving_average(days, index, history);
    if std_dev.is_zero() || middle.is_zero() {
        return Decimal::ZERO;
    }

    let upper = middle + multiplier * std_dev;
    let lower = middle - multiplier * std_dev;
    round_half_up((upper - lower) / middle * Decimal::ONE_HUNDRED, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{history_from_closes, history_from_ints};
    use rust_decimal_macros::dec;

    #[test]
    fn stddev_known_values() {
        let values = [
            dec!(2),
            dec!(4),
            dec!(4),
            dec!(4),
            dec!(5),
            dec!(5),
            dec!(7),
            dec!(9),
        ];
        assert_eq!(standard_deviation(&values), dec!(2));
    }

    #[test]
    fn stddev_is_population_and_rounded_to_four_places() {
        // variance = 200 / 3, sqrt = 8.16496...
        assert_eq!(
            standard_deviation(&[dec!(10), dec!(20), dec!(30)]),
            dec!(8.1650)
        );
    }

    #[test]
    fn stddev_keeps_low_price_precision() {
        // population stddev of 0.01 and 0.02 is 0.005
        assert_eq!(standard_deviation(&[dec!(0.01), dec!(0.02)]), dec!(0.005));
    }

    #[test]
    fn stddev_empty_and_constant() {
        assert_eq!(standard_deviation(&[]), Decimal::ZERO);
        assert_eq!(standard_deviation(&[dec!(7); 5]), Decimal::ZERO);
    }

    #[test]
    fn bandwidth_basic() {
        let history = history_from_ints(&[10, 20, 30]);
        // middle 20, stddev 8.1650, width 4 * 8.1650 = 32.66 -> 163.30 %
        assert_eq!(bollinger_bandwidth(3, dec!(2), 0, &history), dec!(163.30));
    }

    #[test]
    fn bandwidth_zero_variance() {
        let history = history_from_closes(&[dec!(55.5); 20]);
        assert_eq!(bollinger_bandwidth(20, dec!(2), 0, &history), Decimal::ZERO);
    }

    #[test]
    fn bandwidth_insufficient_history() {
        let history = history_from_ints(&[10, 20, 30]);
        assert_eq!(bollinger_bandwidth(4, dec!(2), 0, &history), Decimal::ZERO);
        assert_eq!(bollinger_bandwidth(3, dec!(2), 1, &history), Decimal::ZERO);
    }

    #[test]
    fn bandwidth_scales_with_multiplier() {
        let history = history_from_ints(&[10, 20, 30]);
        assert_eq!(bollinger_bandwidth(3, dec!(1), 0, &history), dec!(81.65));
    }
}
