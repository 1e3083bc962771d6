//! Bar builders shared by the unit tests.

use crate::domain::history::QuotationHistory;
use crate::domain::quotation::{Currency, Quotation};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset as i64)
}

pub fn bar(
    offset: usize,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: u64,
) -> Quotation {
    Quotation::new(day(offset), open, high, low, close, volume, Currency::Usd).unwrap()
}

/// History of flat bars (open = high = low = close), oldest close first.
pub fn history_from_closes(closes: &[Decimal]) -> QuotationHistory {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| bar(i, close, close, close, close, 1000))
        .collect();
    QuotationHistory::new(bars).unwrap()
}

/// History of integer closes 0..n, oldest first.
pub fn history_from_ints(closes: &[i64]) -> QuotationHistory {
    let closes: Vec<Decimal> = closes.iter().map(|&c| Decimal::from(c)).collect();
    history_from_closes(&closes)
}

/// History from `(open, high, low, close, volume)` tuples, oldest first.
pub fn history_from_bars(bars: &[(Decimal, Decimal, Decimal, Decimal, u64)]) -> QuotationHistory {
    let bars = bars
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close, volume))| bar(i, open, high, low, close, volume))
        .collect();
    QuotationHistory::new(bars).unwrap()
}
