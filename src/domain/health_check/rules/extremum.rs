//! Extremum rules: global extremes of the whole history, reported only when
//! they fall on or after the start day.

use crate::domain::health_check::day_pattern::day_performance_of;
use crate::domain::health_check::protocol::{ProtocolEntry, ProtocolEntryCategory};
use crate::domain::history::QuotationHistory;
use crate::domain::indicator::performance::percent_change;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Index and value of the extreme `metric` over the whole history. Ties go
/// to the most recent bar.
fn extreme<F>(history: &QuotationHistory, wanted: Ordering, metric: F) -> Option<(usize, Decimal)>
where
    F: Fn(usize) -> Option<Decimal>,
{
    let mut best: Option<(usize, Decimal)> = None;
    for index in 0..history.len() {
        let Some(value) = metric(index) else {
            continue;
        };
        match best {
            Some((_, current)) if value.cmp(&current) != wanted => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

fn report(
    start_index: usize,
    history: &QuotationHistory,
    found: Option<(usize, Decimal)>,
    category: ProtocolEntryCategory,
    describe: impl Fn(Decimal) -> String,
) -> Vec<ProtocolEntry> {
    let Some((index, value)) = found else {
        return Vec::new();
    };
    if index > start_index {
        return Vec::new();
    }
    history
        .get(index)
        .map(|quotation| ProtocolEntry::new(quotation.date, category, describe(value)))
        .into_iter()
        .collect()
}

pub(super) fn largest_up_day(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    let found = extreme(history, Ordering::Greater, |index| {
        day_performance_of(index, history).ok()
    });
    report(start_index, history, found, ProtocolEntryCategory::Uncertain, |value| {
        format!("Largest up day of the history ({value:.2}%)")
    })
}

pub(super) fn largest_down_day(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    let found = extreme(history, Ordering::Less, |index| {
        day_performance_of(index, history).ok()
    });
    report(start_index, history, found, ProtocolEntryCategory::Violation, |value| {
        format!("Largest down day of the history ({value:.2}%)")
    })
}

/// Spread is the high above the low in percent.
pub(super) fn largest_spread(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    let found = extreme(history, Ordering::Greater, |index| {
        history.get(index).map(|q| percent_change(q.high, q.low))
    });
    report(start_index, history, found, ProtocolEntryCategory::Uncertain, |value| {
        format!("Largest high/low spread of the history ({value:.2}%)")
    })
}

pub(super) fn largest_volume(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    let found = extreme(history, Ordering::Greater, |index| {
        history.get(index).map(|q| Decimal::from(q.volume))
    });
    report(start_index, history, found, ProtocolEntryCategory::Uncertain, |value| {
        format!("Largest volume of the history ({value})")
    })
}
