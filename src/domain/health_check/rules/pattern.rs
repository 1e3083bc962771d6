//! Single-day price/volume pattern rules.

use crate::domain::health_check::day_pattern::{
    self, Reversal, day_performance_of, high_volume_reversal as reversal_on_volume,
};
use crate::domain::health_check::protocol::ProtocolEntry;
use crate::domain::health_check::rules::walk_days;
use crate::domain::history::QuotationHistory;

pub(super) fn up_on_volume(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        if !day_pattern::is_up_on_volume(index, history)? {
            return Ok(None);
        }
        let performance = day_performance_of(index, history)?;
        Ok(Some(ProtocolEntry::confirmation(
            quotation.date,
            format!("Up {performance:.2}% on above-average volume"),
        )))
    })
}

pub(super) fn down_on_volume(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        if !day_pattern::is_down_on_volume(index, history)? {
            return Ok(None);
        }
        let performance = day_performance_of(index, history)?;
        Ok(Some(ProtocolEntry::violation(
            quotation.date,
            format!("Down {performance:.2}% on above-average volume"),
        )))
    })
}

pub(super) fn churning(start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        Ok(day_pattern::is_churning(index, history)?.then(|| {
            ProtocolEntry::uncertain(
                quotation.date,
                "Churning: little progress on above-average volume",
            )
        }))
    })
}

pub(super) fn high_volume_reversal(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |_, quotation| {
        let entry = match reversal_on_volume(quotation)? {
            Some(Reversal::Bullish) => Some(ProtocolEntry::confirmation(
                quotation.date,
                "Bullish reversal on above-average volume",
            )),
            Some(Reversal::Bearish) => Some(ProtocolEntry::violation(
                quotation.date,
                "Bearish reversal on above-average volume",
            )),
            None => None,
        };
        Ok(entry)
    })
}
