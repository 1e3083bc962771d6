//! Counting rules: running tallies from the start day toward the newest bar.

use crate::domain::error::HealthCheckError;
use crate::domain::health_check::day_pattern::{
    average_volume, is_down_day, is_good_close, is_up_day,
};
use crate::domain::health_check::protocol::{ProtocolEntry, ProtocolEntryCategory};
use crate::domain::health_check::rules::walk_days;
use crate::domain::history::QuotationHistory;
use crate::domain::quotation::Quotation;

const CLOSES_IN_RUN: usize = 3;

/// A day with the favourable and unfavourable counts up to and including it.
type DayCount<'a> = (&'a Quotation, usize, usize);

/// Running count of favourable and unfavourable days, one element per day
/// from the start day (first) to the newest bar (last).
fn running_counts<F>(
    start_index: usize,
    history: &QuotationHistory,
    classify: F,
) -> Vec<DayCount<'_>>
where
    F: Fn(usize, &Quotation) -> Option<bool>,
{
    let mut counts = Vec::new();
    let (mut favourable, mut unfavourable) = (0usize, 0usize);
    for index in (0..=start_index).rev() {
        let Some(quotation) = history.get(index) else {
            continue;
        };
        match classify(index, quotation) {
            Some(true) => favourable += 1,
            Some(false) => unfavourable += 1,
            None => {}
        }
        counts.push((quotation, favourable, unfavourable));
    }
    counts
}

/// Up or down day relative to the previous bar. The start day is the
/// reference bar and is not counted itself; flat days count for neither.
fn up_down_counts(start_index: usize, history: &QuotationHistory) -> Vec<DayCount<'_>> {
    running_counts(start_index, history, |index, _| {
        if index == start_index {
            return None;
        }
        if is_up_day(index, history)? {
            Some(true)
        } else if is_down_day(index, history)? {
            Some(false)
        } else {
            None
        }
    })
}

fn close_counts(start_index: usize, history: &QuotationHistory) -> Vec<DayCount<'_>> {
    running_counts(start_index, history, |_, quotation| Some(is_good_close(quotation)))
}

pub(super) fn more_up_than_down_days(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    up_down_counts(start_index, history)
        .into_iter()
        .filter(|(_, up, down)| up > down)
        .map(|(quotation, up, down)| {
            ProtocolEntry::confirmation(
                quotation.date,
                format!("More up days than down days ({up} up, {down} down)"),
            )
        })
        .collect()
}

pub(super) fn more_down_than_up_days(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    up_down_counts(start_index, history)
        .into_iter()
        .filter(|(_, up, down)| down > up)
        .map(|(quotation, up, down)| {
            ProtocolEntry::violation(
                quotation.date,
                format!("More down days than up days ({down} down, {up} up)"),
            )
        })
        .collect()
}

pub(super) fn more_good_than_bad_closes(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    close_counts(start_index, history)
        .into_iter()
        .filter(|(_, good, bad)| good > bad)
        .map(|(quotation, good, bad)| {
            ProtocolEntry::confirmation(
                quotation.date,
                format!("More good closes than bad closes ({good} good, {bad} bad)"),
            )
        })
        .collect()
}

pub(super) fn more_bad_than_good_closes(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    close_counts(start_index, history)
        .into_iter()
        .filter(|(_, good, bad)| bad > good)
        .map(|(quotation, good, bad)| {
            ProtocolEntry::violation(
                quotation.date,
                format!("More bad closes than good closes ({bad} bad, {good} good)"),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lower,
    Higher,
}

impl Direction {
    fn moved(&self, index: usize, history: &QuotationHistory) -> Option<bool> {
        match self {
            Direction::Lower => is_down_day(index, history),
            Direction::Higher => is_up_day(index, history),
        }
    }
}

/// Flags the third close of a run of exactly three closes in `direction`,
/// counted from the oldest close of the run. Each close needs volume above
/// its own 30-day average and the run's volume must exceed the sum of those
/// averages. Runs whose start cannot be determined are skipped.
fn three_closes_on_volume(
    start_index: usize,
    history: &QuotationHistory,
    direction: Direction,
) -> Vec<ProtocolEntry> {
    walk_days(start_index, history, |index, quotation| {
        for offset in 0..CLOSES_IN_RUN {
            if direction.moved(index + offset, history) != Some(true) {
                return Ok(None);
            }
        }
        match direction.moved(index + CLOSES_IN_RUN, history) {
            Some(false) => {}
            Some(true) | None => return Ok(None),
        }

        let (mut volume, mut baseline) = (0u64, 0u64);
        for offset in 0..CLOSES_IN_RUN {
            let day = history
                .get(index + offset)
                .ok_or(HealthCheckError::MissingIndicator {
                    date: quotation.date,
                })?;
            let average = average_volume(day)?;
            if day.volume <= average {
                return Ok(None);
            }
            volume = volume.saturating_add(day.volume);
            baseline = baseline.saturating_add(average);
        }
        if volume <= baseline {
            return Ok(None);
        }

        let (category, text) = match direction {
            Direction::Lower => (
                ProtocolEntryCategory::Violation,
                "Three lower closes on above-average volume",
            ),
            Direction::Higher => (
                ProtocolEntryCategory::Confirmation,
                "Three higher closes on above-average volume",
            ),
        };
        Ok(Some(ProtocolEntry::new(quotation.date, category, text)))
    })
}

pub(super) fn three_lower_closes_on_volume(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    three_closes_on_volume(start_index, history, Direction::Lower)
}

pub(super) fn three_higher_closes_on_volume(
    start_index: usize,
    history: &QuotationHistory,
) -> Vec<ProtocolEntry> {
    three_closes_on_volume(start_index, history, Direction::Higher)
}
