//! Protocol: the ordered, categorised findings of one health-check run.

use crate::domain::indicator::round_half_up;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolEntryCategory {
    Confirmation,
    Violation,
    Uncertain,
}

impl fmt::Display for ProtocolEntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolEntryCategory::Confirmation => write!(f, "CONFIRMATION"),
            ProtocolEntryCategory::Violation => write!(f, "VIOLATION"),
            ProtocolEntryCategory::Uncertain => write!(f, "UNCERTAIN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolEntry {
    pub date: NaiveDate,
    pub category: ProtocolEntryCategory,
    pub text: String,
}

impl ProtocolEntry {
    pub fn new(date: NaiveDate, category: ProtocolEntryCategory, text: impl Into<String>) -> Self {
        Self {
            date,
            category,
            text: text.into(),
        }
    }

    pub fn confirmation(date: NaiveDate, text: impl Into<String>) -> Self {
        Self::new(date, ProtocolEntryCategory::Confirmation, text)
    }

    pub fn violation(date: NaiveDate, text: impl Into<String>) -> Self {
        Self::new(date, ProtocolEntryCategory::Violation, text)
    }

    pub fn uncertain(date: NaiveDate, text: impl Into<String>) -> Self {
        Self::new(date, ProtocolEntryCategory::Uncertain, text)
    }
}

/// Counts and percentage shares of each category. Percentages are rounded
/// half up to 2 places and are all zero for an empty protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolStatistics {
    pub confirmations: usize,
    pub violations: usize,
    pub uncertain: usize,
    pub confirmation_percentage: Decimal,
    pub violation_percentage: Decimal,
    pub uncertain_percentage: Decimal,
}

impl ProtocolStatistics {
    fn compute(entries: &[ProtocolEntry]) -> Self {
        let count = |category| entries.iter().filter(|e| e.category == category).count();
        let confirmations = count(ProtocolEntryCategory::Confirmation);
        let violations = count(ProtocolEntryCategory::Violation);
        let uncertain = count(ProtocolEntryCategory::Uncertain);

        let total = entries.len();
        let share = |n: usize| {
            if total == 0 {
                Decimal::ZERO
            } else {
                round_half_up(
                    Decimal::from(n as u64) / Decimal::from(total as u64) * Decimal::ONE_HUNDRED,
                    2,
                )
            }
        };

        Self {
            confirmations,
            violations,
            uncertain,
            confirmation_percentage: share(confirmations),
            violation_percentage: share(violations),
            uncertain_percentage: share(uncertain),
        }
    }

    pub fn total(&self) -> usize {
        self.confirmations + self.violations + self.uncertain
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protocol {
    entries: Vec<ProtocolEntry>,
    statistics: ProtocolStatistics,
}

impl Protocol {
    /// Sorts the entries ascending by date (stable, so entries of the same
    /// day keep their insertion order) and computes the statistics.
    pub fn from_entries(mut entries: Vec<ProtocolEntry>) -> Self {
        entries.sort_by_key(|entry| entry.date);
        let statistics = ProtocolStatistics::compute(&entries);
        Self {
            entries,
            statistics,
        }
    }

    pub fn entries(&self) -> &[ProtocolEntry] {
        &self.entries
    }

    pub fn statistics(&self) -> &ProtocolStatistics {
        &self.statistics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by day, for calendar-style display.
    pub fn entries_by_date(&self) -> BTreeMap<NaiveDate, Vec<&ProtocolEntry>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&ProtocolEntry>> = BTreeMap::new();
        for entry in &self.entries {
            grouped.entry(entry.date).or_default().push(entry);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn entries_sorted_ascending_by_date() {
        let protocol = Protocol::from_entries(vec![
            ProtocolEntry::violation(date(9), "c"),
            ProtocolEntry::confirmation(date(2), "a"),
            ProtocolEntry::uncertain(date(5), "b"),
        ]);
        let texts: Vec<&str> = protocol.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        for pair in protocol.entries().windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
    }

    #[test]
    fn same_day_entries_keep_insertion_order() {
        let protocol = Protocol::from_entries(vec![
            ProtocolEntry::violation(date(3), "first"),
            ProtocolEntry::confirmation(date(1), "earlier"),
            ProtocolEntry::uncertain(date(3), "second"),
        ]);
        let texts: Vec<&str> = protocol.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["earlier", "first", "second"]);
    }

    #[test]
    fn statistics_shares() {
        let protocol = Protocol::from_entries(vec![
            ProtocolEntry::confirmation(date(1), "a"),
            ProtocolEntry::confirmation(date(2), "b"),
            ProtocolEntry::violation(date(3), "c"),
        ]);
        let stats = protocol.statistics();
        assert_eq!(stats.confirmations, 2);
        assert_eq!(stats.violations, 1);
        assert_eq!(stats.uncertain, 0);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.confirmation_percentage, dec!(66.67));
        assert_eq!(stats.violation_percentage, dec!(33.33));
        assert_eq!(stats.uncertain_percentage, Decimal::ZERO);
        let sum = stats.confirmation_percentage
            + stats.violation_percentage
            + stats.uncertain_percentage;
        assert_eq!(sum, dec!(100));
    }

    #[test]
    fn empty_protocol_has_zero_percentages() {
        let protocol = Protocol::from_entries(Vec::new());
        assert!(protocol.is_empty());
        assert_eq!(protocol.statistics(), &ProtocolStatistics::default());
    }

    #[test]
    fn entries_grouped_by_date() {
        let protocol = Protocol::from_entries(vec![
            ProtocolEntry::violation(date(3), "x"),
            ProtocolEntry::confirmation(date(1), "y"),
            ProtocolEntry::uncertain(date(3), "z"),
        ]);
        let grouped = protocol.entries_by_date();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&date(1)].len(), 1);
        let texts: Vec<&str> = grouped[&date(3)].iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "z"]);
    }

    #[test]
    fn category_display() {
        assert_eq!(ProtocolEntryCategory::Violation.to_string(), "VIOLATION");
    }
}
