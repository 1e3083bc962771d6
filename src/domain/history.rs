//! Quotation history of one instrument.
//!
//! Quotations are stored most recent first: index 0 is the newest bar and
//! `index + n` is the bar `n` trading days older. Window calculations go
//! through the accessors below instead of indexing the vector directly.

use crate::domain::error::QuotationError;
use crate::domain::quotation::Quotation;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default)]
pub struct QuotationHistory {
    quotations: Vec<Quotation>,
}

impl QuotationHistory {
    /// Builds a history from bars in any order. Dates must be unique.
    pub fn new(quotations: Vec<Quotation>) -> Result<Self, QuotationError> {
        let mut history = Self { quotations };
        history.sort_by_date_descending();

        if let Some(pair) = history
            .quotations
            .windows(2)
            .find(|pair| pair[0].date == pair[1].date)
        {
            return Err(QuotationError::DuplicateDate { date: pair[0].date });
        }

        Ok(history)
    }

    pub fn sort_by_date_descending(&mut self) {
        self.quotations.sort_by(|a, b| b.date.cmp(&a.date));
    }

    pub fn len(&self) -> usize {
        self.quotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotations.is_empty()
    }

    pub fn quotations(&self) -> &[Quotation] {
        &self.quotations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quotation> {
        self.quotations.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Quotation> {
        self.quotations.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Quotation> {
        self.quotations.get_mut(index)
    }

    pub fn most_recent(&self) -> Option<&Quotation> {
        self.quotations.first()
    }

    /// The bar `bars` trading days older than `index`.
    pub fn older(&self, index: usize, bars: usize) -> Option<&Quotation> {
        self.quotations.get(index.checked_add(bars)?)
    }

    /// The bar `bars` trading days more recent than `index`.
    pub fn newer(&self, index: usize, bars: usize) -> Option<&Quotation> {
        self.quotations.get(index.checked_sub(bars)?)
    }

    /// Number of bars from `index` back to the oldest bar, inclusive.
    pub fn trailing_len(&self, index: usize) -> usize {
        self.quotations.len().saturating_sub(index)
    }

    /// The `days` bars ending at `index` (newest first), or `None` when the
    /// history does not reach back far enough.
    pub fn window(&self, index: usize, days: usize) -> Option<&[Quotation]> {
        if days == 0 {
            return None;
        }
        let end = index.checked_add(days)?;
        if end > self.quotations.len() {
            return None;
        }
        Some(&self.quotations[index..end])
    }

    /// Index of the first quotation at or after `date`, or `None` if `date`
    /// is newer than all available data.
    pub fn index_of_date(&self, date: NaiveDate) -> Option<usize> {
        self.quotations
            .iter()
            .enumerate()
            .rev()
            .find(|(_, q)| q.date >= date)
            .map(|(i, _)| i)
    }

    /// Index of `quotation` within this history. Dates are unique, so the
    /// date identifies the quotation.
    pub fn index_of_quotation(&self, quotation: &Quotation) -> Option<usize> {
        self.quotations.iter().position(|q| q.date == quotation.date)
    }
}
