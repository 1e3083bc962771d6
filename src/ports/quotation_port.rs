//! Quotation access port trait.

use crate::domain::error::QuotewatchError;
use crate::domain::history::QuotationHistory;
use crate::domain::quotation::Quotation;

pub trait QuotationPort {
    /// All quotations of `symbol`, in any order.
    fn fetch_quotations(&self, symbol: &str) -> Result<Vec<Quotation>, QuotewatchError>;

    /// Symbols with quotation data, sorted.
    fn list_instruments(&self) -> Result<Vec<String>, QuotewatchError>;

    /// Default implementation: builds a sorted history from `fetch_quotations`,
    /// rejecting instruments without any quotation.
    fn fetch_history(&self, symbol: &str) -> Result<QuotationHistory, QuotewatchError> {
        let quotations = self.fetch_quotations(symbol)?;
        if quotations.is_empty() {
            return Err(QuotewatchError::NoData {
                instrument: symbol.to_string(),
            });
        }
        Ok(QuotationHistory::new(quotations)?)
    }
}
