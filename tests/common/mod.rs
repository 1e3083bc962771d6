#![allow(dead_code)]

use chrono::NaiveDate;
use quotewatch::domain::error::QuotewatchError;
use quotewatch::domain::history::QuotationHistory;
use quotewatch::domain::quotation::{Currency, Quotation};
use quotewatch::ports::quotation_port::QuotationPort;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Write;

pub struct MockQuotationPort {
    pub data: HashMap<String, Vec<Quotation>>,
    pub errors: HashMap<String, String>,
}

impl MockQuotationPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_quotations(mut self, symbol: &str, quotations: Vec<Quotation>) -> Self {
        self.data.insert(symbol.to_string(), quotations);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotationPort for MockQuotationPort {
    fn fetch_quotations(&self, symbol: &str) -> Result<Vec<Quotation>, QuotewatchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuotewatchError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_instruments(&self) -> Result<Vec<String>, QuotewatchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Date of the `offset`-th generated bar.
pub fn day(offset: usize) -> NaiveDate {
    date(2023, 1, 1) + chrono::Duration::days(offset as i64)
}

pub fn make_quotation(offset: usize, close: Decimal, volume: u64) -> Quotation {
    let spread = close / Decimal::from(50);
    Quotation::new(
        day(offset),
        close,
        close + spread,
        close - spread,
        close,
        volume,
        Currency::Usd,
    )
    .unwrap()
}

/// One bar per close, oldest first, with a constant volume.
pub fn quotations_from_closes(closes: &[Decimal], volume: u64) -> Vec<Quotation> {
    closes
        .iter()
        .enumerate()
        .map(|(offset, &close)| make_quotation(offset, close, volume))
        .collect()
}

/// `count` bars rising by `step` from `start`, oldest first.
pub fn generate_quotations(count: usize, start: i64, step: i64, volume: u64) -> Vec<Quotation> {
    (0..count)
        .map(|i| make_quotation(i, Decimal::from(start + step * i as i64), volume))
        .collect()
}

pub fn history_of(quotations: Vec<Quotation>) -> QuotationHistory {
    QuotationHistory::new(quotations).unwrap()
}

/// CSV file content for the quotation adapter.
pub fn quotations_csv(quotations: &[Quotation]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for q in quotations {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            q.date, q.open, q.high, q.low, q.close, q.volume
        ));
    }
    out
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
