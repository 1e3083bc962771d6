//! CSV file quotation adapter.
//!
//! One file per instrument, `<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume[,currency]`. Prices are parsed exactly
//! into decimals; a missing currency column means USD.

use crate::domain::error::QuotewatchError;
use crate::domain::quotation::{Currency, Quotation};
use crate::ports::quotation_port::QuotationPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const EXTENSION: &str = ".csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}{EXTENSION}"))
    }
}

fn data_error(reason: impl Into<String>) -> QuotewatchError {
    QuotewatchError::Data {
        reason: reason.into(),
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, QuotewatchError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| data_error(format!("missing {name} column")))
}

fn price(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<Decimal, QuotewatchError> {
    let value = field(record, index, name)?;
    Decimal::from_str(value)
        .map_err(|e| data_error(format!("invalid {name} value '{value}': {e}")))
}

fn parse_record(record: &csv::StringRecord) -> Result<Quotation, QuotewatchError> {
    let date_str = field(record, 0, "date")?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| data_error(format!("invalid date format '{date_str}': {e}")))?;

    let open = price(record, 1, "open")?;
    let high = price(record, 2, "high")?;
    let low = price(record, 3, "low")?;
    let close = price(record, 4, "close")?;

    let volume_str = field(record, 5, "volume")?;
    let volume: u64 = volume_str
        .parse()
        .map_err(|e| data_error(format!("invalid volume value '{volume_str}': {e}")))?;

    let currency = match record.get(6).map(str::trim) {
        Some(code) if !code.is_empty() => Currency::from_str(code)?,
        _ => Currency::Usd,
    };

    Ok(Quotation::new(date, open, high, low, close, volume, currency)?)
}

impl QuotationPort for CsvAdapter {
    fn fetch_quotations(&self, symbol: &str) -> Result<Vec<Quotation>, QuotewatchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut quotations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {e}")))?;
            quotations.push(parse_record(&record)?);
        }

        tracing::debug!(symbol, quotations = quotations.len(), "loaded quotations");
        Ok(quotations)
    }

    fn list_instruments(&self) -> Result<Vec<String>, QuotewatchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {e}")))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(EXTENSION) {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
