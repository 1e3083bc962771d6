//! Domain error types.

use chrono::NaiveDate;

/// Failures raised while validating quotations at ingestion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuotationError {
    #[error("invalid OHLC values on {date}: {reason}")]
    InvalidOhlc { date: NaiveDate, reason: String },

    #[error("duplicate quotation date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Failures of a health-check run.
///
/// `MissingIndicator` is recovered inside the rules (the day is skipped);
/// only `NoDataAfterDate` reaches callers of the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthCheckError {
    #[error("no quotation data at or after {date}")]
    NoDataAfterDate { date: NaiveDate },

    #[error("indicators missing for quotation of {date}")]
    MissingIndicator { date: NaiveDate },
}

/// Top-level error type for quotewatch.
#[derive(Debug, thiserror::Error)]
pub enum QuotewatchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no quotations for {instrument}")]
    NoData { instrument: String },

    #[error(transparent)]
    Quotation(#[from] QuotationError),

    #[error(transparent)]
    HealthCheck(#[from] HealthCheckError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuotewatchError> for std::process::ExitCode {
    fn from(err: &QuotewatchError) -> Self {
        let code: u8 = match err {
            QuotewatchError::Io(_) => 1,
            QuotewatchError::ConfigParse { .. }
            | QuotewatchError::ConfigMissing { .. }
            | QuotewatchError::ConfigInvalid { .. } => 2,
            QuotewatchError::Data { .. } | QuotewatchError::Quotation(_) => 3,
            QuotewatchError::NoData { .. } | QuotewatchError::HealthCheck(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
