//! Daily quotation (one trading day of one instrument).

use crate::domain::error::QuotationError;
use crate::domain::indicator::IndicatorSet;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    /// Pence sterling (GBp / GBX); prices are quoted in 1/100 GBP.
    GbpPence,
    Chf,
    Jpy,
    Cad,
}

impl Currency {
    /// Divisor that converts an amount in this currency to its major unit.
    pub fn major_unit_divisor(&self) -> Decimal {
        match self {
            Currency::GbpPence => Decimal::ONE_HUNDRED,
            _ => Decimal::ONE,
        }
    }
}

impl FromStr for Currency {
    type Err = QuotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // GBp and GBP only differ in case, so check the pence spellings first.
        match s.trim() {
            "GBp" | "GBX" | "GBX_PENCE" | "GBP_PENCE" => return Ok(Currency::GbpPence),
            _ => {}
        }
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "CHF" => Ok(Currency::Chf),
            "JPY" => Ok(Currency::Jpy),
            "CAD" => Ok(Currency::Cad),
            _ => Err(QuotationError::UnknownCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::GbpPence => "GBp",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone)]
pub struct Quotation {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    pub currency: Currency,
    /// Derived indicators; `None` until calculated or when trailing history is too short.
    pub indicators: Option<IndicatorSet>,
}

impl Quotation {
    /// Builds a quotation and checks the OHLC invariant
    /// `low <= open, close <= high`.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
        currency: Currency,
    ) -> Result<Self, QuotationError> {
        let quotation = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            currency,
            indicators: None,
        };
        quotation.validate()?;
        Ok(quotation)
    }

    pub fn validate(&self) -> Result<(), QuotationError> {
        let invalid = |reason: &str| QuotationError::InvalidOhlc {
            date: self.date,
            reason: reason.to_string(),
        };

        if self.low > self.high {
            return Err(invalid("low is above high"));
        }
        if self.open < self.low || self.open > self.high {
            return Err(invalid("open is outside the low/high range"));
        }
        if self.close < self.low || self.close > self.high {
            return Err(invalid("close is outside the low/high range"));
        }
        if self.low < Decimal::ZERO {
            return Err(invalid("prices must not be negative"));
        }
        Ok(())
    }

    /// high - low
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Midpoint of the day's high/low range.
    pub fn midpoint(&self) -> Decimal {
        (self.high + self.low) / Decimal::TWO
    }
}
