//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod health_check;
pub mod history;
pub mod indicator;
pub mod quotation;

#[cfg(test)]
pub(crate) mod test_support;
