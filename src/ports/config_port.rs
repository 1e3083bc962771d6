//! Configuration access port trait.

use crate::domain::error::QuotewatchError;
use rust_decimal::Decimal;

/// Typed access to `[section] key` configuration values.
///
/// `Ok(None)` means the key is absent or blank. A value that is present but
/// does not parse as the requested type is a `ConfigInvalid` error.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, QuotewatchError>;
    fn get_decimal(&self, section: &str, key: &str) -> Result<Option<Decimal>, QuotewatchError>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, QuotewatchError>;
}
