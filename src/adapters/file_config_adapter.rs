//! INI file configuration adapter.

use crate::domain::error::QuotewatchError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut ini = Ini::new();
        ini.load(path).map_err(std::io::Error::other)?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut ini = Ini::new();
        ini.read(content.to_string())?;
        Ok(Self { ini })
    }

    /// Trimmed value of `[section] key`; blank values count as absent.
    fn raw(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(
        &self,
        section: &str,
        key: &str,
        expected: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, QuotewatchError> {
        let Some(value) = self.raw(section, key) else {
            return Ok(None);
        };
        parse(&value)
            .map(Some)
            .ok_or_else(|| QuotewatchError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{value}' is not {expected}"),
            })
    }
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.raw(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, QuotewatchError> {
        self.parse(section, key, "an integer", |v| v.parse().ok())
    }

    fn get_decimal(&self, section: &str, key: &str) -> Result<Option<Decimal>, QuotewatchError> {
        self.parse(section, key, "a decimal number", parse_decimal)
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, QuotewatchError> {
        self.parse(section, key, "a boolean", parse_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: QuotewatchError) -> String {
        match err {
            QuotewatchError::ConfigInvalid { section, key, .. } => format!("[{section}] {key}"),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn quotations_dir_keeps_inner_spaces() {
        let config = adapter("[data]\nquotations_dir =   /srv/my quotes  \n");
        assert_eq!(
            config.get_string("data", "quotations_dir").as_deref(),
            Some("/srv/my quotes")
        );
    }

    #[test]
    fn blank_value_counts_as_absent() {
        let config = adapter("[logging]\nlevel =\n[indicators]\natrp_days =  \n");
        assert_eq!(config.get_string("logging", "level"), None);
        assert_eq!(config.get_int("indicators", "atrp_days").unwrap(), None);
        assert_eq!(config.get_int("indicators", "liquidity_days").unwrap(), None);
        assert_eq!(config.get_string("nowhere", "level"), None);
    }

    #[test]
    fn section_and_key_names_ignore_case() {
        let config = adapter("[Indicators]\nBollinger_Days = 20\n");
        assert_eq!(config.get_int("indicators", "bollinger_days").unwrap(), Some(20));
    }

    #[test]
    fn window_lengths_parse_signed() {
        let config = adapter("[indicators]\nstochastic_days = 14\natrp_days = -3\n");
        assert_eq!(config.get_int("indicators", "stochastic_days").unwrap(), Some(14));
        assert_eq!(config.get_int("indicators", "atrp_days").unwrap(), Some(-3));
    }

    #[test]
    fn fractional_window_is_invalid() {
        let config = adapter("[indicators]\nliquidity_days = 20.5\n");
        let err = config.get_int("indicators", "liquidity_days").unwrap_err();
        assert_eq!(invalid_key(err), "[indicators] liquidity_days");
    }

    #[test]
    fn multiplier_accepts_plain_and_exponent_forms() {
        let config = adapter(
            "[indicators]\nbollinger_multiplier =  2.15  \nplain = 2\nexponent = 25e-1\n",
        );
        assert_eq!(
            config.get_decimal("indicators", "bollinger_multiplier").unwrap(),
            Some(dec!(2.15))
        );
        assert_eq!(config.get_decimal("indicators", "plain").unwrap(), Some(dec!(2)));
        assert_eq!(config.get_decimal("indicators", "exponent").unwrap(), Some(dec!(2.5)));
    }

    #[test]
    fn spelled_out_multiplier_is_invalid() {
        let config = adapter("[indicators]\nbollinger_multiplier = two\n");
        let err = config.get_decimal("indicators", "bollinger_multiplier").unwrap_err();
        assert_eq!(invalid_key(err), "[indicators] bollinger_multiplier");
    }

    #[test]
    fn extended_rules_switch_spellings() {
        let config = adapter(
            "[health_check]\na = TRUE\nb = on\nc = 1\nd = No\ne = off\nf = 0\n",
        );
        for key in ["a", "b", "c"] {
            assert_eq!(config.get_bool("health_check", key).unwrap(), Some(true));
        }
        for key in ["d", "e", "f"] {
            assert_eq!(config.get_bool("health_check", key).unwrap(), Some(false));
        }
    }

    #[test]
    fn unknown_switch_value_is_invalid() {
        let config = adapter("[health_check]\nextended_rules = maybe\n");
        let err = config.get_bool("health_check", "extended_rules").unwrap_err();
        assert_eq!(invalid_key(err), "[health_check] extended_rules");
    }

    #[test]
    fn from_file_reads_logging_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[logging]\nlevel = debug\nformat = json\n").unwrap();
        let config = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(config.get_string("logging", "level").as_deref(), Some("debug"));
        assert_eq!(config.get_string("logging", "format").as_deref(), Some("json"));
    }

    #[test]
    fn from_file_fails_for_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/quotewatch.ini").is_err());
    }
}
