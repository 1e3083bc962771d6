//! Configuration validation.
//!
//! Every key is optional; missing keys take the defaults of
//! [`IndicatorSettings`] and [`HealthCheckSettings`]. Present values are
//! validated before any quotation is loaded.

use crate::domain::error::QuotewatchError;
use crate::domain::health_check::HealthCheckSettings;
use crate::domain::indicator::calculator::IndicatorSettings;
use crate::ports::config_port::ConfigPort;
use rust_decimal::Decimal;
use std::path::PathBuf;

pub const DEFAULT_QUOTATIONS_DIR: &str = "./data";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), QuotewatchError> {
    build_indicator_settings(config)?;
    build_health_check_settings(config)?;
    validate_log_format(config)?;
    Ok(())
}

pub fn build_indicator_settings(
    config: &dyn ConfigPort,
) -> Result<IndicatorSettings, QuotewatchError> {
    let defaults = IndicatorSettings::default();

    let settings = IndicatorSettings {
        bollinger_days: read_window(config, "bollinger_days", defaults.bollinger_days, 2)?,
        bollinger_multiplier: read_multiplier(config, defaults.bollinger_multiplier)?,
        stochastic_days: read_window(config, "stochastic_days", defaults.stochastic_days, 1)?,
        atrp_days: read_window(config, "atrp_days", defaults.atrp_days, 1)?,
        up_down_volume_days: read_window(
            config,
            "up_down_volume_days",
            defaults.up_down_volume_days,
            1,
        )?,
        liquidity_days: read_window(config, "liquidity_days", defaults.liquidity_days, 1)?,
        volume_differential_long_days: read_window(
            config,
            "volume_differential_long_days",
            defaults.volume_differential_long_days,
            1,
        )?,
        volume_differential_short_days: read_window(
            config,
            "volume_differential_short_days",
            defaults.volume_differential_short_days,
            1,
        )?,
    };

    if settings.volume_differential_short_days >= settings.volume_differential_long_days {
        return Err(invalid(
            "indicators",
            "volume_differential_short_days",
            "volume_differential_short_days must be less than volume_differential_long_days",
        ));
    }

    Ok(settings)
}

pub fn build_health_check_settings(
    config: &dyn ConfigPort,
) -> Result<HealthCheckSettings, QuotewatchError> {
    let defaults = HealthCheckSettings::default();
    Ok(HealthCheckSettings {
        extended_rules: config
            .get_bool("health_check", "extended_rules")?
            .unwrap_or(defaults.extended_rules),
    })
}

pub fn quotations_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("data", "quotations_dir")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_QUOTATIONS_DIR))
}

pub fn log_level(config: &dyn ConfigPort) -> String {
    config
        .get_string("logging", "level")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

pub fn log_format(config: &dyn ConfigPort) -> String {
    config
        .get_string("logging", "format")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string())
}

fn validate_log_format(config: &dyn ConfigPort) -> Result<(), QuotewatchError> {
    let format = log_format(config);
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(invalid(
            "logging",
            "format",
            &format!("unknown log format '{format}', expected pretty or json"),
        ));
    }
    Ok(())
}

fn read_window(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
    minimum: usize,
) -> Result<usize, QuotewatchError> {
    let Some(value) = config.get_int("indicators", key)? else {
        return Ok(default);
    };
    if value < minimum as i64 {
        return Err(invalid(
            "indicators",
            key,
            &format!("{key} must be at least {minimum}"),
        ));
    }
    Ok(value as usize)
}

fn read_multiplier(config: &dyn ConfigPort, default: Decimal) -> Result<Decimal, QuotewatchError> {
    let Some(value) = config.get_decimal("indicators", "bollinger_multiplier")? else {
        return Ok(default);
    };
    if value <= Decimal::ZERO {
        return Err(invalid(
            "indicators",
            "bollinger_multiplier",
            "bollinger_multiplier must be positive",
        ));
    }
    Ok(value)
}

fn invalid(section: &str, key: &str, reason: &str) -> QuotewatchError {
    QuotewatchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
