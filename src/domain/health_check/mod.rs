//! Health-check engine.
//!
//! Runs a bundle of rules over one instrument's history from a start date
//! to the newest bar and collects the findings into a [`Protocol`]. The
//! history must already carry its indicator sets (see
//! [`IndicatorCalculator`](crate::domain::indicator::calculator::IndicatorCalculator));
//! days without one are skipped by the rules that need them.

pub mod day_pattern;
pub mod protocol;
pub mod rules;

use crate::domain::error::HealthCheckError;
use crate::domain::history::QuotationHistory;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

pub use protocol::{Protocol, ProtocolEntry, ProtocolEntryCategory, ProtocolStatistics};
pub use rules::HealthCheckRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthCheckProfile {
    Confirmations,
    SellingIntoStrength,
    SellingIntoWeakness,
}

impl HealthCheckProfile {
    pub const ALL: [HealthCheckProfile; 3] = [
        HealthCheckProfile::Confirmations,
        HealthCheckProfile::SellingIntoStrength,
        HealthCheckProfile::SellingIntoWeakness,
    ];

    /// Rules of the profile. `extended` appends the named market patterns.
    pub fn rules(&self, extended: bool) -> Vec<HealthCheckRule> {
        use HealthCheckRule::*;

        let (mut rules, extra) = match self {
            HealthCheckProfile::Confirmations => (
                vec![MoreUpThanDownDays, MoreGoodThanBadCloses, UpOnVolume],
                vec![ThreeHigherClosesOnVolume, FollowThroughDay, PocketPivot],
            ),
            HealthCheckProfile::SellingIntoStrength => (
                vec![
                    LargestUpDay,
                    LargestSpread,
                    LargestVolume,
                    Churning,
                    FiveDayClimax,
                    FifteenDayClimax,
                ],
                vec![],
            ),
            HealthCheckProfile::SellingIntoWeakness => (
                vec![
                    CloseBelowSma50,
                    CloseBelowEma21,
                    LargestDownDay,
                    MoreDownThanUpDays,
                    MoreBadThanGoodCloses,
                    DownOnVolume,
                    HighVolumeReversal,
                    ThreeLowerClosesOnVolume,
                ],
                vec![DistributionDay],
            ),
        };
        if extended {
            rules.extend(extra);
        }
        rules
    }
}

impl fmt::Display for HealthCheckProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthCheckProfile::Confirmations => write!(f, "CONFIRMATIONS"),
            HealthCheckProfile::SellingIntoStrength => write!(f, "SELLING_INTO_STRENGTH"),
            HealthCheckProfile::SellingIntoWeakness => write!(f, "SELLING_INTO_WEAKNESS"),
        }
    }
}

impl FromStr for HealthCheckProfile {
    type Err = String;

    /// Accepts `confirmations`, `selling-into-strength` and
    /// `selling-into-weakness` in any case, with `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "confirmations" => Ok(HealthCheckProfile::Confirmations),
            "selling-into-strength" => Ok(HealthCheckProfile::SellingIntoStrength),
            "selling-into-weakness" => Ok(HealthCheckProfile::SellingIntoWeakness),
            other => Err(format!(
                "unknown profile '{other}' (expected confirmations, \
                 selling-into-strength or selling-into-weakness)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheckSettings {
    pub extended_rules: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HealthCheckEngine {
    settings: HealthCheckSettings,
}

impl HealthCheckEngine {
    pub fn new(settings: HealthCheckSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &HealthCheckSettings {
        &self.settings
    }

    /// Runs all three profiles and merges their findings.
    pub fn check_instrument(
        &self,
        history: &QuotationHistory,
        start_date: NaiveDate,
    ) -> Result<Protocol, HealthCheckError> {
        let rules: Vec<HealthCheckRule> = HealthCheckProfile::ALL
            .iter()
            .flat_map(|profile| profile.rules(self.settings.extended_rules))
            .collect();
        self.run(history, start_date, &rules)
    }

    pub fn check_instrument_with_profile(
        &self,
        history: &QuotationHistory,
        start_date: NaiveDate,
        profile: HealthCheckProfile,
    ) -> Result<Protocol, HealthCheckError> {
        let rules = profile.rules(self.settings.extended_rules);
        self.run(history, start_date, &rules)
    }

    fn run(
        &self,
        history: &QuotationHistory,
        start_date: NaiveDate,
        rules: &[HealthCheckRule],
    ) -> Result<Protocol, HealthCheckError> {
        let start_index = history
            .index_of_date(start_date)
            .ok_or(HealthCheckError::NoDataAfterDate { date: start_date })?;

        let mut entries = Vec::new();
        for rule in rules {
            let found = rule.evaluate(start_index, history);
            tracing::debug!(rule = %rule, entries = found.len(), "evaluated rule");
            entries.extend(found);
        }

        let protocol = Protocol::from_entries(entries);
        let stats = protocol.statistics();
        tracing::debug!(
            %start_date,
            confirmations = stats.confirmations,
            violations = stats.violations,
            uncertain = stats.uncertain,
            "health check complete"
        );
        Ok(protocol)
    }
}
