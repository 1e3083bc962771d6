//! Health-check rules.
//!
//! Every rule maps `(start_index, history)` to protocol entries. The history
//! is sorted most recent first, so the walk covers indices `0..=start_index`.
//! A day a rule cannot evaluate yields `Err(MissingIndicator)` from the day
//! evaluator and is skipped; the walk always continues.

mod climax;
mod counting;
mod extremum;
mod market_pattern;
mod moving_average;
mod pattern;

use crate::domain::error::HealthCheckError;
use crate::domain::health_check::protocol::ProtocolEntry;
use crate::domain::history::QuotationHistory;
use crate::domain::quotation::Quotation;
use std::fmt;

pub use climax::{FIFTEEN_DAY_CLIMAX_PERCENT, FIVE_DAY_CLIMAX_PERCENT};
pub use market_pattern::{
    DISTRIBUTION_DAY_PERCENT, DISTRIBUTION_RALLY_PERCENT, FOLLOW_THROUGH_PERCENT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthCheckRule {
    MoreUpThanDownDays,
    MoreDownThanUpDays,
    MoreGoodThanBadCloses,
    MoreBadThanGoodCloses,
    ThreeLowerClosesOnVolume,
    ThreeHigherClosesOnVolume,
    LargestUpDay,
    LargestDownDay,
    LargestSpread,
    LargestVolume,
    UpOnVolume,
    DownOnVolume,
    Churning,
    HighVolumeReversal,
    CloseBelowSma50,
    CloseBelowEma21,
    FiveDayClimax,
    FifteenDayClimax,
    FollowThroughDay,
    PocketPivot,
    DistributionDay,
}

impl HealthCheckRule {
    pub fn evaluate(&self, start_index: usize, history: &QuotationHistory) -> Vec<ProtocolEntry> {
        match self {
            HealthCheckRule::MoreUpThanDownDays => {
                counting::more_up_than_down_days(start_index, history)
            }
            HealthCheckRule::MoreDownThanUpDays => {
                counting::more_down_than_up_days(start_index, history)
            }
            HealthCheckRule::MoreGoodThanBadCloses => {
                counting::more_good_than_bad_closes(start_index, history)
            }
            HealthCheckRule::MoreBadThanGoodCloses => {
                counting::more_bad_than_good_closes(start_index, history)
            }
            HealthCheckRule::ThreeLowerClosesOnVolume => {
                counting::three_lower_closes_on_volume(start_index, history)
            }
            HealthCheckRule::ThreeHigherClosesOnVolume => {
                counting::three_higher_closes_on_volume(start_index, history)
            }
            HealthCheckRule::LargestUpDay => extremum::largest_up_day(start_index, history),
            HealthCheckRule::LargestDownDay => extremum::largest_down_day(start_index, history),
            HealthCheckRule::LargestSpread => extremum::largest_spread(start_index, history),
            HealthCheckRule::LargestVolume => extremum::largest_volume(start_index, history),
            HealthCheckRule::UpOnVolume => pattern::up_on_volume(start_index, history),
            HealthCheckRule::DownOnVolume => pattern::down_on_volume(start_index, history),
            HealthCheckRule::Churning => pattern::churning(start_index, history),
            HealthCheckRule::HighVolumeReversal => {
                pattern::high_volume_reversal(start_index, history)
            }
            HealthCheckRule::CloseBelowSma50 => {
                moving_average::close_below_sma50(start_index, history)
            }
            HealthCheckRule::CloseBelowEma21 => {
                moving_average::close_below_ema21(start_index, history)
            }
            HealthCheckRule::FiveDayClimax => climax::five_day_climax(start_index, history),
            HealthCheckRule::FifteenDayClimax => climax::fifteen_day_climax(start_index, history),
            HealthCheckRule::FollowThroughDay => {
                market_pattern::follow_through_day(start_index, history)
            }
            HealthCheckRule::PocketPivot => market_pattern::pocket_pivot(start_index, history),
            HealthCheckRule::DistributionDay => {
                market_pattern::distribution_day(start_index, history)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HealthCheckRule::MoreUpThanDownDays => "more up than down days",
            HealthCheckRule::MoreDownThanUpDays => "more down than up days",
            HealthCheckRule::MoreGoodThanBadCloses => "more good than bad closes",
            HealthCheckRule::MoreBadThanGoodCloses => "more bad than good closes",
            HealthCheckRule::ThreeLowerClosesOnVolume => "three lower closes on volume",
            HealthCheckRule::ThreeHigherClosesOnVolume => "three higher closes on volume",
            HealthCheckRule::LargestUpDay => "largest up day",
            HealthCheckRule::LargestDownDay => "largest down day",
            HealthCheckRule::LargestSpread => "largest spread",
            HealthCheckRule::LargestVolume => "largest volume",
            HealthCheckRule::UpOnVolume => "up on volume",
            HealthCheckRule::DownOnVolume => "down on volume",
            HealthCheckRule::Churning => "churning",
            HealthCheckRule::HighVolumeReversal => "high-volume reversal",
            HealthCheckRule::CloseBelowSma50 => "close below SMA(50)",
            HealthCheckRule::CloseBelowEma21 => "close below EMA(21)",
            HealthCheckRule::FiveDayClimax => "5-day climax",
            HealthCheckRule::FifteenDayClimax => "15-day climax",
            HealthCheckRule::FollowThroughDay => "follow-through day",
            HealthCheckRule::PocketPivot => "pocket pivot",
            HealthCheckRule::DistributionDay => "distribution day",
        }
    }
}

impl fmt::Display for HealthCheckRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs `evaluate_day` for every day from the newest bar back to
/// `start_index`, collecting the entries and skipping days that fail.
pub(crate) fn walk_days<F>(
    start_index: usize,
    history: &QuotationHistory,
    mut evaluate_day: F,
) -> Vec<ProtocolEntry>
where
    F: FnMut(usize, &Quotation) -> Result<Option<ProtocolEntry>, HealthCheckError>,
{
    let mut entries = Vec::new();
    for index in 0..=start_index {
        let Some(quotation) = history.get(index) else {
            break;
        };
        match evaluate_day(index, quotation) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(err) => tracing::trace!(%err, "skipping day"),
        }
    }
    entries
}
