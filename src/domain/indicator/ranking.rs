//! Relative strength (RS) numbers.
//!
//! A population of indicator sets (one per instrument, usually the most
//! recent) is sorted descending by a metric and each element gets
//! `round((N - position) / N * 100)`. The sort is stable, so equal metrics
//! keep their input order; an element whose metric equals its predecessor's
//! shares the predecessor's rank.

use crate::domain::indicator::IndicatorSet;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingCriterion {
    RsPercentSum,
    DistanceTo52WeekHigh,
    UpDownVolumeRatio,
}

impl RankingCriterion {
    pub const ALL: [RankingCriterion; 3] = [
        RankingCriterion::RsPercentSum,
        RankingCriterion::DistanceTo52WeekHigh,
        RankingCriterion::UpDownVolumeRatio,
    ];

    pub fn metric(&self, set: &IndicatorSet) -> Decimal {
        match self {
            RankingCriterion::RsPercentSum => set.rs_percent_sum,
            RankingCriterion::DistanceTo52WeekHigh => set.distance_to_52_week_high,
            RankingCriterion::UpDownVolumeRatio => set.up_down_volume_ratio,
        }
    }

    fn assign(&self, set: &mut IndicatorSet, rank: u32) {
        match self {
            RankingCriterion::RsPercentSum => set.rs_number = rank,
            RankingCriterion::DistanceTo52WeekHigh => set.rs_number_distance_52_week_high = rank,
            RankingCriterion::UpDownVolumeRatio => set.rs_number_up_down_volume_ratio = rank,
        }
    }
}

impl fmt::Display for RankingCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingCriterion::RsPercentSum => write!(f, "RS percent sum"),
            RankingCriterion::DistanceTo52WeekHigh => write!(f, "distance to 52-week high"),
            RankingCriterion::UpDownVolumeRatio => write!(f, "up/down volume ratio"),
        }
    }
}

/// Rank of every metric, in input order.
pub fn rs_ranks(metrics: &[Decimal]) -> Vec<u32> {
    let n = metrics.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| metrics[b].cmp(&metrics[a]));

    let mut ranks = vec![0; n];
    let mut previous: Option<(Decimal, u32)> = None;
    for (position, &i) in order.iter().enumerate() {
        let rank = match previous {
            Some((metric, rank)) if metric == metrics[i] => rank,
            _ => percentile(n, position),
        };
        ranks[i] = rank;
        previous = Some((metrics[i], rank));
    }
    ranks
}

/// round((n - position) / n * 100), half up.
fn percentile(n: usize, position: usize) -> u32 {
    let n = n as u64;
    let remaining = n - position as u64;
    ((remaining * 200 + n) / (2 * n)) as u32
}

/// Writes the RS number for `criterion` into every set of the population.
pub fn rank_population(population: &mut [IndicatorSet], criterion: RankingCriterion) {
    let metrics: Vec<Decimal> = population.iter().map(|set| criterion.metric(set)).collect();
    let ranks = rs_ranks(&metrics);
    for (set, rank) in population.iter_mut().zip(ranks) {
        criterion.assign(set, rank);
    }
    tracing::debug!(
        population = population.len(),
        criterion = %criterion,
        "assigned RS numbers"
    );
}

pub fn rank_rs_percent_sum(population: &mut [IndicatorSet]) {
    rank_population(population, RankingCriterion::RsPercentSum);
}

pub fn rank_distance_to_52_week_high(population: &mut [IndicatorSet]) {
    rank_population(population, RankingCriterion::DistanceTo52WeekHigh);
}

pub fn rank_up_down_volume_ratio(population: &mut [IndicatorSet]) {
    rank_population(population, RankingCriterion::UpDownVolumeRatio);
}

/// Ranks the population on all three criteria.
pub fn rank_all(population: &mut [IndicatorSet]) {
    for criterion in RankingCriterion::ALL {
        rank_population(population, criterion);
    }
}
