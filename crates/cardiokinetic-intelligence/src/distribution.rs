// ABOUTME: Integer score histograms for aggregating Monte Carlo outcomes
// ABOUTME: Exact order-statistic percentiles, moments and per-week metric summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use cardiokinetic_core::models::{PercentileSet, PERCENTILE_BREAKPOINTS};
use serde::{Deserialize, Serialize};

/// Number of distinct scores (0 through 100)
pub const SCORE_BINS: usize = 101;

/// Counts of integer scores in `[0, 100]`
///
/// Percentiles interpolate linearly between order statistics, exactly as if
/// computed over the expanded sample list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreHistogram {
    counts: [u64; SCORE_BINS],
    total: u64,
}

impl Default for ScoreHistogram {
    fn default() -> Self {
        Self {
            counts: [0; SCORE_BINS],
            total: 0,
        }
    }
}

impl ScoreHistogram {
    /// Empty histogram
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one score; values above 100 count as 100
    pub fn record(&mut self, score: u8) {
        let bin = usize::from(score).min(SCORE_BINS - 1);
        self.counts[bin] += 1;
        self.total += 1;
    }

    /// Add another histogram's counts
    pub fn merge(&mut self, other: &Self) {
        for (count, extra) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += extra;
        }
        self.total += other.total;
    }

    /// Number of recorded scores
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Score at a 0-based rank in ascending order
    fn value_at_rank(&self, rank: u64) -> f64 {
        let mut seen = 0_u64;
        for (score, count) in self.counts.iter().enumerate() {
            seen += count;
            if seen > rank {
                return score as f64;
            }
        }
        (SCORE_BINS - 1) as f64
    }

    /// Percentile by linear interpolation between order statistics; empty yields 0
    #[must_use]
    pub fn percentile(&self, percentile: f64) -> f64 {
        match self.total {
            0 => 0.0,
            1 => self.value_at_rank(0),
            n => {
                let rank = percentile.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
                let lower = rank.floor();
                let weight = rank - lower;
                let low_value = self.value_at_rank(lower as u64);
                let high_value = self.value_at_rank(rank.ceil() as u64);
                (high_value - low_value).mul_add(weight, low_value)
            }
        }
    }

    /// Arithmetic mean; empty yields 0
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(score, count)| score as f64 * *count as f64)
            .sum();
        sum / self.total as f64
    }

    /// Population standard deviation; fewer than 2 samples yield 0
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        if self.total < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let squared: f64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(score, count)| (score as f64 - mean).powi(2) * *count as f64)
            .sum();
        (squared / self.total as f64).sqrt()
    }

    /// Smallest recorded score
    #[must_use]
    pub fn min(&self) -> Option<u8> {
        self.counts
            .iter()
            .position(|count| *count > 0)
            .map(|score| score as u8)
    }

    /// Largest recorded score
    #[must_use]
    pub fn max(&self) -> Option<u8> {
        self.counts
            .iter()
            .rposition(|count| *count > 0)
            .map(|score| score as u8)
    }

    /// Six-point percentile set at the standard breakpoints
    #[must_use]
    pub fn percentile_set(&self) -> PercentileSet {
        PercentileSet::from_estimates(PERCENTILE_BREAKPOINTS.map(|breakpoint| self.percentile(breakpoint)))
    }

    /// Summary statistics
    #[must_use]
    pub fn summary(&self) -> MetricSummary {
        MetricSummary {
            mean: self.mean(),
            std_dev: self.std_dev(),
            min: self.min().unwrap_or(0),
            max: self.max().unwrap_or(0),
            p5: self.percentile(5.0),
            p50: self.percentile(50.0),
            p95: self.percentile(95.0),
        }
    }
}

/// Distribution summary of one metric in one week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    /// Mean score
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Lowest score
    pub min: u8,
    /// Highest score
    pub max: u8,
    /// 5th percentile
    pub p5: f64,
    /// Median
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
}

/// End-of-week summaries for both metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    /// 1-based week
    pub week_number: u32,
    /// Fatigue distribution
    pub fatigue: MetricSummary,
    /// Readiness distribution
    pub readiness: MetricSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_matches_expanded_samples() {
        let mut histogram = ScoreHistogram::new();
        for score in [10, 20, 20, 40] {
            histogram.record(score);
        }
        // ranks: 0 -> 10, 1 -> 20, 2 -> 20, 3 -> 40
        assert!((histogram.percentile(50.0) - 20.0).abs() < 1e-12);
        assert!((histogram.percentile(100.0) - 40.0).abs() < 1e-12);
        assert!((histogram.percentile(0.0) - 10.0).abs() < 1e-12);
        // rank 2.7 -> 20 + 0.7 * 20
        assert!((histogram.percentile(90.0) - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_and_moments() {
        let mut left = ScoreHistogram::new();
        left.record(10);
        let mut right = ScoreHistogram::new();
        right.record(30);
        left.merge(&right);
        assert_eq!(left.total(), 2);
        assert!((left.mean() - 20.0).abs() < 1e-12);
        assert!((left.std_dev() - 10.0).abs() < 1e-12);
        assert_eq!(left.min(), Some(10));
        assert_eq!(left.max(), Some(30));
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = ScoreHistogram::new();
        assert!(histogram.percentile(50.0).abs() < f64::EPSILON);
        assert_eq!(histogram.summary().max, 0);
        assert!(histogram.percentile_set().is_monotonic());
    }
}
