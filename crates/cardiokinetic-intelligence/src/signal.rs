// ABOUTME: Signal processing primitives for ordered numeric series
// ABOUTME: Smoothing, derivatives, percentiles, CUSUM change points and extrema detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! Signal processing toolkit
//!
//! Domain-agnostic operations over week-indexed series. Every function is
//! total: degenerate inputs return documented fallbacks instead of errors.

use crate::physiological_constants::signal;
use serde::{Deserialize, Serialize};

/// Indices of local peaks and troughs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extrema {
    /// Indices higher than both neighbours by more than the margin
    pub peaks: Vec<usize>,
    /// Indices lower than both neighbours by more than the margin
    pub troughs: Vec<usize>,
}

impl Extrema {
    /// Whether `index` is a peak
    #[must_use]
    pub fn is_peak(&self, index: usize) -> bool {
        self.peaks.binary_search(&index).is_ok()
    }

    /// Whether `index` is a trough
    #[must_use]
    pub fn is_trough(&self, index: usize) -> bool {
        self.troughs.binary_search(&index).is_ok()
    }
}

/// Signal processing operations
pub struct SignalProcessor;

impl SignalProcessor {
    /// Local smoothing window: `max(2, min(n - 1, floor(0.2 n)))`
    #[must_use]
    pub fn local_window(length: usize) -> usize {
        let scaled = (length as f64 * signal::LOCAL_WINDOW_FRACTION).floor() as usize;
        signal::MIN_LOCAL_WINDOW.max(length.saturating_sub(1).min(scaled))
    }

    /// Meso smoothing window: `max(3, min(n, floor(0.4 n)))`
    #[must_use]
    pub fn meso_window(length: usize) -> usize {
        let scaled = (length as f64 * signal::MESO_WINDOW_FRACTION).floor() as usize;
        signal::MIN_MESO_WINDOW.max(length.min(scaled))
    }

    /// Symmetric triangular-weighted moving average
    ///
    /// The kernel has radius `window / 2`; weights fall linearly from the centre.
    /// Near the edges only in-range samples contribute and the weights are
    /// renormalised. Series shorter than the window are returned unchanged.
    #[must_use]
    pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
        if window < 2 || values.len() < window {
            return values.to_vec();
        }

        let radius = window / 2;
        (0..values.len())
            .map(|center| {
                let start = center.saturating_sub(radius);
                let end = (center + radius).min(values.len() - 1);
                let (weighted, total) = (start..=end).fold((0.0, 0.0), |(sum, weights), index| {
                    let distance = center.abs_diff(index);
                    let weight = (radius + 1 - distance) as f64;
                    (weight.mul_add(values[index], sum), weights + weight)
                });
                weighted / total
            })
            .collect()
    }

    /// First derivative
    ///
    /// Central differences inside the series, forward and backward differences at
    /// the ends. Series shorter than 2 yield zeros.
    #[must_use]
    pub fn derivative(values: &[f64]) -> Vec<f64> {
        let n = values.len();
        if n < 2 {
            return vec![0.0; n];
        }

        (0..n)
            .map(|index| match index {
                0 => values[1] - values[0],
                i if i == n - 1 => values[i] - values[i - 1],
                i => (values[i + 1] - values[i - 1]) / 2.0,
            })
            .collect()
    }

    /// Percentile by linear interpolation between order statistics
    ///
    /// `percentile` is clamped to `[0, 100]`; non-finite samples are ignored.
    /// Empty input yields 0.
    #[must_use]
    pub fn percentile(values: &[f64], percentile: f64) -> f64 {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self::percentile_of_sorted(&sorted, percentile)
    }

    /// Percentile of an already ascending slice
    #[must_use]
    pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
        match sorted.len() {
            0 => 0.0,
            1 => sorted[0],
            n => {
                let fraction = if percentile.is_finite() {
                    percentile.clamp(0.0, 100.0) / 100.0
                } else {
                    0.5
                };
                let rank = fraction * (n - 1) as f64;
                let lower = rank.floor() as usize;
                let upper = rank.ceil() as usize;
                let weight = rank - lower as f64;
                (sorted[upper] - sorted[lower]).mul_add(weight, sorted[lower])
            }
        }
    }

    /// Two-sided CUSUM change points over the first difference
    ///
    /// Differences are centred on their mean; each side accumulates deviations
    /// minus a drift of `0.3 x threshold`. When either side exceeds `threshold`
    /// the index (in the original series) is reported and both sums reset.
    /// Series shorter than 3 or a non-positive threshold yield none.
    #[must_use]
    pub fn detect_change_points(values: &[f64], threshold: f64) -> Vec<usize> {
        if values.len() < 3 || !(threshold.is_finite() && threshold > 0.0) {
            return Vec::new();
        }

        let differences: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let mean_difference = Self::mean(&differences);
        let drift = signal::CUSUM_DRIFT_FRACTION * threshold;

        let mut upper = 0.0_f64;
        let mut lower = 0.0_f64;
        let mut change_points = Vec::new();

        for (index, difference) in differences.iter().enumerate() {
            let deviation = difference - mean_difference;
            upper = (upper + deviation - drift).max(0.0);
            lower = (lower - deviation - drift).max(0.0);

            if upper > threshold || lower > threshold {
                change_points.push(index + 1);
                upper = 0.0;
                lower = 0.0;
            }
        }

        change_points
    }

    /// Strict local extrema exceeding both neighbours by more than the margin
    #[must_use]
    pub fn find_extrema(values: &[f64]) -> Extrema {
        Self::find_extrema_with_margin(values, signal::EXTREMA_MARGIN)
    }

    /// Strict local extrema with a custom margin
    #[must_use]
    pub fn find_extrema_with_margin(values: &[f64], margin: f64) -> Extrema {
        let mut extrema = Extrema::default();
        for (offset, triple) in values.windows(3).enumerate() {
            let (before, current, after) = (triple[0], triple[1], triple[2]);
            if current - before > margin && current - after > margin {
                extrema.peaks.push(offset + 1);
            } else if before - current > margin && after - current > margin {
                extrema.troughs.push(offset + 1);
            }
        }
        extrema
    }

    /// Arithmetic mean; empty input yields 0
    #[must_use]
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Population standard deviation; fewer than 2 values yield 0
    #[must_use]
    pub fn std_dev(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let mean = Self::mean(values);
        let variance = values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / values.len() as f64;
        variance.sqrt()
    }
}
