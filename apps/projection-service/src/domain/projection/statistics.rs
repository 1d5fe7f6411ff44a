//! Statistical helpers for return and ensemble summaries.

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    Some((variance_sum / (values.len() - 1) as f64).sqrt())
}

/// Median of an ascending-sorted slice.
///
/// Even lengths average the two middle values.
#[must_use]
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        Some(f64::midpoint(sorted[n / 2 - 1], sorted[n / 2]))
    } else {
        Some(sorted[n / 2])
    }
}

/// Median of an unsorted slice.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

/// Nearest-rank percentile of an ascending-sorted slice, `q` in `[0, 1]`.
///
/// Picks the value at rank `ceil(n * q)` (1-based), or the minimum for `q = 0`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let rank = (n as f64 * q).ceil() as usize;
    Some(sorted[rank.saturating_sub(1).min(n - 1)])
}

/// Cross-path summary at a single time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummary {
    /// Mean across paths.
    pub mean: f64,
    /// Median across paths.
    pub median: f64,
    /// 5th percentile across paths.
    pub lower: f64,
    /// 95th percentile across paths.
    pub upper: f64,
}

impl StepSummary {
    /// All four statistics are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.mean.is_finite()
            && self.median.is_finite()
            && self.lower.is_finite()
            && self.upper.is_finite()
    }
}

/// Lower band quantile.
pub const LOWER_BAND_QUANTILE: f64 = 0.05;

/// Upper band quantile.
pub const UPPER_BAND_QUANTILE: f64 = 0.95;

/// Summarize one ensemble row.
///
/// `scratch` holds the row on entry and is sorted in place.
#[must_use]
pub fn summarize_row(scratch: &mut [f64]) -> Option<StepSummary> {
    let mean = mean(scratch)?;
    scratch.sort_by(f64::total_cmp);

    Some(StepSummary {
        mean,
        median: median_sorted(scratch)?,
        lower: percentile(scratch, LOWER_BAND_QUANTILE)?,
        upper: percentile(scratch, UPPER_BAND_QUANTILE)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10.0, 20.0, 30.0, 40.0]), Some(25.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_dev() {
        let std = sample_std_dev(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        // sqrt(500 / 3)
        assert!((std - 12.909_944_487_358_056).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_percentile_bounds() {
        let sorted: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.05), Some(5.0));
        assert_eq!(percentile(&sorted, 0.95), Some(95.0));
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 1.0), Some(100.0));
        assert_eq!(percentile(&sorted, 1.5), None);
    }

    #[test]
    fn test_percentile_small_width_is_not_extreme() {
        let sorted: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.05), Some(1.0));
        assert_eq!(percentile(&sorted, 0.95), Some(19.0));
        assert_eq!(percentile(&[7.0], 0.95), Some(7.0));
    }

    #[test]
    fn test_summarize_constant_row() {
        let mut row = vec![100.0; 7];
        let summary = summarize_row(&mut row).unwrap();
        assert_eq!(summary.mean, 100.0);
        assert_eq!(summary.median, 100.0);
        assert_eq!(summary.lower, 100.0);
        assert_eq!(summary.upper, 100.0);
    }

    #[test]
    fn test_summarize_orders_bands() {
        let mut row = vec![5.0, 1.0, 9.0, 3.0, 7.0];
        let summary = summarize_row(&mut row).unwrap();
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.median, 5.0);
        assert!(summary.lower <= summary.median && summary.median <= summary.upper);
        assert!(summary.is_finite());
    }

    #[test]
    fn test_summarize_overflowed_row_is_not_finite() {
        let mut row = vec![f64::INFINITY, f64::NEG_INFINITY, 1.0];
        let summary = summarize_row(&mut row).unwrap();
        assert!(summary.mean.is_nan());
        assert!(!summary.is_finite());
    }
}
