//! Statistics (C10): the descriptive-statistics primitives Monte Carlo
//! (C11) aggregates its distributions with.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of a slice assumed already sorted ascending.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Bessel-corrected (sample) standard deviation; `0.0` for fewer than
/// two observations.
pub fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() as f64 - 1.0)).sqrt()
}

/// Excel `PERCENTILE.INC`-style linear interpolation over a slice
/// assumed already sorted ascending. `p` in `[0, 1]`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = idx - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[derive(Debug, Clone)]
pub struct Histogram {
    pub bin_edges: Vec<f64>,
    pub counts: Vec<u64>,
}

/// Builds a `bins`-bucket histogram spanning `[min, max]`; the
/// maximum value is assigned to the last bin. When every value is
/// identical, the range is treated as `1.0` to avoid a division by
/// zero (all observations land in the first bin).
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    if values.is_empty() {
        return Histogram { bin_edges: vec![0.0; bins + 1], counts: vec![0; bins] };
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = if (max - min).abs() < f64::EPSILON { 1.0 } else { max - min };

    let bin_edges: Vec<f64> = (0..=bins).map(|i| min + range * (i as f64 / bins as f64)).collect();
    let mut counts = vec![0u64; bins];
    for &v in values {
        let raw_idx = ((v - min) / range * bins as f64).floor();
        let idx = if raw_idx < 0.0 {
            0
        } else if raw_idx as usize >= bins {
            bins - 1
        } else {
            raw_idx as usize
        };
        counts[idx] += 1;
    }
    Histogram { bin_edges, counts }
}

/// `stdDev(runningMeans) / mean(runningMeans)` over the last 10% of
/// runs; `1.0` when fewer than 100 runs have completed.
pub fn convergence_diagnostic(running_means: &[f64]) -> f64 {
    let runs = running_means.len();
    if runs < 100 {
        return 1.0;
    }
    let tail_len = ((runs as f64) * 0.10).ceil() as usize;
    let tail_start = runs - tail_len.max(1).min(runs);
    let tail = &running_means[tail_start..];
    if tail.len() < 2 {
        return 0.0;
    }
    let m = mean(tail);
    if m.abs() < 1e-12 {
        return 0.0;
    }
    stddev(tail) / m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_matches_excel_inc_on_small_sample() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(percentile_sorted(&sorted, 1.0), 5.0);
        assert_eq!(percentile_sorted(&sorted, 0.5), 3.0);
        assert_eq!(percentile_sorted(&sorted, 0.25), 2.0);
    }

    #[test]
    fn stddev_uses_bessel_correction() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = stddev(&values);
        assert!((sd - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn histogram_handles_degenerate_range() {
        let values = vec![5.0; 20];
        let hist = histogram(&values, 10);
        assert_eq!(hist.counts.iter().sum::<u64>(), 20);
        assert_eq!(hist.counts[0], 20);
    }

    #[test]
    fn histogram_assigns_max_value_to_last_bin() {
        let values = vec![0.0, 10.0];
        let hist = histogram(&values, 10);
        assert_eq!(hist.counts[9], 1);
        assert_eq!(hist.counts[0], 1);
    }

    #[test]
    fn convergence_diagnostic_defaults_to_one_below_100_runs() {
        let means: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert_eq!(convergence_diagnostic(&means), 1.0);
    }

    #[test]
    fn convergence_diagnostic_is_small_for_a_stable_tail() {
        let mut means: Vec<f64> = (0..200).map(|i| 100.0 + (i as f64 * 0.001)).collect();
        means.truncate(200);
        assert!(convergence_diagnostic(&means) < 0.01);
    }
}
