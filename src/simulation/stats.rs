//! Descriptive statistics shared by the ensemble and variance analyzers.
//!
//! All functions are population statistics over `f64` slices and return
//! 0.0 for empty input instead of NaN.

use crate::types::Percentiles;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by n).
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// sqrt(mean(x²)). Unlike the std-dev it is non-zero for any non-zero input.
pub fn root_mean_square(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Third standardized moment. Zero when there is no dispersion.
pub fn skewness(values: &[f64]) -> f64 {
    let sd = std_dev(values);
    if sd < 1e-12 {
        return 0.0;
    }
    let m = mean(values);
    let third = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / values.len() as f64;
    third / sd.powi(3)
}

/// Percentile `p` (0–100) of an ascending slice, linearly interpolated
/// between the neighbouring order statistics.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Sort a copy ascending. NaNs compare equal and so keep their place.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

pub fn percentiles(sorted: &[f64]) -> Percentiles {
    Percentiles {
        p5: percentile(sorted, 5.0),
        p25: percentile(sorted, 25.0),
        p50: percentile(sorted, 50.0),
        p75: percentile(sorted, 75.0),
        p95: percentile(sorted, 95.0),
    }
}

/// Keep roughly `target` evenly spaced points, always including the last.
pub fn thin(series: &[f64], target: usize) -> Vec<f64> {
    if target == 0 || series.len() <= target {
        return series.to_vec();
    }
    let step = (series.len() / target).max(1);
    let mut out: Vec<f64> = series.iter().step_by(step).copied().collect();
    let last_index = series.len() - 1;
    if last_index % step != 0 {
        out.push(series[last_index]);
    }
    out
}

/// Pointwise mean of equal-length series. Shorter series are ignored
/// past their end rather than treated as zero.
pub fn pointwise_mean(series: &[Vec<f64>]) -> Vec<f64> {
    let len = series.iter().map(Vec::len).max().unwrap_or(0);
    (0..len)
        .map(|i| {
            let column: Vec<f64> = series.iter().filter_map(|s| s.get(i).copied()).collect();
            mean(&column)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
