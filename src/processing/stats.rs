// Statistical primitives shared by the analysis engines
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use serde::Serialize;

/// Sort a copy of the values in ascending order
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator)
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values)?;
    let sum_sq = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Quantile of already sorted values using linear interpolation between closest ranks
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;

    match (sorted.get(idx), sorted.get(idx + 1)) {
        (Some(lo), Some(hi)) => Some(lo + frac * (hi - lo)),
        (Some(lo), None) => Some(*lo),
        _ => None,
    }
}

/// Quantile of unsorted values
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

/// Median of unsorted values
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Adjusted Fisher-Pearson skewness; zero for constant data
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 3 {
        return None;
    }

    let mean = mean(values)?;
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), &x| {
        let d = x - mean;
        (m2 + d * d, m3 + d * d * d)
    });

    if m2 == 0.0 {
        return Some(0.0);
    }

    Some((n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5)))
}

/// Bias-corrected excess kurtosis; zero for constant data
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 4 {
        return None;
    }

    let mean = mean(values)?;
    let (m2, m4) = values.iter().fold((0.0, 0.0), |(m2, m4), &x| {
        let d2 = (x - mean).powi(2);
        (m2 + d2, m4 + d2 * d2)
    });

    let denom = (n - 2.0) * (n - 3.0) * m2 * m2;
    if denom == 0.0 {
        return Some(0.0);
    }

    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numer = n * (n + 1.0) * (n - 1.0) * m4;
    Some(numer / denom - adj)
}

/// Pearson correlation of paired observations
///
/// Undefined (None) with fewer than two pairs or when either side is constant.
pub fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut numerator = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;

    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;

        numerator += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    if denom_x == 0.0 || denom_y == 0.0 {
        None
    } else {
        Some((numerator / (denom_x.sqrt() * denom_y.sqrt())).clamp(-1.0, 1.0))
    }
}

/// Least-squares line `y = slope * x + intercept`
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let (sxy, sxx) = xs.iter().zip(ys).fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        (sxy + (x - mean_x) * (y - mean_y), sxx + (x - mean_x).powi(2))
    });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// One histogram bin, half-open except for the last
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the value range
///
/// A degenerate range (all values equal) is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let (lo, hi) = match (min(values), max(values)) {
        (Some(lo), Some(hi)) if lo < hi => (lo, hi),
        (Some(v), Some(_)) => (v - 0.5, v + 0.5),
        _ => return Vec::new(),
    };

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];

    for &x in values {
        let idx = (((x - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Smallest value
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Largest value
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Count, moments and five-number summary of a numeric sample
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Summarize a sample of non-null values
    pub fn from_values(values: &[f64]) -> Self {
        let sorted = sorted(values);

        NumericSummary {
            count: values.len(),
            mean: mean(values),
            std: std_dev(values),
            min: sorted.first().copied(),
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}
