//! Order statistics and dispersion helpers over price samples
//!
//! All functions are total: empty input yields 0.0 rather than a panic.

use std::cmp::Ordering;

fn ascending(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Percentile `p` (0-100) with linear interpolation between closest ranks
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(ascending);

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Positional median; the mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// The value at which cumulative weight first reaches half the total weight.
///
/// Pairs are ordered by value; negative or non-finite weights count as zero.
/// With no positive weight the positional median is returned.
pub fn weighted_median(values: &[f64], weights: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut pairs: Vec<(f64, f64)> = values
        .iter()
        .zip(weights.iter().chain(std::iter::repeat(&0.0)))
        .map(|(v, w)| (*v, if w.is_finite() { w.max(0.0) } else { 0.0 }))
        .collect();

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return median(values);
    }

    pairs.sort_by(|a, b| ascending(&a.0, &b.0));
    let half = total / 2.0;
    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += weight;
        if cumulative >= half {
            return *value;
        }
    }
    pairs.last().map(|(v, _)| *v).unwrap_or(0.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation divided by the mean; `None` when the mean is not positive
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mu = mean(values);
    if values.is_empty() || mu <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt() / mu)
}

/// Round to a fixed number of decimal places, half away from zero.
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
