use shotgroup_shared::config::TABLE_PERCENTILES;
use shotgroup_shared::result::{GroupSamples, RatioPercentiles};
use tracing::warn;

use crate::error::{Result, SimError};

/// Elementwise MR/ES ratio.
///
/// Groups whose extreme spread is zero (all shots coincident) have no defined
/// ratio; they are counted and reported as [`SimError::DegenerateGroups`].
pub fn ratios(mean_radii: &[f64], extreme_spreads: &[f64]) -> Result<Vec<f64>> {
    if mean_radii.len() != extreme_spreads.len() {
        return Err(SimError::LengthMismatch {
            mean_radii: mean_radii.len(),
            extreme_spreads: extreme_spreads.len(),
        });
    }
    if mean_radii.is_empty() {
        return Err(SimError::EmptySample);
    }

    let ratios: Vec<f64> = mean_radii
        .iter()
        .zip(extreme_spreads)
        .map(|(mr, es)| mr / es)
        .collect();

    let degenerate = ratios.iter().filter(|r| !r.is_finite()).count();
    if degenerate > 0 {
        warn!(degenerate, total = ratios.len(), "degenerate groups in MR/ES ratios");
        return Err(SimError::DegenerateGroups {
            count: degenerate,
            total: ratios.len(),
        });
    }
    Ok(ratios)
}

/// Percentile `p` (0..=100) of an ascending slice, linear interpolation
/// between the order statistics around `p/100 * (N-1)`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let t = idx - lo as f64;
    lerp(sorted[lo], sorted[hi], t)
}

// Interpolates from whichever end is closer, so t = 0 and t = 1 return the
// endpoints exactly.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Sorts `values` in place and returns one percentile per entry of `percentiles`.
pub fn percentiles(values: &mut [f64], percentiles: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(SimError::EmptySample);
    }
    if let Some(p) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(SimError::invalid(
            "percentiles",
            format!("percentile {p} outside [0, 100]"),
        ));
    }
    values.sort_unstable_by(f64::total_cmp);
    Ok(percentiles.iter().map(|&p| percentile(values, p)).collect())
}

/// Percentiles of the MR/ES ratio, in the order requested.
pub fn ratio_percentiles(
    mean_radii: &[f64],
    extreme_spreads: &[f64],
    requested: &[f64],
) -> Result<Vec<f64>> {
    let mut values = ratios(mean_radii, extreme_spreads)?;
    percentiles(&mut values, requested)
}

/// The standard (5, 50, 95) ratio triple for one simulated group size.
pub fn ratio_triple(samples: &GroupSamples) -> Result<RatioPercentiles> {
    let values = ratio_percentiles(
        &samples.mean_radii,
        &samples.extreme_spreads,
        &TABLE_PERCENTILES,
    )?;
    Ok(RatioPercentiles {
        n_shots: samples.n_shots,
        p5: values[0],
        p50: values[1],
        p95: values[2],
    })
}
