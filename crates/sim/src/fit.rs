//! Normal / Rayleigh fits and one-sample Kolmogorov-Smirnov tests.

use serde::Serialize;
use shotgroup_shared::result::{mean_and_variance, DistParams, GoodnessOfFit};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, SimError};

const RAYLEIGH_MAX_BRACKET_STEPS: usize = 200;
const RAYLEIGH_MAX_BISECTIONS: usize = 200;
const KOLMOGOROV_TERMS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Normal,
    Rayleigh,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Normal => "Normal",
            Family::Rayleigh => "Rayleigh",
        }
    }

    pub fn cdf(&self, x: f64, params: DistParams) -> Result<f64> {
        match self {
            Family::Normal => Ok(normal(params)?.cdf(x)),
            Family::Rayleigh => {
                check_scale(params)?;
                let z = (x - params.loc) / params.scale;
                Ok(if z <= 0.0 { 0.0 } else { -(-0.5 * z * z).exp_m1() })
            }
        }
    }

    pub fn quantile(&self, p: f64, params: DistParams) -> Result<f64> {
        match self {
            Family::Normal => Ok(normal(params)?.inverse_cdf(p)),
            Family::Rayleigh => {
                check_scale(params)?;
                Ok(params.loc + params.scale * (-2.0 * (-p).ln_1p()).sqrt())
            }
        }
    }
}

fn check_scale(params: DistParams) -> Result<()> {
    if params.scale.is_finite() && params.scale > 0.0 && params.loc.is_finite() {
        Ok(())
    } else {
        Err(SimError::Distribution(format!(
            "invalid parameters loc={} scale={}",
            params.loc, params.scale
        )))
    }
}

fn normal(params: DistParams) -> Result<Normal> {
    Normal::new(params.loc, params.scale).map_err(|e| SimError::Distribution(e.to_string()))
}

fn mean_and_std(sample: &[f64]) -> Result<(f64, f64)> {
    let (mean, var) = mean_and_variance(sample).ok_or(SimError::EmptySample)?;
    Ok((mean, var.sqrt()))
}

/// `(x - mean) / std`, population standard deviation.
pub fn standardize(sample: &[f64]) -> Result<Vec<f64>> {
    let (mean, std) = mean_and_std(sample)?;
    if !(std.is_finite() && std > 0.0) {
        return Err(SimError::ZeroVariance);
    }
    Ok(sample.iter().map(|x| (x - mean) / std).collect())
}

/// Maximum-likelihood Normal fit: sample mean and population std.
pub fn fit_normal(sample: &[f64]) -> Result<DistParams> {
    let (loc, scale) = mean_and_std(sample)?;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(SimError::ZeroVariance);
    }
    Ok(DistParams { loc, scale })
}

/// Maximum-likelihood Rayleigh fit with free location.
///
/// For a fixed `loc` the scale MLE is `sqrt(sum(d^2) / 2N)` with `d = x - loc`.
/// Substituting it into the location score leaves
/// `sum(d) - sum(d^2) / 2N * sum(1/d) = 0`, solved by bisection below `min(x)`.
pub fn fit_rayleigh(sample: &[f64]) -> Result<DistParams> {
    let (_, std) = mean_and_std(sample)?;
    if !(std.is_finite() && std > 0.0) {
        return Err(SimError::ZeroVariance);
    }
    let n = sample.len() as f64;
    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);

    let score = |loc: f64| {
        let (s1, s2, s_inv) = sample.iter().fold((0.0_f64, 0.0_f64, 0.0_f64), |(s1, s2, si), x| {
            let d = x - loc;
            (s1 + d, s2 + d * d, si + 1.0 / d)
        });
        s1 - s2 / (2.0 * n) * s_inv
    };

    // score -> -inf as loc -> min from below, and is positive far below min.
    let mut hi = min - std * 1e-9;
    let mut step = std;
    let mut lo = min - step;
    let mut bracketed = false;
    for _ in 0..RAYLEIGH_MAX_BRACKET_STEPS {
        if score(lo) > 0.0 {
            bracketed = true;
            break;
        }
        hi = lo;
        step *= 2.0;
        lo = min - step;
    }
    if !bracketed {
        return Err(SimError::Distribution(
            "rayleigh location score has no sign change".to_string(),
        ));
    }

    for _ in 0..RAYLEIGH_MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if score(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let loc = 0.5 * (lo + hi);
    let s2 = sample.iter().map(|x| (x - loc) * (x - loc)).sum::<f64>();
    Ok(DistParams {
        loc,
        scale: (s2 / (2.0 * n)).sqrt(),
    })
}

/// Survival function of the Kolmogorov distribution, `P(K > x)`.
pub fn kolmogorov_sf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    let p = if x < 1.0 {
        // Jacobi-theta form converges fast for small x.
        let w = std::f64::consts::PI * std::f64::consts::PI / (8.0 * x * x);
        let mut cdf = 0.0;
        for k in 1..=KOLMOGOROV_TERMS {
            let m = (2 * k - 1) as f64;
            let term = (-m * m * w).exp();
            cdf += term;
            if term < 1e-17 {
                break;
            }
        }
        1.0 - (2.0 * std::f64::consts::PI).sqrt() / x * cdf
    } else {
        let mut sf = 0.0;
        let mut sign = 1.0;
        for k in 1..=KOLMOGOROV_TERMS {
            let kf = k as f64;
            let term = (-2.0 * kf * kf * x * x).exp();
            sf += sign * term;
            if term < 1e-17 {
                break;
            }
            sign = -sign;
        }
        2.0 * sf
    };
    p.clamp(0.0, 1.0)
}

/// Two-sided one-sample KS test against `family(params)`, asymptotic p-value.
pub fn goodness_of_fit(
    sample: &[f64],
    family: Family,
    params: DistParams,
) -> Result<GoodnessOfFit> {
    if sample.is_empty() {
        return Err(SimError::EmptySample);
    }
    let mut sorted = sample.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mut statistic = 0.0_f64;
    for (i, &x) in sorted.iter().enumerate() {
        let cdf = family.cdf(x, params)?;
        let d_plus = (i + 1) as f64 / n - cdf;
        let d_minus = cdf - i as f64 / n;
        statistic = statistic.max(d_plus).max(d_minus);
    }
    let statistic = statistic.clamp(0.0, 1.0);

    Ok(GoodnessOfFit {
        statistic,
        p_value: kolmogorov_sf(n.sqrt() * statistic),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitResult {
    pub normal: DistParams,
    pub rayleigh: DistParams,
    pub normal_gof: GoodnessOfFit,
    pub rayleigh_gof: GoodnessOfFit,
}

impl FitResult {
    /// Family with the smaller KS statistic.
    pub fn better_fit(&self) -> Family {
        if self.normal_gof.statistic < self.rayleigh_gof.statistic {
            Family::Normal
        } else {
            Family::Rayleigh
        }
    }
}

pub fn fit_distributions(sample: &[f64]) -> Result<FitResult> {
    let normal = fit_normal(sample)?;
    let rayleigh = fit_rayleigh(sample)?;
    Ok(FitResult {
        normal,
        rayleigh,
        normal_gof: goodness_of_fit(sample, Family::Normal, normal)?,
        rayleigh_gof: goodness_of_fit(sample, Family::Rayleigh, rayleigh)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QqPoint {
    pub theoretical: f64,
    pub sample: f64,
}

/// Q-Q pairs at plotting positions `(i + 0.5) / N`, evenly thinned to at most
/// `max_points` entries.
pub fn qq_points(
    sample: &[f64],
    family: Family,
    params: DistParams,
    max_points: usize,
) -> Result<Vec<QqPoint>> {
    if sample.is_empty() {
        return Err(SimError::EmptySample);
    }
    let mut sorted = sample.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let n = sorted.len();

    let indices: Vec<usize> = if max_points >= n || max_points < 2 {
        (0..n).collect()
    } else {
        (0..max_points)
            .map(|k| k * (n - 1) / (max_points - 1))
            .collect()
    };

    indices
        .into_iter()
        .map(|i| {
            let p = (i as f64 + 0.5) / n as f64;
            Ok(QqPoint {
                theoretical: family.quantile(p, params)?,
                sample: sorted[i],
            })
        })
        .collect()
}
