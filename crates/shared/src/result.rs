use serde::Serialize;

/// Per-group mean radii and extreme spreads for one group size, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSamples {
    pub n_shots: usize,
    pub mean_radii: Vec<f64>,
    pub extreme_spreads: Vec<f64>,
}

impl GroupSamples {
    pub fn with_capacity(n_shots: usize, n_groups: usize) -> Self {
        Self {
            n_shots,
            mean_radii: Vec::with_capacity(n_groups),
            extreme_spreads: Vec::with_capacity(n_groups),
        }
    }

    #[inline]
    pub fn push(&mut self, mean_radius: f64, extreme_spread: f64) {
        self.mean_radii.push(mean_radius);
        self.extreme_spreads.push(extreme_spread);
    }

    pub fn n_groups(&self) -> usize {
        self.mean_radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean_radii.is_empty()
    }
}

/// 5th, 50th and 95th percentile of the MR/ES ratio for one group size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioPercentiles {
    pub n_shots: usize,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl RatioPercentiles {
    pub fn as_array(&self) -> [f64; 3] {
        [self.p5, self.p50, self.p95]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistParams {
    pub loc: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoodnessOfFit {
    pub statistic: f64,
    pub p_value: f64,
}

/// Mean and population variance (ddof 0); `None` for an empty sample.
pub fn mean_and_variance(sample: &[f64]) -> Option<(f64, f64)> {
    if sample.is_empty() {
        return None;
    }
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let var = sample.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    Some((mean, var))
}

/// Moments of a sample, biased (population) estimators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleSummary {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
}

impl SampleSummary {
    pub fn from_sample(sample: &[f64]) -> Self {
        let n = sample.len();
        let Some((mean, m2)) = mean_and_variance(sample) else {
            return Self {
                n,
                mean: f64::NAN,
                std_dev: f64::NAN,
                skewness: f64::NAN,
                excess_kurtosis: f64::NAN,
            };
        };
        let nf = n as f64;
        let (m3, m4) = sample.iter().fold((0.0_f64, 0.0_f64), |(m3, m4), x| {
            let d = x - mean;
            let d2 = d * d;
            (m3 + d2 * d, m4 + d2 * d2)
        });
        let (m3, m4) = (m3 / nf, m4 / nf);
        Self {
            n,
            mean,
            std_dev: m2.sqrt(),
            skewness: m3 / m2.powf(1.5),
            excess_kurtosis: m4 / (m2 * m2) - 3.0,
        }
    }
}
