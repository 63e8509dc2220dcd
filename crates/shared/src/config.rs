// Baseline simulation parameters
pub const BASE_SEED: u64 = 42;
pub const BATCH_SIZE: usize = 50_000;
pub const GROUPS_PER_SIZE: usize = 1_000_000;
pub const SHOT_SIGMA: f64 = 1.0;
pub const MIN_GROUP_SIZE: usize = 2;

// Lookup table axes
pub const TABLE_MIN_GROUP_SIZE: usize = 3;
pub const TABLE_MAX_GROUP_SIZE: usize = 25;
pub const TABLE_ES_STEP: f64 = 0.1;
pub const TABLE_ES_ROWS: usize = 20; // 0.1 to 2.0 MOA
pub const TABLE_PERCENTILES: [f64; 3] = [5.0, 50.0, 95.0];
pub const TABLE_DECIMALS: usize = 4;

pub const DISTRIBUTION_GROUP_SIZES: [usize; 4] = [3, 5, 10, 20];
pub const QQ_POINTS: usize = 1_000;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub base_seed: u64,
    pub batch_size: usize,
    pub n_groups: usize,
    pub sigma: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_seed: BASE_SEED,
            batch_size: BATCH_SIZE,
            n_groups: GROUPS_PER_SIZE,
            sigma: SHOT_SIGMA,
        }
    }
}

impl SimulationConfig {
    /// Seed of the random stream used for groups of `n_shots`.
    #[inline]
    pub fn stream_seed(&self, n_shots: usize) -> u64 {
        self.base_seed.wrapping_add(n_shots as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_groups < 1 {
            return Err(invalid("n_groups", "must be at least 1"));
        }
        if self.batch_size < 1 {
            return Err(invalid("batch_size", "must be at least 1"));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(invalid(
                "sigma",
                format!("must be finite and positive, got {}", self.sigma),
            ));
        }
        Ok(())
    }

    pub fn n_batches(&self) -> usize {
        self.n_groups.div_ceil(self.batch_size.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub es_values: Vec<f64>,
    pub group_sizes: Vec<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            es_values: es_range(TABLE_ES_STEP, TABLE_ES_ROWS),
            group_sizes: (TABLE_MIN_GROUP_SIZE..=TABLE_MAX_GROUP_SIZE).collect(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.es_values.is_empty() {
            return Err(invalid("es_values", "at least one ES value is required"));
        }
        if let Some(es) = self.es_values.iter().find(|es| !(es.is_finite() && **es >= 0.0)) {
            return Err(invalid(
                "es_values",
                format!("ES values must be finite and non-negative, got {es}"),
            ));
        }
        validate_group_sizes(&self.group_sizes)
    }

    pub fn n_cells(&self) -> usize {
        self.es_values.len() * self.group_sizes.len()
    }
}

#[derive(Debug, Clone)]
pub struct DistributionConfig {
    pub group_sizes: Vec<usize>,
    pub qq_points: usize,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            group_sizes: DISTRIBUTION_GROUP_SIZES.to_vec(),
            qq_points: QQ_POINTS,
        }
    }
}

impl DistributionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qq_points < 2 {
            return Err(invalid("qq_points", "must be at least 2"));
        }
        validate_group_sizes(&self.group_sizes)
    }
}

fn validate_group_sizes(group_sizes: &[usize]) -> Result<(), ConfigError> {
    if group_sizes.is_empty() {
        return Err(invalid("group_sizes", "at least one group size is required"));
    }
    if let Some(n) = group_sizes.iter().find(|n| **n < MIN_GROUP_SIZE) {
        return Err(invalid(
            "group_sizes",
            format!("group size {n} is below the minimum of {MIN_GROUP_SIZE} shots"),
        ));
    }
    Ok(())
}

/// `rows` ES values `step, 2*step, ...`, rounded to one decimal.
pub fn es_range(step: f64, rows: usize) -> Vec<f64> {
    (1..=rows)
        .map(|i| (step * i as f64 * 10.0).round() / 10.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sim = SimulationConfig::default();
        assert_eq!(sim.base_seed, 42);
        assert_eq!(sim.batch_size, 50_000);
        assert_eq!(sim.n_groups, 1_000_000);
        assert_eq!(sim.n_batches(), 20);
        assert!(sim.validate().is_ok());

        let table = TableConfig::default();
        assert_eq!(table.group_sizes.first(), Some(&3));
        assert_eq!(table.group_sizes.last(), Some(&25));
        assert_eq!(table.es_values.len(), 20);
        assert_eq!(table.es_values[0], 0.1);
        assert_eq!(table.es_values[2], 0.3);
        assert_eq!(table.es_values[19], 2.0);
        assert_eq!(table.n_cells(), 20 * 23);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_stream_seed_depends_on_group_size() {
        let sim = SimulationConfig::default();
        assert_eq!(sim.stream_seed(5), 47);
        assert_ne!(sim.stream_seed(3), sim.stream_seed(4));
    }

    #[test]
    fn test_partial_last_batch() {
        let sim = SimulationConfig {
            n_groups: 120_001,
            ..SimulationConfig::default()
        };
        assert_eq!(sim.n_batches(), 3);
    }

    #[test]
    fn test_rejects_bad_simulation_config() {
        let zero_groups = SimulationConfig {
            n_groups: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            zero_groups.validate(),
            Err(ConfigError::Invalid { name: "n_groups", .. })
        ));

        let zero_batch = SimulationConfig {
            batch_size: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            zero_batch.validate(),
            Err(ConfigError::Invalid { name: "batch_size", .. })
        ));

        let bad_sigma = SimulationConfig {
            sigma: -1.0,
            ..SimulationConfig::default()
        };
        assert!(bad_sigma.validate().is_err());
    }

    #[test]
    fn test_rejects_single_shot_groups() {
        let table = TableConfig {
            group_sizes: vec![3, 1],
            ..TableConfig::default()
        };
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("group size 1"), "{}", err);

        let dist = DistributionConfig {
            group_sizes: vec![],
            ..DistributionConfig::default()
        };
        assert!(dist.validate().is_err());
    }
}
