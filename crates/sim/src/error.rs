use shotgroup_shared::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("length mismatch: {mean_radii} mean radii vs {extreme_spreads} extreme spreads")]
    LengthMismatch {
        mean_radii: usize,
        extreme_spreads: usize,
    },
    #[error("empty sample")]
    EmptySample,
    #[error("sample has zero variance, cannot standardize")]
    ZeroVariance,
    #[error("{count} of {total} groups are degenerate (zero extreme spread or non-finite ratio)")]
    DegenerateGroups { count: usize, total: usize },
    #[error("no ratio percentiles computed for group size {n_shots}")]
    MissingRatioPercentiles { n_shots: usize },
    #[error("distribution error: {0}")]
    Distribution(String),
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { name, reason } => SimError::InvalidArgument { name, reason },
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
