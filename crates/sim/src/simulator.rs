use shotgroup_shared::config::{SimulationConfig, MIN_GROUP_SIZE};
use shotgroup_shared::result::GroupSamples;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::shots::ShotSampler;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStatistics {
    pub centroid: [f64; 2],
    pub mean_radius: f64,
    pub extreme_spread: f64,
}

/// Centroid, mean radius and extreme spread of a single group of shots.
pub fn group_statistics(shots: &[[f64; 2]]) -> GroupStatistics {
    let n = shots.len() as f64;
    let (sum_x, sum_y) = shots
        .iter()
        .fold((0.0_f64, 0.0_f64), |(sx, sy), [x, y]| (sx + x, sy + y));
    let centroid = [sum_x / n, sum_y / n];

    let mean_radius = shots
        .iter()
        .map(|[x, y]| (x - centroid[0]).hypot(y - centroid[1]))
        .sum::<f64>()
        / n;

    // Max squared distance over all pairs; sqrt once at the end.
    let mut max_sq = 0.0_f64;
    for (i, [xi, yi]) in shots.iter().enumerate() {
        for [xj, yj] in &shots[i + 1..] {
            let dx = xi - xj;
            let dy = yi - yj;
            max_sq = max_sq.max(dx * dx + dy * dy);
        }
    }

    GroupStatistics {
        centroid,
        mean_radius,
        extreme_spread: max_sq.sqrt(),
    }
}

/// Simulate `n_groups` groups of `n_shots` shots with unit dispersion.
///
/// The random stream is seeded with `seed + n_shots`, so each group size draws
/// its own reproducible stream. Groups are generated `batch_size` at a time;
/// since shots are consumed strictly in order, the batch size only bounds
/// memory and never changes the output.
pub fn simulate(
    n_shots: usize,
    n_groups: usize,
    seed: u64,
    batch_size: usize,
) -> Result<GroupSamples> {
    let config = SimulationConfig {
        base_seed: seed,
        batch_size,
        n_groups,
        ..SimulationConfig::default()
    };
    simulate_with(n_shots, &config)
}

pub fn simulate_with(n_shots: usize, config: &SimulationConfig) -> Result<GroupSamples> {
    if n_shots < MIN_GROUP_SIZE {
        return Err(SimError::invalid(
            "n_shots",
            format!("extreme spread needs at least {MIN_GROUP_SIZE} shots, got {n_shots}"),
        ));
    }
    config.validate()?;

    let mut sampler = ShotSampler::new(config.sigma, config.stream_seed(n_shots));
    let mut samples = GroupSamples::with_capacity(n_shots, config.n_groups);
    let batch_capacity = config.batch_size.min(config.n_groups) * n_shots;
    let mut batch: Vec<[f64; 2]> = Vec::with_capacity(batch_capacity);

    let n_batches = config.n_batches();
    for batch_idx in 0..n_batches {
        let batch_start = batch_idx * config.batch_size;
        let batch_n = config.batch_size.min(config.n_groups - batch_start);

        batch.clear();
        batch.resize(batch_n * n_shots, [0.0; 2]);
        sampler.fill(&mut batch);

        for group in batch.chunks_exact(n_shots) {
            let stats = group_statistics(group);
            samples.push(stats.mean_radius, stats.extreme_spread);
        }
        debug!(n_shots, batch = batch_idx + 1, n_batches, groups = batch_n, "batch reduced");
    }

    Ok(samples)
}
