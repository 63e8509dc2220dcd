use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use shotgroup_shared::config::{DistributionConfig, SimulationConfig, TableConfig};
use shotgroup_shared::result::{RatioPercentiles, SampleSummary};
use tracing::info;

use crate::error::{Result, SimError};
use crate::fit::{self, Family, FitResult, QqPoint};
use crate::percentile::ratio_triple;
use crate::simulator::simulate_with;
use crate::table::{build_table, LookupTable};

fn build_pool(n_workers: Option<usize>) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_workers.unwrap_or_else(|| rayon::current_num_threads().min(8)))
        .build()
        .map_err(|e| SimError::ThreadPool(e.to_string()))
}

/// Simulate one group size and reduce it to its MR/ES ratio percentiles.
pub fn ratio_percentiles_for(
    n_shots: usize,
    config: &SimulationConfig,
) -> Result<RatioPercentiles> {
    let samples = simulate_with(n_shots, config)?;
    let ratios = ratio_triple(&samples)?;
    info!(
        n_shots,
        groups = samples.n_groups(),
        p5 = ratios.p5,
        p50 = ratios.p50,
        p95 = ratios.p95,
        "ratio percentiles"
    );
    Ok(ratios)
}

/// Ratio percentiles for every group size. Each size has its own seeded
/// stream, so the sizes run in parallel without changing any result.
pub fn run_ratio_percentiles(
    group_sizes: &[usize],
    config: &SimulationConfig,
    n_workers: Option<usize>,
) -> Result<BTreeMap<usize, RatioPercentiles>> {
    config.validate()?;
    let pool = build_pool(n_workers)?;

    let results: Result<Vec<RatioPercentiles>> = pool.install(|| {
        group_sizes
            .par_iter()
            .map(|&n_shots| ratio_percentiles_for(n_shots, config))
            .collect()
    });

    Ok(results?.into_iter().map(|r| (r.n_shots, r)).collect())
}

pub fn generate_table(
    table: &TableConfig,
    config: &SimulationConfig,
    n_workers: Option<usize>,
) -> Result<(LookupTable, BTreeMap<usize, RatioPercentiles>)> {
    table.validate()?;
    info!(
        rows = table.es_values.len(),
        columns = table.group_sizes.len(),
        cells = table.n_cells(),
        groups = config.n_groups,
        "generating ES to MR table"
    );
    let ratios = run_ratio_percentiles(&table.group_sizes, config, n_workers)?;
    let lookup = build_table(&table.es_values, &table.group_sizes, &ratios)?;
    Ok((lookup, ratios))
}

/// Everything the plotting side needs for one group size.
#[derive(Debug, Clone, Serialize)]
pub struct MrDistributionReport {
    pub n_shots: usize,
    pub n_groups: usize,
    pub summary: SampleSummary,
    pub fit: FitResult,
    pub better_fit: Family,
    pub qq_normal: Vec<QqPoint>,
    pub qq_rayleigh: Vec<QqPoint>,
    /// Standardized mean radii; large, so left out of serialized records.
    #[serde(skip)]
    pub sample: Vec<f64>,
}

pub fn analyze_mean_radius(
    n_shots: usize,
    config: &SimulationConfig,
    qq_points: usize,
) -> Result<MrDistributionReport> {
    let samples = simulate_with(n_shots, config)?;
    let n_groups = samples.n_groups();
    let sample = fit::standardize(&samples.mean_radii)?;
    let fit = fit::fit_distributions(&sample)?;
    let better_fit = fit.better_fit();
    info!(
        n_shots,
        ks_normal = fit.normal_gof.statistic,
        ks_rayleigh = fit.rayleigh_gof.statistic,
        better = better_fit.name(),
        "mean radius distribution fitted"
    );

    Ok(MrDistributionReport {
        n_shots,
        n_groups,
        summary: SampleSummary::from_sample(&sample),
        qq_normal: fit::qq_points(&sample, Family::Normal, fit.normal, qq_points)?,
        qq_rayleigh: fit::qq_points(&sample, Family::Rayleigh, fit.rayleigh, qq_points)?,
        fit,
        better_fit,
        sample,
    })
}

pub fn run_distribution_analysis(
    dist: &DistributionConfig,
    config: &SimulationConfig,
    n_workers: Option<usize>,
) -> Result<Vec<MrDistributionReport>> {
    dist.validate()?;
    config.validate()?;
    let pool = build_pool(n_workers)?;

    pool.install(|| {
        dist.group_sizes
            .par_iter()
            .map(|&n_shots| analyze_mean_radius(n_shots, config, dist.qq_points))
            .collect()
    })
}
