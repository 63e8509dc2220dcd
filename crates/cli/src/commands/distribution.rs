use std::path::Path;

use anyhow::Context;
use shotgroup_shared::config::{DistributionConfig, SimulationConfig};
use shotgroup_sim::runner;

use crate::output;

pub fn run(
    config: &SimulationConfig,
    n_workers: Option<usize>,
    group_sizes: Vec<usize>,
    output_dir: &str,
) -> anyhow::Result<()> {
    let dist = DistributionConfig {
        group_sizes,
        ..DistributionConfig::default()
    };
    dist.validate()?;
    config.validate()?;

    println!(
        "Analyzing mean radius distribution for group sizes {:?} ({} groups each)...",
        dist.group_sizes, config.n_groups
    );

    let start = std::time::Instant::now();
    let reports = runner::run_distribution_analysis(&dist, config, n_workers)?;
    let elapsed = start.elapsed();

    let dir = Path::new(output_dir);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    for report in &reports {
        output::print_distribution_report(report);
        let path = dir.join(format!("mr_distribution_n{}.json", report.n_shots));
        let record = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, record)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  Saved: {}", path.display());
    }

    println!("\nAnalysis complete in {:.2}s", elapsed.as_secs_f64());
    Ok(())
}
