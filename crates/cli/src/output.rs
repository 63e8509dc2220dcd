use std::collections::BTreeMap;
use std::time::Duration;

use shotgroup_shared::config::{SimulationConfig, TableConfig};
use shotgroup_shared::result::RatioPercentiles;
use shotgroup_sim::runner::MrDistributionReport;
use shotgroup_sim::table::LookupTable;

pub fn print_table_header(table: &TableConfig, config: &SimulationConfig) {
    println!("========================================");
    println!("  ES to MR Monte Carlo");
    if let (Some(first), Some(last)) = (table.es_values.first(), table.es_values.last()) {
        println!("  ES values:   {} to {} MOA ({} rows)", first, last, table.es_values.len());
    }
    if let (Some(first), Some(last)) = (table.group_sizes.first(), table.group_sizes.last()) {
        println!("  Shot counts: {} to {} ({} columns)", first, last, table.group_sizes.len());
    }
    println!("  Simulations: {} groups per group size", config.n_groups);
    println!("  Total cells: {}", table.n_cells());
    println!("========================================");
}

pub fn print_ratios(ratios: &BTreeMap<usize, RatioPercentiles>, elapsed: Duration) {
    println!("\nMR/ES ratio percentiles ({:.2}s):", elapsed.as_secs_f64());
    for r in ratios.values() {
        println!(
            "  n={:>3}: p5={:.4}, p50={:.4}, p95={:.4}",
            r.n_shots, r.p5, r.p50, r.p95
        );
    }
}

pub fn print_sample_lookups(table: &LookupTable) {
    for (es, n) in [("1.0", 5), ("0.5", 10)] {
        if let Some([p5, p50, p95]) = table.get(es, n) {
            println!("\n  n={} shots, ES={} MOA:", n, es);
            println!("    MR 5th percentile:  {:.4} MOA (optimistic)", p5);
            println!("    MR 50th percentile: {:.4} MOA (typical)", p50);
            println!("    MR 95th percentile: {:.4} MOA (conservative)", p95);
        }
    }
}

/// The table as a `const ES_TO_MR_TABLE = {...};` JavaScript declaration.
pub fn format_as_javascript(table: &LookupTable, n_groups: usize) -> serde_json::Result<String> {
    let header = [
        "// Extreme Spread to Mean Radius lookup table".to_string(),
        format!("// Generated by Monte Carlo simulation ({} groups per sample size)", n_groups),
        "//".to_string(),
        "// Structure: ES_TO_MR_TABLE[es_moa][n_shots] = [p5, p50, p95]".to_string(),
        "//   - es_moa: Extreme spread in MOA (string key, e.g., '0.1', '1.0', '2.0')".to_string(),
        "//   - n_shots: Number of shots in group (string key, e.g., '3', '10', '25')".to_string(),
        "//   - p5: 5th percentile of mean radius (MOA) - optimistic estimate".to_string(),
        "//   - p50: 50th percentile (median) of mean radius (MOA) - typical estimate".to_string(),
        "//   - p95: 95th percentile of mean radius (MOA) - conservative estimate".to_string(),
        "//".to_string(),
        "// Statistical basis: Bivariate normal shot distribution, MR/ES ratio is scale-invariant"
            .to_string(),
        "// Reference: http://ballistipedia.com/index.php?title=Precision_Models".to_string(),
        String::new(),
    ];
    let body = serde_json::to_string_pretty(table)?;
    Ok(format!("{}\nconst ES_TO_MR_TABLE = {};", header.join("\n"), body))
}

pub fn print_distribution_report(report: &MrDistributionReport) {
    let fit = &report.fit;
    println!("\n========================================");
    println!("  n={} shots ({} groups)", report.n_shots, report.n_groups);
    println!(
        "  Sample:   mean={:.6} std={:.6} skew={:.6} kurtosis={:.6}",
        report.summary.mean,
        report.summary.std_dev,
        report.summary.skewness,
        report.summary.excess_kurtosis
    );
    println!("  Normal:   loc={:.6} scale={:.6}", fit.normal.loc, fit.normal.scale);
    println!("  Rayleigh: loc={:.6} scale={:.6}", fit.rayleigh.loc, fit.rayleigh.scale);
    println!(
        "  KS Normal:   statistic={:.6} p={:.2e}",
        fit.normal_gof.statistic, fit.normal_gof.p_value
    );
    println!(
        "  KS Rayleigh: statistic={:.6} p={:.2e}",
        fit.rayleigh_gof.statistic, fit.rayleigh_gof.p_value
    );
    println!("  Better fit: {}", report.better_fit.name());
    println!("========================================");
}
