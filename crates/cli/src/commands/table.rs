use std::ops::RangeInclusive;

use anyhow::Context;
use shotgroup_shared::config::{es_range, SimulationConfig, TableConfig, TABLE_ES_STEP};
use shotgroup_sim::runner;

use crate::output;

pub fn run(
    config: &SimulationConfig,
    n_workers: Option<usize>,
    group_sizes: RangeInclusive<usize>,
    es_rows: usize,
    output_path: &str,
    json: bool,
) -> anyhow::Result<()> {
    let table_config = TableConfig {
        es_values: es_range(TABLE_ES_STEP, es_rows),
        group_sizes: group_sizes.collect(),
    };
    table_config.validate()?;
    config.validate()?;

    output::print_table_header(&table_config, config);

    let start = std::time::Instant::now();
    let (table, ratios) = runner::generate_table(&table_config, config, n_workers)?;
    let elapsed = start.elapsed();

    output::print_ratios(&ratios, elapsed);

    let rendered = if json {
        serde_json::to_string_pretty(&table)?
    } else {
        output::format_as_javascript(&table, config.n_groups)?
    };
    std::fs::write(output_path, rendered)
        .with_context(|| format!("failed to write table to {output_path}"))?;

    println!("\nOutput saved to: {}", output_path);
    output::print_sample_lookups(&table);
    Ok(())
}
