mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use shotgroup_shared::config::{SimulationConfig, BASE_SEED, BATCH_SIZE, GROUPS_PER_SIZE};

#[derive(Parser)]
#[command(name = "shotgroup", about = "Shot group ES / MR Monte Carlo")]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SimArgs {
    /// Groups simulated per group size
    #[arg(long, default_value_t = GROUPS_PER_SIZE)]
    simulations: usize,
    /// Groups generated per batch (bounds memory)
    #[arg(long, default_value_t = BATCH_SIZE)]
    batch_size: usize,
    /// Base seed; each group size uses seed + n_shots
    #[arg(long, default_value_t = BASE_SEED)]
    seed: u64,
    /// Number of parallel workers (0 = auto)
    #[arg(long, default_value = "0")]
    workers: usize,
}

impl SimArgs {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            base_seed: self.seed,
            batch_size: self.batch_size,
            n_groups: self.simulations,
            ..SimulationConfig::default()
        }
    }

    fn n_workers(&self) -> Option<usize> {
        if self.workers == 0 {
            None
        } else {
            Some(self.workers)
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the ES -> MR percentile lookup table
    Table {
        #[command(flatten)]
        sim: SimArgs,
        /// Smallest group size (columns)
        #[arg(long, default_value = "3")]
        min_shots: usize,
        /// Largest group size (columns)
        #[arg(long, default_value = "25")]
        max_shots: usize,
        /// Number of ES rows, 0.1 MOA apart starting at 0.1
        #[arg(long, default_value = "20")]
        es_rows: usize,
        /// Output file
        #[arg(short, long, default_value = "es_to_mr_table.js")]
        output: String,
        /// Write plain JSON instead of a JavaScript const
        #[arg(long)]
        json: bool,
    },
    /// Fit Normal and Rayleigh distributions to simulated mean radii
    Distribution {
        #[command(flatten)]
        sim: SimArgs,
        /// Group sizes to analyze
        #[arg(long, value_delimiter = ',', default_value = "3,5,10,20")]
        group_sizes: Vec<usize>,
        /// Directory for the per-group-size fit records
        #[arg(long, default_value = ".")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Table {
            sim,
            min_shots,
            max_shots,
            es_rows,
            output,
            json,
        } => commands::table::run(
            &sim.config(),
            sim.n_workers(),
            min_shots..=max_shots,
            es_rows,
            &output,
            json,
        ),
        Commands::Distribution {
            sim,
            group_sizes,
            output_dir,
        } => commands::distribution::run(&sim.config(), sim.n_workers(), group_sizes, &output_dir),
    }
}
