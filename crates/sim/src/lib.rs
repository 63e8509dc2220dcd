pub mod error;
pub mod fit;
pub mod percentile;
pub mod runner;
pub mod shots;
pub mod simulator;
pub mod table;

pub use error::{Result, SimError};
