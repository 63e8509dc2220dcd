pub mod distribution;
pub mod table;
