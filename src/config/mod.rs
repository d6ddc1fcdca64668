pub mod config;
pub mod tradeoff;
