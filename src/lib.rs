pub mod cli;
pub mod config;
pub mod feature_flags;
pub mod logging;
pub mod nutrition_aggregator;
pub mod shopping;
