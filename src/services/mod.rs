pub mod ai;
pub mod assistant;
pub mod classifier;
pub mod context;
pub mod formatters;
