//! # Split Pipeline
//!
//! The engine ties the planner, the filter composer and the media tool
//! together and runs the resulting jobs one after another.

pub mod engine;

// Re-exports for convenience
pub use engine::{SplitEngine, SplitPlan, SplitReport, SplitRequest};
