//! Blue Zone Planner Library
//!
//! Models the shrinking safe zone of battle-royale maps over time and
//! rebalances shrink factors for different player counts.
//!
//! # Features
//!
//! - `parallel` - Sample large query batches and multi-map reports on rayon (enabled by default)

pub mod config;
pub mod report;
pub mod zone;
