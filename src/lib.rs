//! Well-schedule generator for hydrogen storage reservoir simulation.
//!
//! Converts an energy-system load profile and a storage filling-level
//! profile into derived flow-rate metrics and an ECLIPSE-style
//! SCHEDULE-section file of per-timestep well controls.

pub mod config;
pub mod export;
/// Power and flow-rate derivation from the aligned source series.
pub mod process;
pub mod report;
/// SCHEDULE-section text generation.
pub mod schedule;
pub mod series;
