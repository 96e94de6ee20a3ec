//! Traffic Jam Simulation Library
//!
//! A car-following simulation on a circular road that emits per-tick
//! snapshots for playback by a host tool.

pub mod playback;
pub mod simulation;
