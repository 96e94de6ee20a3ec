//! Core types for the traffic simulation
//!
//! These are standalone types that don't depend on any renderer.

use std::fmt;

/// A wrapper type for car IDs
///
/// Car ids are 1-based and dense: a run with `n` cars uses ids `1..=n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub u32);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "car#{}", self.0)
    }
}

/// A 3D position in the playback scene
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Length of a car in meters, also the length of one road segment
pub const CAR_LENGTH_M: f64 = 5.0;

/// Number of segments in one lane of the default ring road
pub const DEFAULT_SEGMENT_COUNT: u32 = 500;

/// Number of cars on the default ring road
pub const DEFAULT_CAR_COUNT: u32 = 32;

/// Desired cruising speed in km/h
pub const DEFAULT_SPEED_WISH_KMH: i32 = 130;

/// Number of ticks in a default run (one tick is one simulated second)
pub const DEFAULT_TICK_COUNT: u32 = 399;

/// Share of the current speed gained per tick while accelerating
pub const ACCELERATION_RATE: f64 = 0.10;

/// Share of the pre-braking speed shed per braking iteration
pub const BRAKING_RATE: f64 = 0.10;

/// Reaction factor of the secure distance formula
pub const REACTION_FACTOR: f64 = 0.55;

/// Braking factor of the secure distance formula
pub const BRAKING_FACTOR: f64 = 1.35;

/// Rounds half to even, the rounding rule the model's constants were tuned with.
pub fn round_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
