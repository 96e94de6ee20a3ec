//! Standalone traffic simulation module
//!
//! This module contains the car-following core: the ring road, the cars, the
//! policy and the tick loop. It never computes scene coordinates; rendering
//! lives behind a `SnapshotSink`.

mod car;
mod config;
mod error;
mod policy;
mod road;
mod sink;
mod stepper;
mod types;

pub use car::CarState;
pub use config::{
    override_speed, PerturbationEvent, SimulationConfig, CLASSIC_SLOWDOWN_TICKS, CLASSIC_SLOW_CAR,
};
pub use error::{SimError, SimResult};
pub use policy::{compute_new_speed, secure_distance_m, space_ahead};
pub use road::RoadModel;
pub use sink::{CarRecord, NoopSink, RunSummary, SnapshotSink, TickSnapshot};
pub use stepper::{fair_dispatch, Stepper, StepperState};
pub use types::{
    round_even, CarId, Position, ACCELERATION_RATE, BRAKING_FACTOR, BRAKING_RATE, CAR_LENGTH_M,
    DEFAULT_CAR_COUNT, DEFAULT_SEGMENT_COUNT, DEFAULT_SPEED_WISH_KMH, DEFAULT_TICK_COUNT,
    REACTION_FACTOR,
};
