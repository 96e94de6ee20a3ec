//! Host-side consumers of the simulation output
//!
//! Nothing in here feeds back into the simulation: these sinks only read the
//! snapshot stream produced by the stepper.

mod csv_sink;
mod keyframes;

pub use csv_sink::CsvSink;
pub use keyframes::{
    base_radius, frame_for_tick, Keyframe, KeyframeRecorder, CAR_HEIGHT, FIRST_FRAME,
    FRAMES_PER_TICK, RADIUS_IN_CARS,
};
