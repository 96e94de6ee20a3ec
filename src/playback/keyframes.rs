//! Circular layout transform for 3D playback
//!
//! The ring road is laid out as a circle in the XY plane. A car's segment
//! gives its angle, its lane widens the radius, and its lap count keeps the
//! heading continuous so interpolated rotations never spin backwards.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::simulation::{
    CarId, CarRecord, Position, SimResult, SimulationConfig, SnapshotSink, TickSnapshot,
};

/// Frames between two consecutive ticks
pub const FRAMES_PER_TICK: u32 = 6;

/// Frame holding the initial placement
pub const FIRST_FRAME: u32 = 1;

/// Ring radius for the innermost lane, in car lengths, before lane scaling
///
/// The road length is divided by `segment_count / 50`, which leaves
/// `50 * car length` regardless of the segment count.
pub const RADIUS_IN_CARS: f32 = 50.0;

/// Height of every car above the ground plane
pub const CAR_HEIGHT: f32 = 1.2;

/// Radius growth per lane, as a share of the base radius
const LANE_SPREAD: f32 = 1.0 / 19.0;

pub fn frame_for_tick(tick: u32) -> u32 {
    FIRST_FRAME + FRAMES_PER_TICK * tick
}

/// Ring radius in scene units for cars of the given length
pub fn base_radius(car_length_m: f64) -> f32 {
    RADIUS_IN_CARS * car_length_m as f32
}

/// Placement of one car at one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub frame: u32,
    pub car_id: CarId,
    pub location: Position,
    /// Euler rotation in radians
    pub rotation: Position,
}

impl Keyframe {
    pub fn from_record(record: &CarRecord, segment_count: u32, car_length_m: f64) -> Self {
        let angle = record.segment as f32 / segment_count as f32 * TAU;
        // Lanes are numbered from 1 in the scene so lane 0 already sits off the base circle.
        let radius = base_radius(car_length_m) * (1.0 + (record.lane + 1) as f32 * LANE_SPREAD);
        let heading = angle + TAU * record.wrap_count as f32 - FRAC_PI_2;

        Self {
            frame: frame_for_tick(record.tick),
            car_id: record.car_id,
            location: Position::new(radius * angle.cos(), radius * angle.sin(), CAR_HEIGHT),
            rotation: Position::new(FRAC_PI_2, 0.0, heading),
        }
    }
}

/// Turns the snapshot stream into keyframes, initial placement included
pub struct KeyframeRecorder {
    segment_count: u32,
    car_length_m: f64,
    keyframes: Vec<Keyframe>,
}

impl KeyframeRecorder {
    pub fn new(segment_count: u32, car_length_m: f64) -> Self {
        Self {
            segment_count,
            car_length_m,
            keyframes: Vec::new(),
        }
    }

    /// Recorder laid out for the road and cars of `config`
    pub fn for_config(config: &SimulationConfig) -> Self {
        Self::new(config.segment_count, config.car_length_m)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Keyframes of one car, in frame order
    pub fn track(&self, car_id: CarId) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter().filter(move |key| key.car_id == car_id)
    }

    /// Last frame that carries a keyframe
    pub fn last_frame(&self) -> Option<u32> {
        self.keyframes.last().map(|key| key.frame)
    }

    fn record(&mut self, snapshot: &TickSnapshot) {
        let (segment_count, car_length_m) = (self.segment_count, self.car_length_m);
        self.keyframes.extend(
            snapshot
                .records
                .iter()
                .map(|record| Keyframe::from_record(record, segment_count, car_length_m)),
        );
    }
}

impl SnapshotSink for KeyframeRecorder {
    fn on_start(&mut self, initial: &TickSnapshot) -> SimResult<()> {
        self.record(initial);
        Ok(())
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) -> SimResult<()> {
        self.record(snapshot);
        Ok(())
    }
}
