//! Per-car state for the traffic simulation
//!
//! Standalone implementation that doesn't depend on any renderer.

use super::types::CarId;

/// A car on the ring road
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarState {
    pub id: CarId,
    pub lane: u32,
    /// Segment index in `[0, segment_count)`
    pub segment: u32,
    /// Speed in km/h
    pub speed: i32,
    /// Laps completed, i.e. times the car crossed from the last segment to the first
    pub wrap_count: u32,
}

impl CarState {
    pub fn new(id: CarId, lane: u32, segment: u32, speed: i32) -> Self {
        Self {
            id,
            lane,
            segment,
            speed,
            wrap_count: 0,
        }
    }

    /// Move forward `distance` segments on a ring of `segment_count` segments
    ///
    /// Each crossing of the origin counts as one wrap.
    pub fn advance(&mut self, distance: u32, segment_count: u32) {
        let target = u64::from(self.segment) + u64::from(distance);
        let segment_count = u64::from(segment_count);
        self.wrap_count += (target / segment_count) as u32;
        self.segment = (target % segment_count) as u32;
    }
}
