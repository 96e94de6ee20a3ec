//! Snapshot records and the sink trait that receives them
//!
//! The stepper never renders anything itself. It hands one `TickSnapshot` per
//! tick to a `SnapshotSink`, and whatever sits behind the sink (a CSV file, a
//! keyframe recorder, a test collector) decides what to do with it.

use super::car::CarState;
use super::error::SimResult;
use super::types::CarId;

/// One car's state at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarRecord {
    pub tick: u32,
    pub car_id: CarId,
    pub lane: u32,
    pub segment: u32,
    pub speed_kmh: i32,
    pub wrap_count: u32,
}

impl CarRecord {
    pub fn from_car(tick: u32, car: &CarState) -> Self {
        Self {
            tick,
            car_id: car.id,
            lane: car.lane,
            segment: car.segment,
            speed_kmh: car.speed,
            wrap_count: car.wrap_count,
        }
    }
}

/// All car records of one tick, in ascending car id order
///
/// Tick `0` is the initial placement before any movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSnapshot {
    pub tick: u32,
    pub records: Vec<CarRecord>,
}

impl TickSnapshot {
    pub fn record(&self, car_id: CarId) -> Option<&CarRecord> {
        self.records.iter().find(|record| record.car_id == car_id)
    }
}

/// Aggregate figures for the current state of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks_completed: u32,
    pub car_count: usize,
    pub mean_speed_kmh: f64,
    pub min_speed_kmh: i32,
    pub max_speed_kmh: i32,
    pub stopped_cars: usize,
    pub total_wraps: u64,
}

/// Receives the output stream of a run
///
/// Start and finish callbacks default to no-ops so implementors only need to
/// handle the per-tick snapshots.
pub trait SnapshotSink {
    /// Called once with the initial placement (tick 0) before the first tick.
    fn on_start(&mut self, _initial: &TickSnapshot) -> SimResult<()> {
        Ok(())
    }

    /// Called after every tick with the records of all cars.
    fn on_tick(&mut self, snapshot: &TickSnapshot) -> SimResult<()>;

    /// Called once after the final tick.
    fn on_finish(&mut self, _summary: &RunSummary) -> SimResult<()> {
        Ok(())
    }
}

/// A sink that drops everything
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn on_tick(&mut self, _snapshot: &TickSnapshot) -> SimResult<()> {
        Ok(())
    }
}

/// Collects every tick snapshot; the initial placement is not included.
impl SnapshotSink for Vec<TickSnapshot> {
    fn on_tick(&mut self, snapshot: &TickSnapshot) -> SimResult<()> {
        self.push(snapshot.clone());
        Ok(())
    }
}

/// An optional sink; `None` drops everything.
impl<S: SnapshotSink> SnapshotSink for Option<S> {
    fn on_start(&mut self, initial: &TickSnapshot) -> SimResult<()> {
        match self {
            Some(sink) => sink.on_start(initial),
            None => Ok(()),
        }
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) -> SimResult<()> {
        match self {
            Some(sink) => sink.on_tick(snapshot),
            None => Ok(()),
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) -> SimResult<()> {
        match self {
            Some(sink) => sink.on_finish(summary),
            None => Ok(()),
        }
    }
}

/// Fans the stream out to two sinks, the first one always served first.
impl<A: SnapshotSink, B: SnapshotSink> SnapshotSink for (A, B) {
    fn on_start(&mut self, initial: &TickSnapshot) -> SimResult<()> {
        self.0.on_start(initial)?;
        self.1.on_start(initial)
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) -> SimResult<()> {
        self.0.on_tick(snapshot)?;
        self.1.on_tick(snapshot)
    }

    fn on_finish(&mut self, summary: &RunSummary) -> SimResult<()> {
        self.0.on_finish(summary)?;
        self.1.on_finish(summary)
    }
}
