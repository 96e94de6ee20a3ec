//! Run configuration for the ring road simulation
//!
//! A `SimulationConfig` is immutable for the whole run. `validate` is called
//! by the stepper before any car is placed. `Default` starts every car from
//! a standstill with no perturbations; `classic` is the jam scenario where
//! cars start at full speed and one of them is briefly slowed down.

use log::warn;

use super::error::{SimError, SimResult};
use super::types::{
    CarId, CAR_LENGTH_M, DEFAULT_CAR_COUNT, DEFAULT_SEGMENT_COUNT, DEFAULT_SPEED_WISH_KMH,
    DEFAULT_TICK_COUNT,
};

/// Car slowed down by the classic jam scenario
pub const CLASSIC_SLOW_CAR: CarId = CarId(10);

/// Ticks during which the classic slow car is held back, end exclusive
pub const CLASSIC_SLOWDOWN_TICKS: (u32, u32) = (21, 40);

/// A scripted speed override for one car over a tick window
///
/// The window is half-open: the override applies for
/// `tick_start <= tick < tick_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerturbationEvent {
    pub car_id: CarId,
    pub tick_start: u32,
    pub tick_end: u32,
    pub override_speed_kmh: i32,
}

impl PerturbationEvent {
    pub fn new(car_id: CarId, tick_start: u32, tick_end: u32, override_speed_kmh: i32) -> Self {
        Self {
            car_id,
            tick_start,
            tick_end,
            override_speed_kmh,
        }
    }

    /// Whether this event overrides `car_id` at `tick`
    pub fn applies_to(&self, car_id: CarId, tick: u32) -> bool {
        self.car_id == car_id && (self.tick_start..self.tick_end).contains(&tick)
    }
}

/// Finds the override speed for a car at a tick
///
/// When several events overlap, the one defined last wins.
pub fn override_speed(events: &[PerturbationEvent], car_id: CarId, tick: u32) -> Option<i32> {
    events
        .iter()
        .rev()
        .find(|event| event.applies_to(car_id, tick))
        .map(|event| event.override_speed_kmh)
}

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Segments per lane
    pub segment_count: u32,
    /// Number of lanes; the car-following policy never looks across lanes
    pub lane_count: u32,
    pub car_count: u32,
    /// Car length in meters, also the length of one segment
    pub car_length_m: f64,
    /// Desired cruising speed in km/h
    pub speed_wish_kmh: i32,
    /// Speed every car holds before the first tick
    pub initial_speed_kmh: i32,
    pub tick_count: u32,
    pub perturbations: Vec<PerturbationEvent>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            lane_count: 1,
            car_count: DEFAULT_CAR_COUNT,
            car_length_m: CAR_LENGTH_M,
            speed_wish_kmh: DEFAULT_SPEED_WISH_KMH,
            initial_speed_kmh: 0,
            tick_count: DEFAULT_TICK_COUNT,
            perturbations: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Segments advanced per tick for each km/h of speed
    pub fn speed_to_segment_coefficient(&self) -> f64 {
        1.0 / 3600.0 * 1000.0 / self.car_length_m
    }

    /// Total number of cells on the road
    pub fn capacity(&self) -> u64 {
        u64::from(self.segment_count) * u64::from(self.lane_count)
    }

    /// Highest speed any car may hold during the run
    pub fn max_speed_kmh(&self) -> i32 {
        self.speed_wish_kmh.max(0)
    }

    /// The default ring set up as the classic jam scenario
    pub fn classic() -> Self {
        Self::default().with_classic_slowdown()
    }

    /// Start every car at the wish speed and hold `CLASSIC_SLOW_CAR` at a
    /// sixth of it over `CLASSIC_SLOWDOWN_TICKS`
    ///
    /// The slowdown goes in front of any existing perturbations so those still
    /// win where they overlap. Rings with fewer cars only get the flying start.
    pub fn with_classic_slowdown(mut self) -> Self {
        self.initial_speed_kmh = self.max_speed_kmh();
        if self.car_count >= CLASSIC_SLOW_CAR.0 {
            let (start, end) = CLASSIC_SLOWDOWN_TICKS;
            let slowdown =
                PerturbationEvent::new(CLASSIC_SLOW_CAR, start, end, self.max_speed_kmh() / 6);
            self.perturbations.insert(0, slowdown);
        }
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.lane_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "lane count must be at least 1".into(),
            ));
        }
        if self.car_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "car count must be at least 1".into(),
            ));
        }
        if self.segment_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "segment count must be at least 1".into(),
            ));
        }
        if !(self.car_length_m.is_finite() && self.car_length_m > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "car length must be a positive number of meters, got {}",
                self.car_length_m
            )));
        }
        if u64::from(self.car_count) > self.capacity() {
            return Err(SimError::InsufficientRoadCapacity {
                cars: self.car_count,
                capacity: self.capacity(),
            });
        }

        let max_speed = self.max_speed_kmh();
        if !(0..=max_speed).contains(&self.initial_speed_kmh) {
            return Err(SimError::InvalidConfiguration(format!(
                "initial speed {} km/h is outside 0..={} km/h",
                self.initial_speed_kmh, max_speed
            )));
        }

        for event in &self.perturbations {
            if event.car_id.0 == 0 || event.car_id.0 > self.car_count {
                return Err(SimError::InvalidConfiguration(format!(
                    "perturbation targets unknown {}",
                    event.car_id
                )));
            }
            if event.tick_start >= event.tick_end {
                return Err(SimError::InvalidConfiguration(format!(
                    "perturbation for {} has empty tick range {}..{}",
                    event.car_id, event.tick_start, event.tick_end
                )));
            }
            if !(0..=max_speed).contains(&event.override_speed_kmh) {
                return Err(SimError::InvalidConfiguration(format!(
                    "perturbation speed {} km/h for {} is outside 0..={} km/h",
                    event.override_speed_kmh, event.car_id, max_speed
                )));
            }
        }

        if self.lane_count > 1 {
            warn!(
                "{} lanes configured: cars only follow the car ahead in their own lane",
                self.lane_count
            );
        }

        Ok(())
    }
}
