//! Tick loop that ties the road, the cars and the policy together
//!
//! This is the entry point for running the traffic simulation without any
//! renderer. Cars are updated strictly in ascending id order and each car
//! sees the road as already updated by the cars before it in the same tick.

use log::{debug, info, warn};

use super::car::CarState;
use super::config::{override_speed, SimulationConfig};
use super::error::{SimError, SimResult};
use super::policy::{compute_new_speed, space_ahead};
use super::road::RoadModel;
use super::sink::{CarRecord, RunSummary, SnapshotSink, TickSnapshot};
use super::types::{round_even, CarId};

/// Widest ASCII map row printed by `draw_map`
const MAP_WIDTH: u32 = 100;

/// Where the stepper is in its fixed tick budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperState {
    /// `tick` is the next tick to run, starting at 1
    Running { tick: u32 },
    Finished,
}

/// Spread cars evenly over the lanes, then evenly along each lane
///
/// Lanes get `car_count / lane_count` cars each, the first
/// `car_count % lane_count` lanes one more. Ids are handed out lane by lane.
pub fn fair_dispatch(config: &SimulationConfig) -> Vec<CarState> {
    let base = config.car_count / config.lane_count;
    let extra = config.car_count % config.lane_count;
    let segment_count = u64::from(config.segment_count);

    let mut cars = Vec::with_capacity(config.car_count as usize);
    let mut next_id = 1;
    for lane in 0..config.lane_count {
        let cars_in_lane = base + u32::from(lane < extra);
        for slot in 0..cars_in_lane {
            let segment = u64::from(slot) * segment_count / u64::from(cars_in_lane);
            cars.push(CarState::new(
                CarId(next_id),
                lane,
                segment as u32,
                config.initial_speed_kmh,
            ));
            next_id += 1;
        }
    }
    cars
}

/// Owns the road and the cars for one run
pub struct Stepper {
    config: SimulationConfig,
    road: RoadModel,
    /// Indexed by `id - 1`
    cars: Vec<CarState>,
    state: StepperState,
    ticks_completed: u32,
    speed_to_segments: f64,
}

impl Stepper {
    /// Validate `config` and place its cars with fair dispatch
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let cars = fair_dispatch(&config);
        Self::install(config, cars)
    }

    /// Validate `config` and start from an explicit set of cars
    ///
    /// `cars` must hold ids `1..=car_count` in order, each on its own cell.
    pub fn with_cars(config: SimulationConfig, cars: Vec<CarState>) -> SimResult<Self> {
        config.validate()?;
        if cars.len() != config.car_count as usize {
            return Err(SimError::InvalidConfiguration(format!(
                "{} cars supplied for a car count of {}",
                cars.len(),
                config.car_count
            )));
        }
        let max_speed = config.max_speed_kmh();
        for (index, car) in cars.iter().enumerate() {
            if car.id.0 as usize != index + 1 {
                return Err(SimError::InvalidConfiguration(format!(
                    "car at position {} has id {}, expected ids 1..={} in order",
                    index, car.id.0, config.car_count
                )));
            }
            if car.lane >= config.lane_count || car.segment >= config.segment_count {
                return Err(SimError::InvalidConfiguration(format!(
                    "{} is off the road at lane {} segment {}",
                    car.id, car.lane, car.segment
                )));
            }
            if !(0..=max_speed).contains(&car.speed) {
                return Err(SimError::InvalidConfiguration(format!(
                    "{} starts at {} km/h, outside 0..={} km/h",
                    car.id, car.speed, max_speed
                )));
            }
        }
        Self::install(config, cars)
    }

    fn install(config: SimulationConfig, cars: Vec<CarState>) -> SimResult<Self> {
        let mut road = RoadModel::new(config.lane_count, config.segment_count);
        for car in &cars {
            road.occupy(car.lane, car.segment, car.id)?;
        }

        let state = if config.tick_count == 0 {
            StepperState::Finished
        } else {
            StepperState::Running { tick: 1 }
        };
        let speed_to_segments = config.speed_to_segment_coefficient();

        info!(
            "Placed {} cars on {} lane(s) of {} segments",
            cars.len(),
            config.lane_count,
            config.segment_count
        );

        Ok(Self {
            config,
            road,
            cars,
            state,
            ticks_completed: 0,
            speed_to_segments,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn road(&self) -> &RoadModel {
        &self.road
    }

    pub fn cars(&self) -> &[CarState] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&CarState> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.cars.get(index)
    }

    pub fn state(&self) -> StepperState {
        self.state
    }

    pub fn ticks_completed(&self) -> u32 {
        self.ticks_completed
    }

    pub fn is_finished(&self) -> bool {
        self.state == StepperState::Finished
    }

    /// Records of all cars as they stand now
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            tick: self.ticks_completed,
            records: self
                .cars
                .iter()
                .map(|car| CarRecord::from_car(self.ticks_completed, car))
                .collect(),
        }
    }

    /// Run one tick
    ///
    /// Returns `Ok(None)` once the tick budget is spent; the road and cars are
    /// no longer touched after that. A car forced onto an occupied cell stays
    /// on its previous cell, the error is returned and the stepper finishes.
    pub fn step(&mut self) -> SimResult<Option<TickSnapshot>> {
        let tick = match self.state {
            StepperState::Finished => return Ok(None),
            StepperState::Running { tick } => tick,
        };

        let segment_count = self.config.segment_count;
        let mut records = Vec::with_capacity(self.cars.len());

        for car in self.cars.iter_mut() {
            self.road.vacate(car.lane, car.segment);

            let space = space_ahead(&self.road, car.lane, car.segment);
            let mut speed = compute_new_speed(
                car.speed,
                space,
                self.config.speed_wish_kmh,
                self.config.car_length_m,
            );
            if let Some(forced) = override_speed(&self.config.perturbations, car.id, tick) {
                speed = forced;
            }

            let mut moved = car.clone();
            moved.speed = speed;
            let distance = round_even(f64::from(speed) * self.speed_to_segments).max(0) as u32;
            moved.advance(distance, segment_count);

            if let Err(err) = self.road.occupy(moved.lane, moved.segment, moved.id) {
                // Leave the car where it was so the road and cars still agree,
                // and stop the run: the tick cannot be completed.
                self.road.occupy(car.lane, car.segment, car.id)?;
                self.state = StepperState::Finished;
                warn!("tick {tick} aborted: {err}");
                return Err(err);
            }
            *car = moved;

            records.push(CarRecord::from_car(tick, car));
        }

        self.ticks_completed = tick;
        self.state = if tick >= self.config.tick_count {
            StepperState::Finished
        } else {
            StepperState::Running { tick: tick + 1 }
        };

        if log::log_enabled!(log::Level::Debug) {
            let summary = self.summary();
            debug!(
                "tick {}: mean speed {:.1} km/h, {} stopped, {} laps",
                tick, summary.mean_speed_kmh, summary.stopped_cars, summary.total_wraps
            );
        }

        Ok(Some(TickSnapshot { tick, records }))
    }

    /// Run the remaining ticks, streaming every snapshot into `sink`
    pub fn run<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> SimResult<RunSummary> {
        self.run_observed(sink, |_, _| {})
    }

    /// Like `run`, calling `after_tick` with the stepper and the snapshot once
    /// the sink has seen each tick
    pub fn run_observed<S, F>(&mut self, sink: &mut S, mut after_tick: F) -> SimResult<RunSummary>
    where
        S: SnapshotSink + ?Sized,
        F: FnMut(&Stepper, &TickSnapshot),
    {
        sink.on_start(&self.snapshot())?;
        while let Some(snapshot) = self.step()? {
            sink.on_tick(&snapshot)?;
            after_tick(self, &snapshot);
        }
        let summary = self.summary();
        sink.on_finish(&summary)?;
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        let speeds = self.cars.iter().map(|car| car.speed);
        let total_speed: i64 = speeds.clone().map(i64::from).sum();
        RunSummary {
            ticks_completed: self.ticks_completed,
            car_count: self.cars.len(),
            mean_speed_kmh: total_speed as f64 / self.cars.len().max(1) as f64,
            min_speed_kmh: speeds.clone().min().unwrap_or(0),
            max_speed_kmh: speeds.max().unwrap_or(0),
            stopped_cars: self.cars.iter().filter(|car| car.speed == 0).count(),
            total_wraps: self.cars.iter().map(|car| u64::from(car.wrap_count)).sum(),
        }
    }

    /// Log a summary of the current state
    pub fn log_summary(&self) {
        let summary = self.summary();
        info!("Ticks completed: {}", summary.ticks_completed);
        info!("Cars: {}", summary.car_count);
        info!("Mean speed: {:.1} km/h", summary.mean_speed_kmh);
        info!(
            "Speed range: {}..={} km/h",
            summary.min_speed_kmh, summary.max_speed_kmh
        );
        info!("Stopped cars: {}", summary.stopped_cars);
        info!("Total laps: {}", summary.total_wraps);
    }

    /// ASCII view of the ring, one row per lane
    ///
    /// Long lanes are squeezed into at most `MAP_WIDTH` columns. A column shows
    /// `x` if it holds a stopped car, `o` if it holds moving cars only, `.`
    /// otherwise.
    pub fn render_map(&self) -> String {
        let segment_count = self.road.segment_count();
        let per_column = segment_count.div_ceil(MAP_WIDTH).max(1);

        let mut map = String::new();
        for lane in 0..self.road.lane_count() {
            map.push_str(&format!("lane {lane:>2} |"));
            for column in self.road.lane_cells(lane).chunks(per_column as usize) {
                let mut glyph = '.';
                for occupant in column.iter().flatten() {
                    let stopped = self.car(*occupant).is_some_and(|car| car.speed == 0);
                    if stopped {
                        glyph = 'x';
                        break;
                    }
                    glyph = 'o';
                }
                map.push(glyph);
            }
            map.push_str("|\n");
        }
        map
    }

    /// Print the ASCII ring map to stdout
    pub fn draw_map(&self) {
        print!("{}", self.render_map());
    }
}
