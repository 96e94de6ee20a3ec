use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use traffic_jam::playback::{CsvSink, KeyframeRecorder};
use traffic_jam::simulation::{
    CarId, PerturbationEvent, SimulationConfig, Stepper, CAR_LENGTH_M,
    DEFAULT_CAR_COUNT, DEFAULT_SEGMENT_COUNT, DEFAULT_SPEED_WISH_KMH, DEFAULT_TICK_COUNT,
};

/// `CAR:START:END:SPEED`, e.g. `10:21:40:21`
#[derive(Debug, Clone, Copy)]
struct PerturbArg(PerturbationEvent);

impl FromStr for PerturbArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [car, start, end, speed] = parts.as_slice() else {
            return Err(format!("expected CAR:START:END:SPEED, got '{s}'"));
        };
        let number = |field: &str, name: &str| {
            field
                .trim()
                .parse::<i64>()
                .map_err(|err| format!("bad {name} '{field}': {err}"))
        };
        let as_u32 = |value: i64, name: &str| {
            u32::try_from(value).map_err(|_| format!("{name} must be non-negative, got {value}"))
        };

        let car = as_u32(number(*car, "car id")?, "car id")?;
        let start = as_u32(number(*start, "start tick")?, "start tick")?;
        let end = as_u32(number(*end, "end tick")?, "end tick")?;
        let speed = i32::try_from(number(*speed, "speed")?).map_err(|err| err.to_string())?;

        Ok(Self(PerturbationEvent::new(CarId(car), start, end, speed)))
    }
}

#[derive(Parser)]
#[command(name = "traffic_jam")]
#[command(about = "Car-following traffic jam simulation on a ring road")]
struct Cli {
    /// Segments per lane
    #[arg(long, default_value_t = DEFAULT_SEGMENT_COUNT)]
    segments: u32,

    /// Number of lanes (cars never change lanes)
    #[arg(long, default_value_t = 1)]
    lanes: u32,

    /// Number of cars
    #[arg(long, default_value_t = DEFAULT_CAR_COUNT)]
    cars: u32,

    /// Car length in meters, also the segment length
    #[arg(long, default_value_t = CAR_LENGTH_M)]
    car_length: f64,

    /// Desired cruising speed in km/h
    #[arg(long, default_value_t = DEFAULT_SPEED_WISH_KMH, allow_negative_numbers = true)]
    speed_wish: i32,

    /// Speed every car holds before the first tick, in km/h
    #[arg(long, default_value_t = 0)]
    initial_speed: i32,

    /// Classic jam: start at the wish speed and slow car 10 to a sixth of it for ticks 21..40
    #[arg(long, conflicts_with = "initial_speed")]
    classic: bool,

    /// Number of ticks to simulate (one tick is one second)
    #[arg(long, default_value_t = DEFAULT_TICK_COUNT)]
    ticks: u32,

    /// Force a car's speed over a tick window: CAR:START:END:SPEED, END exclusive
    #[arg(long = "perturb", value_name = "CAR:START:END:SPEED")]
    perturbations: Vec<PerturbArg>,

    /// Write every snapshot record to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the ring map every N ticks (0 disables)
    #[arg(long, default_value_t = 50)]
    map_every: u32,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        let config = SimulationConfig {
            segment_count: self.segments,
            lane_count: self.lanes,
            car_count: self.cars,
            car_length_m: self.car_length,
            speed_wish_kmh: self.speed_wish,
            initial_speed_kmh: self.initial_speed,
            tick_count: self.ticks,
            perturbations: self.perturbations.iter().map(|arg| arg.0).collect(),
        };
        if self.classic {
            config.with_classic_slowdown()
        } else {
            config
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_jam=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let config = cli.config();
    info!(
        "Running traffic jam simulation: {} cars, {} segments, {} ticks",
        config.car_count, config.segment_count, config.tick_count
    );

    let mut stepper = Stepper::new(config).context("Failed to set up the simulation")?;
    let csv = match &cli.csv {
        Some(path) => Some(
            CsvSink::create(path)
                .with_context(|| format!("Failed to create CSV output {}", path.display()))?,
        ),
        None => None,
    };
    let mut sinks = (KeyframeRecorder::for_config(stepper.config()), csv);

    println!("Initial state:");
    stepper.draw_map();
    println!();

    stepper
        .run_observed(&mut sinks, |stepper, snapshot| {
            if cli.map_every > 0 && snapshot.tick % cli.map_every == 0 {
                println!("--- After tick {} ---", snapshot.tick);
                stepper.draw_map();
                println!();
            }
        })
        .context("Simulation run failed")?;

    println!("=== Final State ===");
    stepper.draw_map();

    let keyframes = &sinks.0;
    info!("=== SIMULATION COMPLETE ===");
    stepper.log_summary();
    info!(
        "Keyframes recorded: {} (last frame {})",
        keyframes.keyframes().len(),
        keyframes.last_frame().unwrap_or(0)
    );
    Ok(())
}
