use thiserror::Error;

use super::types::CarId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid simulation configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{cars} cars do not fit on a road with {capacity} segments")]
    InsufficientRoadCapacity { cars: u32, capacity: u64 },

    #[error("cannot place {car} at lane {lane} segment {segment}: occupied by {occupant}")]
    OccupiedCell {
        lane: u32,
        segment: u32,
        occupant: CarId,
        car: CarId,
    },

    #[error("snapshot sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot sink CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
