//! Occupancy grid for the circular road
//!
//! Lanes are 0-based in `[0, lane_count)`. Segments are 0-based in
//! `[0, segment_count)` and every segment argument is reduced modulo the
//! segment count, so segment `segment_count - 1` is followed by segment `0`.

use super::error::{SimError, SimResult};
use super::types::CarId;

/// Maps each `(lane, segment)` cell to the car occupying it, if any
#[derive(Debug, Clone)]
pub struct RoadModel {
    lane_count: u32,
    segment_count: u32,
    cells: Vec<Option<CarId>>,
}

impl RoadModel {
    pub fn new(lane_count: u32, segment_count: u32) -> Self {
        let len = lane_count as usize * segment_count as usize;
        Self {
            lane_count,
            segment_count,
            cells: vec![None; len],
        }
    }

    pub fn lane_count(&self) -> u32 {
        self.lane_count
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }

    fn index(&self, lane: u32, segment: u32) -> usize {
        assert!(
            lane < self.lane_count,
            "lane {lane} out of range for a {}-lane road",
            self.lane_count
        );
        lane as usize * self.segment_count as usize + (segment % self.segment_count) as usize
    }

    /// Places `car` on a cell
    ///
    /// Fails if the cell already holds a different car. Placing a car on the
    /// cell it already holds succeeds.
    pub fn occupy(&mut self, lane: u32, segment: u32, car: CarId) -> SimResult<()> {
        let index = self.index(lane, segment);
        match self.cells[index] {
            Some(occupant) if occupant != car => Err(SimError::OccupiedCell {
                lane,
                segment: segment % self.segment_count,
                occupant,
                car,
            }),
            _ => {
                self.cells[index] = Some(car);
                Ok(())
            }
        }
    }

    pub fn vacate(&mut self, lane: u32, segment: u32) {
        let index = self.index(lane, segment);
        self.cells[index] = None;
    }

    pub fn occupant_at(&self, lane: u32, segment: u32) -> Option<CarId> {
        self.cells[self.index(lane, segment)]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// All cells of one lane, segment 0 first
    pub fn lane_cells(&self, lane: u32) -> &[Option<CarId>] {
        let start = self.index(lane, 0);
        &self.cells[start..start + self.segment_count as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_and_vacate_round_the_ring() {
        let mut road = RoadModel::new(1, 10);
        road.occupy(0, 3, CarId(1)).unwrap();
        assert_eq!(road.occupant_at(0, 3), Some(CarId(1)));
        assert_eq!(road.occupant_at(0, 13), Some(CarId(1)));
        assert_eq!(road.occupied_count(), 1);

        road.vacate(0, 23);
        assert_eq!(road.occupant_at(0, 3), None);
        assert_eq!(road.occupied_count(), 0);
    }

    #[test]
    fn occupy_rejects_a_different_car() {
        let mut road = RoadModel::new(2, 5);
        road.occupy(1, 4, CarId(7)).unwrap();

        let err = road.occupy(1, 9, CarId(8)).unwrap_err();
        match err {
            SimError::OccupiedCell {
                lane,
                segment,
                occupant,
                car,
            } => {
                assert_eq!((lane, segment), (1, 4));
                assert_eq!(occupant, CarId(7));
                assert_eq!(car, CarId(8));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Same car on its own cell is fine
        road.occupy(1, 4, CarId(7)).unwrap();
        assert_eq!(road.occupied_count(), 1);
    }

    #[test]
    fn lanes_are_independent() {
        let mut road = RoadModel::new(2, 4);
        road.occupy(0, 1, CarId(1)).unwrap();
        road.occupy(1, 1, CarId(2)).unwrap();
        assert_eq!(road.lane_cells(0), &[None, Some(CarId(1)), None, None]);
        assert_eq!(road.lane_cells(1), &[None, Some(CarId(2)), None, None]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn lane_out_of_range_panics() {
        let road = RoadModel::new(1, 4);
        road.occupant_at(1, 0);
    }
}
