//! Car-following policy
//!
//! Each car looks only at the nearest car ahead in its own lane. The policy
//! first tries to accelerate toward the desired speed, then brakes in fixed
//! steps until the clearance covers the secure distance.

use super::road::RoadModel;
use super::types::{round_even, ACCELERATION_RATE, BRAKING_FACTOR, BRAKING_RATE, REACTION_FACTOR};

/// Segments from `segment` to the nearest occupied cell ahead in `lane`
///
/// A car on the adjacent segment ahead gives `1`. Returns `None` when the
/// lane holds no other car, which leaves the road ahead open.
pub fn space_ahead(road: &RoadModel, lane: u32, segment: u32) -> Option<u32> {
    let segment_count = road.segment_count();
    (1..=segment_count).find(|step| {
        let ahead = (u64::from(segment) + u64::from(*step)) % u64::from(segment_count);
        road.occupant_at(lane, ahead as u32).is_some()
    })
}

/// Reaction plus braking distance for a speed, in meters
///
/// The speed in km/h is used numerically as is.
pub fn secure_distance_m(speed: i32) -> f64 {
    (f64::from(speed) * REACTION_FACTOR) * BRAKING_FACTOR
}

/// Speed a car should hold this tick
///
/// `space_ahead` is in segments; `None` skips braking entirely.
pub fn compute_new_speed(
    current_speed: i32,
    space_ahead: Option<u32>,
    speed_wish: i32,
    segment_length_m: f64,
) -> i32 {
    let mut speed = current_speed;

    if speed < speed_wish {
        if speed == 0 {
            speed = speed_wish / 10;
        } else {
            speed += round_even(f64::from(speed) * ACCELERATION_RATE) as i32;
        }
        speed = speed.min(speed_wish);
    }

    let Some(space_ahead) = space_ahead else {
        return speed;
    };

    let space_m = f64::from(space_ahead) * segment_length_m;
    let mut secure = secure_distance_m(speed);
    // The step is fixed from the pre-braking speed. At least 1 km/h, or a
    // slow car on a very short road would never get out of the loop.
    let quantum = round_even(f64::from(speed) * BRAKING_RATE).max(1) as i32;
    while space_m < secure {
        speed -= quantum;
        secure = secure_distance_m(speed);
        if speed < 0 {
            speed = 0;
            break;
        }
    }

    speed
}
