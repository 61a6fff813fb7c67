/*
 * Copyright (C) 2022 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use super::Position;
use crate::motion::{self, InterpError, Interpolation, TimePoint, Timed};

#[derive(Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub time: TimePoint,
    pub position: Position,
}

impl Timed for Waypoint {
    fn time(&self) -> &TimePoint {
        &self.time
    }
}

impl Waypoint {
    pub fn new(time: TimePoint, x: f64, y: f64) -> Self {
        Waypoint {
            time,
            position: Position::new(x, y),
        }
    }

    pub fn new_f64(time: f64, x: f64, y: f64) -> Self {
        Waypoint {
            time: TimePoint::from_secs_f64(time),
            position: Position::new(x, y),
        }
    }
}

impl std::fmt::Debug for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waypoint")
            .field("time", &self.time.as_secs_f64())
            .field("position", &self.position)
            .finish()
    }
}

impl motion::Waypoint for Waypoint {
    type Position = Position;

    fn position(&self) -> Position {
        self.position
    }
}

/// Linear motion between two waypoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    initial_wp: Waypoint,
    final_wp: Waypoint,
}

impl Motion {
    pub fn in_time_range(&self, time: &TimePoint) -> Result<(), InterpError> {
        if time.nanos_since_zero < self.initial_wp.time.nanos_since_zero {
            return Err(InterpError::OutOfBounds {
                range: [self.initial_wp.time, self.final_wp.time],
                request: *time,
            });
        }

        if self.final_wp.time.nanos_since_zero < time.nanos_since_zero {
            return Err(InterpError::OutOfBounds {
                range: [self.initial_wp.time, self.final_wp.time],
                request: *time,
            });
        }

        Ok(())
    }
}

/// Interpolate one spatial axis. A coordinate that is identical at both
/// endpoints passes through untouched, which keeps constant segments exact
/// and never divides by the segment duration.
fn lerp_axis(t: f64, t0: f64, t1: f64, x0: f64, x1: f64) -> f64 {
    if x1 == x0 {
        x1
    } else {
        x0 + (t - t0) / (t1 - t0) * (x1 - x0)
    }
}

impl motion::Motion<Position> for Motion {
    fn compute_position(&self, time: &TimePoint) -> Result<Position, InterpError> {
        self.in_time_range(time)?;
        let t = time.as_secs_f64();
        let t0 = self.initial_wp.time.as_secs_f64();
        let t1 = self.final_wp.time.as_secs_f64();
        let p0 = &self.initial_wp.position;
        let p1 = &self.final_wp.position;
        Ok(Position::new(
            lerp_axis(t, t0, t1, p0.x, p1.x),
            lerp_axis(t, t0, t1, p0.y, p1.y),
        ))
    }
}

impl Interpolation<Position> for Waypoint {
    type Motion = Motion;

    fn interpolate(&self, up_to: &Self) -> Self::Motion {
        Motion {
            initial_wp: *self,
            final_wp: *up_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Duration, Motion};
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolation() {
        let t0 = TimePoint::new(0);
        let t1 = t0 + Duration::from_secs_f64(2.0);
        let wp0 = Waypoint::new(t0, 1.0, 5.0);
        let wp1 = Waypoint::new(t1, 1.0, 10.0);

        let motion = wp0.interpolate(&wp1);
        let t = t0 + Duration::from_secs_f64(1.0);
        let p = motion.compute_position(&t).ok().unwrap();
        assert_relative_eq!(p.x, 1_f64, max_relative = 0.001);
        assert_relative_eq!(p.y, 7.5_f64, max_relative = 0.001);
    }

    #[test]
    fn test_constant_axis_is_exact() {
        // x never moves, so any interpolated x must equal it exactly, at any
        // position within the segment.
        let wp0 = Waypoint::new_f64(0.0, 0.3, 0.0);
        let wp1 = Waypoint::new_f64(0.9, 0.3, 1.0);
        let motion = wp0.interpolate(&wp1);

        for k in 0..10 {
            let t = TimePoint::from_secs_f64(0.09 * k as f64);
            let p = motion.compute_position(&t).ok().unwrap();
            assert_eq!(p.x, 0.3);
        }
    }

    #[test]
    fn test_endpoints() {
        let wp0 = Waypoint::new_f64(1.0, -2.0, 4.0);
        let wp1 = Waypoint::new_f64(3.0, 6.0, -4.0);
        let motion = wp0.interpolate(&wp1);

        let p = motion.compute_position(&wp0.time).ok().unwrap();
        assert_relative_eq!(p.x, -2.0);
        assert_relative_eq!(p.y, 4.0);

        let p = motion.compute_position(&wp1.time).ok().unwrap();
        assert_relative_eq!(p.x, 6.0);
        assert_relative_eq!(p.y, -4.0);

        let err = motion.compute_position(&TimePoint::from_secs_f64(0.5));
        assert_eq!(
            err,
            Err(InterpError::OutOfBounds {
                range: [wp0.time, wp1.time],
                request: TimePoint::from_secs_f64(0.5),
            })
        );
    }
}
