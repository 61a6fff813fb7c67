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

use super::{Duration, InterpError, Motion, TimePoint, Timed, Waypoint};
use cached::{Cached, UnboundCache};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTrajectoryError {
    /// A trajectory needs at least two waypoints before any segment can be
    /// interpolated.
    #[error("a trajectory needs at least 2 waypoints, but only {0} were provided")]
    TooFewWaypoints(usize),

    /// The waypoint at this index has an earlier time than the waypoint
    /// before it.
    #[error("waypoint times must be non-decreasing, but the waypoint at index {0} goes backwards in time")]
    OutOfOrder(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Find {
    /// The requested time is exactly on the waypoint at this index. When
    /// several waypoints share that time, this is the last of them.
    Exact(usize),

    /// The requested time is approaching the waypoint at this index. The
    /// waypoint right before this index is the lower bracket of the segment.
    Approaching(usize),

    /// The requested time is before the start of the trajectory
    BeforeStart,

    /// The requested time is after the trajectory is finished
    AfterFinish,
}

/// An ordered sequence of waypoints with non-decreasing times. Waypoints are
/// allowed to share a time value; a pair of equal-time waypoints represents an
/// instantaneous jump, and [`Trajectory::find`] will never select such a pair
/// as an interpolation bracket.
#[derive(Clone, PartialEq)]
pub struct Trajectory<W: Waypoint> {
    waypoints: Vec<W>,
}

impl<'a, W: Waypoint> Trajectory<W> {
    /// Create a new trajectory from its two endpoints.
    pub fn new(start: W, finish: W) -> Result<Self, InvalidTrajectoryError> {
        Self::from_iter([start, finish])
    }

    /// Drains elements out of the given iterator type and constructs a
    /// Trajectory with them. The input must provide at least 2 waypoints
    /// whose times never decrease.
    pub fn from_iter<I: std::iter::IntoIterator<Item = W>>(
        iter: I,
    ) -> Result<Self, InvalidTrajectoryError> {
        let waypoints: Vec<W> = iter.into_iter().collect();
        if waypoints.len() < 2 {
            return Err(InvalidTrajectoryError::TooFewWaypoints(waypoints.len()));
        }

        for (i, pair) in waypoints.windows(2).enumerate() {
            if pair[1].time().nanos_since_zero < pair[0].time().nanos_since_zero {
                return Err(InvalidTrajectoryError::OutOfOrder(i + 1));
            }
        }

        Ok(Self { waypoints })
    }

    /// Find the waypoint or segment of the trajectory that matches this point
    /// in time. Times are non-decreasing, so this is a binary upper-bound
    /// search: for `Find::Approaching(i)`, index `i` is the first waypoint
    /// whose time strictly exceeds the request, which makes `i-1` the lower
    /// bracket and guarantees the bracket spans a nonzero duration.
    pub fn find(&self, time: &TimePoint) -> Find {
        let index = self
            .waypoints
            .partition_point(|wp| wp.time().nanos_since_zero <= time.nanos_since_zero);

        if index == 0 {
            return Find::BeforeStart;
        }

        if self.waypoints[index - 1].time().nanos_since_zero == time.nanos_since_zero {
            return Find::Exact(index - 1);
        }

        if index == self.waypoints.len() {
            return Find::AfterFinish;
        }

        Find::Approaching(index)
    }

    /// Get the waypoint at the requested index if it is available, otherwise
    /// get None.
    pub fn get(&self, index: usize) -> Option<&W> {
        self.waypoints.get(index)
    }

    /// Get the time duration of the trajectory.
    pub fn duration(&self) -> Duration {
        self.finish_time() - self.initial_time()
    }

    /// Trajectories always have at least two values, so we can always get the
    /// first waypoint.
    pub fn initial(&self) -> &W {
        self.waypoints.first().unwrap()
    }

    pub fn finish(&self) -> &W {
        self.waypoints.last().unwrap()
    }

    /// Get the time that the trajectory starts.
    pub fn initial_time(&self) -> TimePoint {
        *self.initial().time()
    }

    /// Get the time that the trajectory finishes.
    pub fn finish_time(&self) -> TimePoint {
        *self.finish().time()
    }

    /// Get the number of Waypoint elements in the trajectory.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Get a motion for this trajectory
    pub fn motion(&'a self) -> TrajectoryMotion<'a, W> {
        TrajectoryMotion {
            trajectory: self,
            motion_cache: RefCell::new(UnboundCache::new()),
        }
    }

    /// Iterate through this trajectory.
    pub fn iter(&self) -> std::slice::Iter<'_, W> {
        self.waypoints.iter()
    }
}

impl<W: Waypoint> std::fmt::Debug for Trajectory<W> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut builder = fmt.debug_list();
        for wp in self.waypoints.iter() {
            builder.entry(wp);
        }

        builder.finish()
    }
}

impl<W: Waypoint> std::ops::Deref for Trajectory<W> {
    type Target = [W];

    fn deref(&self) -> &Self::Target {
        &self.waypoints
    }
}

/// Lazily interpolates the segments of a trajectory as they are requested.
/// Segments are cached by index, so walking a monotone sequence of time
/// points reuses each segment's interpolation instead of rebuilding it.
pub struct TrajectoryMotion<'a, W: Waypoint> {
    trajectory: &'a Trajectory<W>,
    motion_cache: RefCell<UnboundCache<usize, Rc<W::Motion>>>,
}

impl<'a, W: Waypoint> TrajectoryMotion<'a, W> {
    fn get_motion_segment(&self, index: usize) -> Rc<W::Motion> {
        self.motion_cache
            .borrow_mut()
            .cache_get_or_set_with(index, || {
                // Only reachable with 0 < index < len, per Trajectory::find
                let wp0 = &self.trajectory.waypoints[index - 1];
                let wp1 = &self.trajectory.waypoints[index];
                Rc::new(wp0.interpolate(wp1))
            })
            .clone()
    }

    fn out_of_bounds(&self, time: &TimePoint) -> InterpError {
        InterpError::OutOfBounds {
            range: [
                self.trajectory.initial_time(),
                self.trajectory.finish_time(),
            ],
            request: *time,
        }
    }
}

impl<'a, W: Waypoint> Motion<W::Position> for TrajectoryMotion<'a, W> {
    fn compute_position(&self, time: &TimePoint) -> Result<W::Position, InterpError> {
        match self.trajectory.find(time) {
            Find::Exact(index) => {
                // Answer with the waypoint itself. This keeps equal-time
                // waypoint pairs out of segment interpolation.
                Ok(self.trajectory.waypoints[index].position())
            }
            Find::Approaching(index) => {
                self.get_motion_segment(index).compute_position(time)
            }
            Find::BeforeStart | Find::AfterFinish => Err(self.out_of_bounds(time)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::r2::{LinearTrajectory, Waypoint};
    use approx::assert_relative_eq;

    fn wp(time: f64, x: f64, y: f64) -> Waypoint {
        Waypoint::new_f64(time, x, y)
    }

    #[test]
    fn test_construction_validation() {
        assert_eq!(
            LinearTrajectory::from_iter([wp(0.0, 0.0, 0.0)]).err(),
            Some(InvalidTrajectoryError::TooFewWaypoints(1)),
        );

        assert_eq!(
            LinearTrajectory::from_iter([
                wp(0.0, 0.0, 0.0),
                wp(1.0, 1.0, 0.0),
                wp(0.5, 2.0, 0.0),
            ])
            .err(),
            Some(InvalidTrajectoryError::OutOfOrder(2)),
        );

        // Repeated times are allowed
        let trajectory = LinearTrajectory::from_iter([
            wp(0.0, 0.0, 0.0),
            wp(1.0, 1.0, 0.0),
            wp(1.0, 5.0, 5.0),
            wp(2.0, 5.0, 7.0),
        ])
        .expect("Trajectory failed to be created");
        assert_eq!(trajectory.len(), 4);
        assert_relative_eq!(trajectory.duration().as_secs_f64(), 2.0);
    }

    #[test]
    fn test_find() {
        let trajectory = LinearTrajectory::from_iter([
            wp(0.0, 0.0, 0.0),
            wp(1.0, 1.0, 0.0),
            wp(1.0, 5.0, 5.0),
            wp(2.0, 5.0, 7.0),
        ])
        .expect("Trajectory failed to be created");

        assert_eq!(
            trajectory.find(&TimePoint::from_secs_f64(-0.5)),
            Find::BeforeStart
        );
        assert_eq!(trajectory.find(&TimePoint::new(0)), Find::Exact(0));
        assert_eq!(
            trajectory.find(&TimePoint::from_secs_f64(0.5)),
            Find::Approaching(1)
        );
        // The last of the waypoints tied at t=1
        assert_eq!(
            trajectory.find(&TimePoint::from_secs_f64(1.0)),
            Find::Exact(2)
        );
        assert_eq!(
            trajectory.find(&TimePoint::from_secs_f64(1.5)),
            Find::Approaching(3)
        );
        assert_eq!(
            trajectory.find(&TimePoint::from_secs_f64(2.0)),
            Find::Exact(3)
        );
        assert_eq!(
            trajectory.find(&TimePoint::from_secs_f64(2.5)),
            Find::AfterFinish
        );
    }

    #[test]
    fn test_motion_across_tied_waypoints() {
        let trajectory = LinearTrajectory::from_iter([
            wp(0.0, 0.0, 0.0),
            wp(1.0, 1.0, 0.0),
            wp(1.0, 5.0, 5.0),
            wp(2.0, 5.0, 7.0),
        ])
        .expect("Trajectory failed to be created");
        let motion = trajectory.motion();

        let p = motion
            .compute_position(&TimePoint::from_secs_f64(0.5))
            .expect("Failed to compute position");
        assert_relative_eq!(p.x, 0.5);
        assert_relative_eq!(p.y, 0.0);

        // The jump at t=1 lands on the later of the tied waypoints
        let p = motion
            .compute_position(&TimePoint::from_secs_f64(1.0))
            .expect("Failed to compute position");
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 5.0);

        // x is constant across the final segment and must stay exact
        let p = motion
            .compute_position(&TimePoint::from_secs_f64(1.5))
            .expect("Failed to compute position");
        assert_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 6.0);

        let err = motion.compute_position(&TimePoint::from_secs_f64(-1.0));
        assert!(matches!(err, Err(InterpError::OutOfBounds { .. })));

        let err = motion.compute_position(&TimePoint::from_secs_f64(2.5));
        assert!(matches!(err, Err(InterpError::OutOfBounds { .. })));
    }
}
