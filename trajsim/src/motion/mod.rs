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

pub mod trajectory;
pub use trajectory::{Find, InvalidTrajectoryError, Trajectory};

pub mod r2;

pub use time_point::{Duration, TimePoint};

use thiserror::Error as ThisError;

/// Implemented by anything that occupies a point in time.
pub trait Timed {
    fn time(&self) -> &TimePoint;
}

#[derive(ThisError, Debug, Clone, Copy, PartialEq)]
pub enum InterpError {
    /// The requested time is outside the time range covered by the motion.
    #[error("the requested time ({} s) is outside the motion's time range", .request.as_secs_f64())]
    OutOfBounds {
        range: [TimePoint; 2],
        request: TimePoint,
    },
}

/// A continuous motion that can be queried for a position at any time point
/// within its range.
pub trait Motion<Position> {
    fn compute_position(&self, time: &TimePoint) -> Result<Position, InterpError>;
}

/// Describes how to interpolate a continuous motion between two waypoints.
pub trait Interpolation<Position> {
    type Motion: Motion<Position>;

    fn interpolate(&self, up_to: &Self) -> Self::Motion;
}

pub trait Waypoint:
    Timed + Interpolation<Self::Position> + Clone + std::fmt::Debug
{
    /// What type of spatial position does the waypoint have
    type Position;

    fn position(&self) -> Self::Position;
}
