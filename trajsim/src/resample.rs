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

use crate::motion::r2::{LinearTrajectory, Position};
use crate::motion::{Duration, InterpError, Motion, TimePoint};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, Copy, PartialEq)]
pub enum ResampleError {
    /// The resampling step must span a positive amount of time.
    #[error("the resampling step must be positive, but {} s was provided", .0.as_secs_f64())]
    InvalidStep(Duration),

    /// Interpolation failed while walking the grid. The overlap window keeps
    /// every grid time inside both trajectories, so this indicates a bug in
    /// the caller-provided trajectory rather than a recoverable condition.
    #[error(transparent)]
    Interp(#[from] InterpError),
}

/// Two trajectories projected onto a shared time grid. The three sequences
/// are index-aligned and always have equal lengths.
#[derive(Clone, Debug, PartialEq)]
pub struct ResampledPair {
    /// The synthetic time grid.
    pub time: Vec<TimePoint>,
    /// The first trajectory sampled at each grid time.
    pub a: Vec<Position>,
    /// The second trajectory sampled at each grid time.
    pub b: Vec<Position>,
}

impl ResampledPair {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Projects two trajectories onto one evenly-spaced time grid covering the
/// window where both are active, interpolating each trajectory at every grid
/// time. The grid is generated by index (`start + k * step` over integer
/// nanoseconds), so its length never depends on floating-point accumulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resampler {
    step: Duration,
    include_finish: bool,
}

impl Default for Resampler {
    fn default() -> Self {
        Resampler {
            step: Duration::from_secs_f64(0.1),
            include_finish: false,
        }
    }
}

impl Resampler {
    pub fn new(step: Duration) -> Result<Self, ResampleError> {
        if step.nanos <= 0 {
            return Err(ResampleError::InvalidStep(step));
        }

        Ok(Resampler {
            step,
            include_finish: false,
        })
    }

    /// Also sample the right edge of the overlap window. The stepping loop
    /// covers the half-open window `[start, finish)`, so the finish time
    /// itself is otherwise never emitted.
    pub fn include_finish(mut self, include: bool) -> Self {
        self.include_finish = include;
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn resample(
        &self,
        a: &LinearTrajectory,
        b: &LinearTrajectory,
    ) -> Result<ResampledPair, ResampleError> {
        let start = a.initial_time().nanos_since_zero.max(b.initial_time().nanos_since_zero);
        let finish = a.finish_time().nanos_since_zero.min(b.finish_time().nanos_since_zero);

        let mut pair = ResampledPair {
            time: Vec::new(),
            a: Vec::new(),
            b: Vec::new(),
        };

        if start >= finish {
            // The trajectories never coexist. Degenerate, but not an error.
            return Ok(pair);
        }

        let motion_a = a.motion();
        let motion_b = b.motion();
        let push = |t: TimePoint, pair: &mut ResampledPair| -> Result<(), ResampleError> {
            pair.a.push(motion_a.compute_position(&t)?);
            pair.b.push(motion_b.compute_position(&t)?);
            pair.time.push(t);
            Ok(())
        };

        for k in 0i64.. {
            let t = TimePoint::new(start + k * self.step.nanos);
            if t.nanos_since_zero >= finish {
                break;
            }
            push(t, &mut pair)?;
        }

        if self.include_finish {
            push(TimePoint::new(finish), &mut pair)?;
        }

        Ok(pair)
    }
}
