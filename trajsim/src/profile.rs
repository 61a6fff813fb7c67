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

use crate::motion::r2::Position;
use float_ord::FloatOrd;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileError {
    /// The two point sequences must pair up index by index.
    #[error("the point sequences must have equal lengths, but got {a} and {b}")]
    LengthMismatch { a: usize, b: usize },

    /// A reduction over a zero-length profile has no defined value.
    #[error("the distance profile is empty, so the reduction has no value")]
    EmptyProfile,
}

/// Euclidean distance between two points. Symmetric, non-negative, and zero
/// exactly when the points coincide.
pub fn distance(p: &Position, q: &Position) -> f64 {
    (p - q).norm()
}

/// Project a point sequence onto one coordinate axis (0 = x, 1 = y).
pub fn axis_projection(points: &[Position], axis: usize) -> Vec<f64> {
    points.iter().map(|p| p[axis]).collect()
}

/// For every point of `a`, the distance to its nearest neighbor anywhere in
/// `b` — not the distance to the same-index point. The scan keeps a running
/// minimum and stops early once it hits an exact match, since no candidate
/// can be closer than zero. O(n²) point comparisons in the worst case.
pub fn distances(a: &[Position], b: &[Position]) -> Result<Vec<f64>, ProfileError> {
    if a.len() != b.len() {
        return Err(ProfileError::LengthMismatch {
            a: a.len(),
            b: b.len(),
        });
    }

    let mut profile = Vec::with_capacity(a.len());
    for p in a {
        let mut nearest = f64::INFINITY;
        for q in b {
            let d = distance(p, q);
            if d < nearest {
                nearest = d;
            }

            if nearest == 0.0 {
                break;
            }
        }
        profile.push(nearest);
    }

    Ok(profile)
}

/// The closest approach between the two point sequences.
pub fn min(a: &[Position], b: &[Position]) -> Result<f64, ProfileError> {
    distances(a, b)?
        .into_iter()
        .map(FloatOrd)
        .min()
        .map(|d| d.0)
        .ok_or(ProfileError::EmptyProfile)
}

/// The worst-case separation between the two point sequences. This is the
/// discrepancy bound between the curves after time alignment.
pub fn max(a: &[Position], b: &[Position]) -> Result<f64, ProfileError> {
    distances(a, b)?
        .into_iter()
        .map(FloatOrd)
        .max()
        .map(|d| d.0)
        .ok_or(ProfileError::EmptyProfile)
}

/// The arithmetic mean of the distance profile, as an aggregate similarity
/// score.
pub fn mean(a: &[Position], b: &[Position]) -> Result<f64, ProfileError> {
    let profile = distances(a, b)?;
    if profile.is_empty() {
        return Err(ProfileError::EmptyProfile);
    }

    Ok(profile.iter().sum::<f64>() / profile.len() as f64)
}
