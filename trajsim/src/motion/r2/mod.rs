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

pub type Position = nalgebra::geometry::Point2<f64>;
pub type Point = Position;

pub mod timed_position;
pub use timed_position::*;

pub type LinearTrajectory = super::Trajectory<Waypoint>;

#[cfg(feature = "serde")]
use serde::de::{Deserializer, Error, SeqAccess, Visitor};
#[cfg(feature = "serde")]
use serde::ser::{SerializeSeq, SerializeTuple, Serializer};
#[cfg(feature = "serde")]
use super::{TimePoint, Trajectory};

// Waypoints serialize as (t, x, y) triples with the time in seconds, and a
// trajectory as a sequence of such triples.

#[cfg(feature = "serde")]
impl serde::Serialize for Waypoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tup = serializer.serialize_tuple(3)?;
        tup.serialize_element(&self.time.as_secs_f64())?;
        tup.serialize_element(&self.position.x)?;
        tup.serialize_element(&self.position.y)?;
        tup.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Waypoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (t, x, y) = <(f64, f64, f64) as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Waypoint::new(TimePoint::from_secs_f64(t), x, y))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LinearTrajectory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for e in self.iter() {
            seq.serialize_element(e)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct R2TrajectoryVisitor;

#[cfg(feature = "serde")]
impl<'de> Visitor<'de> for R2TrajectoryVisitor {
    type Value = LinearTrajectory;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of (t, x, y) waypoints")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut waypoints = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(wp) = seq.next_element::<Waypoint>()? {
            waypoints.push(wp);
        }

        Trajectory::from_iter(waypoints).map_err(A::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LinearTrajectory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(R2TrajectoryVisitor)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_trajectory_round_trip() {
        let trajectory = LinearTrajectory::from_iter([
            Waypoint::new_f64(0.0, 0.0, 0.0),
            Waypoint::new_f64(0.5, 1.0, -1.0),
            Waypoint::new_f64(1.0, 2.0, 3.5),
        ])
        .expect("Trajectory failed to be created");

        let json = serde_json::to_string(&trajectory).expect("Failed to serialize");
        assert_eq!(json, "[[0.0,0.0,0.0],[0.5,1.0,-1.0],[1.0,2.0,3.5]]");

        let back: LinearTrajectory =
            serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(back, trajectory);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let too_short: Result<LinearTrajectory, _> = serde_json::from_str("[[0.0,0.0,0.0]]");
        assert!(too_short.is_err());

        let out_of_order: Result<LinearTrajectory, _> =
            serde_json::from_str("[[1.0,0.0,0.0],[0.0,1.0,1.0]]");
        assert!(out_of_order.is_err());
    }
}
