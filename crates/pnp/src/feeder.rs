use std::fmt::{Display, Formatter};

use math::ops::step_along;
use math::pose::Pose;
use nalgebra::Vector2;

use crate::part::PartId;

#[derive(Debug, Clone)]
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FeederId(String);

impl Display for FeederId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeederId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A strip/tray feeder, parts are spaced `pitch` apart starting at `pick_pose`.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Feeder {
    pub id: FeederId,
    pub part_id: PartId,
    pub enabled: bool,
    /// Pick pose of the first part.
    pub pick_pose: Pose,
    /// mm, distance between consecutive parts.
    pub pitch: Vector2<f64>,
    pub capacity: u32,
    /// 0-based index of the next part to pick.
    #[serde(default)]
    pub next_index: u32,
}

impl Feeder {
    pub fn new(id: FeederId, part_id: PartId, pick_pose: Pose, pitch: Vector2<f64>, capacity: u32) -> Self {
        Self {
            id,
            part_id,
            enabled: true,
            pick_pose,
            pitch,
            capacity,
            next_index: 0,
        }
    }

    pub fn is_stocking(&self, part_id: &PartId) -> bool {
        self.enabled && self.part_id.eq(part_id)
    }

    pub fn has_part(&self) -> bool {
        self.enabled && self.next_index < self.capacity
    }

    pub fn remaining(&self) -> u32 {
        self.capacity
            .saturating_sub(self.next_index)
    }

    pub fn next_pick_pose(&self) -> Pose {
        let point = step_along(self.pick_pose.point(), self.pitch, self.next_index);
        Pose {
            x: point.x,
            y: point.y,
            ..self.pick_pose
        }
    }

    /// Call only after a pick was confirmed.
    pub fn advance(&mut self) {
        self.next_index += 1;
    }
}

#[cfg(feature = "testing")]
impl Default for Feeder {
    fn default() -> Self {
        Self::new(
            FeederId::from("DEFAULT_FEEDER"),
            PartId::from("DEFAULT_PART"),
            Pose::new(200.0, 20.0, -1.0, 0.0),
            Vector2::new(4.0, 0.0),
            100,
        )
    }
}
