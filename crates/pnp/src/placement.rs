use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

use lexical_sort::natural_lexical_cmp;
use math::pose::Pose;

use crate::part::PartId;
use crate::pcb::PcbSide;

/// A single part to be placed on a board.
///
/// The pose is relative to the board origin, as seen from the side given by `side`.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub id: RefDes,
    pub part_id: PartId,
    pub pose: Pose,
    pub side: PcbSide,
    /// `false` for do-not-place/do-not-fit placements
    #[serde(default = "default_place")]
    pub place: bool,
}

fn default_place() -> bool {
    true
}

impl Placement {
    pub fn new(id: RefDes, part_id: PartId, pose: Pose, side: PcbSide) -> Self {
        Self {
            id,
            part_id,
            pose,
            side,
            place: true,
        }
    }

    pub fn with_place(mut self, place: bool) -> Self {
        self.place = place;
        self
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RefDes(String);

impl Ord for RefDes {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_lexical_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for RefDes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for RefDes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RefDes {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Debug for RefDes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl From<&str> for RefDes {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Deref for RefDes {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
