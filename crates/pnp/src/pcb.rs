use std::collections::HashSet;

use derivative::Derivative;

use crate::placement::{Placement, RefDes};

#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PcbSide {
    #[derivative(Default)]
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Board {
    pub name: String,
    /// mm, used to mirror placements when the board is presented bottom side up.
    pub width: f64,
    /// In the order they will be placed.
    pub placements: Vec<Placement>,
}

impl Board {
    pub fn new(name: String, width: f64, placements: Vec<Placement>) -> Self {
        Self {
            name,
            width,
            placements,
        }
    }

    /// Each duplicated ref des is returned once, in the order of the first duplicate.
    pub fn duplicate_placement_ids(&self) -> Vec<&RefDes> {
        let mut seen = HashSet::new();
        let mut duplicates = vec![];
        for placement in &self.placements {
            if !seen.insert(&placement.id) && !duplicates.contains(&&placement.id) {
                duplicates.push(&placement.id);
            }
        }
        duplicates
    }
}
