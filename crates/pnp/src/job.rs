use crate::board_location::BoardLocation;

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub name: String,
    pub board_locations: Vec<BoardLocation>,
}

impl Job {
    pub fn new(name: String, board_locations: Vec<BoardLocation>) -> Self {
        Self {
            name,
            board_locations,
        }
    }

    pub fn enabled_board_locations(&self) -> impl Iterator<Item = &BoardLocation> {
        self.board_locations
            .iter()
            .filter(|board_location| board_location.enabled)
    }

    /// Number of placements the machine will attempt to place.
    pub fn placement_count(&self) -> usize {
        self.enabled_board_locations()
            .map(|board_location| {
                board_location
                    .placeable_placements()
                    .count()
            })
            .sum()
    }
}
