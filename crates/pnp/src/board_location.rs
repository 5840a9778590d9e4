use math::pose::Pose;

use crate::pcb::{Board, PcbSide};
use crate::placement::Placement;

/// A board fixed somewhere on the machine.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BoardLocation {
    pub board: Board,
    /// Location of the board origin in machine space.
    pub pose: Pose,
    /// The side facing the head.
    pub side: PcbSide,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl BoardLocation {
    pub fn new(board: Board, pose: Pose, side: PcbSide) -> Self {
        Self {
            board,
            pose,
            side,
            enabled: true,
        }
    }

    /// Placements the machine should place, in board order.
    ///
    /// Placements on the other side of the board, or marked as not to be placed, are excluded.
    pub fn placeable_placements(&self) -> impl Iterator<Item = &Placement> {
        self.board
            .placements
            .iter()
            .filter(|placement| self.is_placeable(placement))
    }

    pub fn is_placeable(&self, placement: &Placement) -> bool {
        placement.side == self.side && placement.place
    }

    /// Transforms a placement pose from board space into machine space.
    ///
    /// Bottom side placements are mirrored in X about the board width first.
    pub fn placement_pose(&self, placement: &Placement) -> Pose {
        let pose = match self.side {
            PcbSide::Top => placement.pose,
            PcbSide::Bottom => Pose {
                x: -placement.pose.x,
                ..placement.pose
            }
            .add(Pose::from_xy(self.board.width, 0.0)),
        };

        pose.rotate_xy(self.pose.rotation)
            .add_with_rotation(self.pose)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::part::PartId;
    use crate::placement::RefDes;

    fn board_location(side: PcbSide, pose: Pose) -> BoardLocation {
        let board = Board::new("board".to_string(), 40.0, vec![
            Placement::new(RefDes::from("R1"), PartId::from("P1"), Pose::new(10.0, 5.0, 0.0, 90.0), PcbSide::Top),
            Placement::new(RefDes::from("R2"), PartId::from("P1"), Pose::new(12.0, 5.0, 0.0, 0.0), PcbSide::Bottom),
            Placement::new(RefDes::from("R3"), PartId::from("P1"), Pose::new(14.0, 5.0, 0.0, 0.0), PcbSide::Top)
                .with_place(false),
        ]);
        BoardLocation::new(board, pose, side)
    }

    #[rstest]
    #[case(PcbSide::Top, Pose::new(100.0, 50.0, 1.0, 0.0), Pose::new(110.0, 55.0, 1.0, 90.0))]
    #[case(PcbSide::Top, Pose::new(100.0, 50.0, 0.0, 90.0), Pose::new(95.0, 60.0, 0.0, 180.0))]
    #[case(PcbSide::Bottom, Pose::new(100.0, 50.0, 0.0, 0.0), Pose::new(130.0, 55.0, 0.0, 90.0))]
    fn placement_pose(#[case] side: PcbSide, #[case] board_pose: Pose, #[case] expected: Pose) {
        // given
        let board_location = board_location(side, board_pose);
        let placement = &board_location.board.placements[0];

        // when
        let pose = board_location.placement_pose(placement);

        // then
        assert!(pose.approx_eq(&expected, 1e-9), "pose: {pose}, expected: {expected}");
    }

    #[rstest]
    #[case(PcbSide::Top, vec!["R1"])]
    #[case(PcbSide::Bottom, vec!["R2"])]
    fn placeable_placements(#[case] side: PcbSide, #[case] expected: Vec<&str>) {
        // given
        let board_location = board_location(side, Pose::ZERO);

        // when
        let ids: Vec<String> = board_location
            .placeable_placements()
            .map(|placement| placement.id.to_string())
            .collect();

        // then
        assert_eq!(ids, expected);
    }
}
