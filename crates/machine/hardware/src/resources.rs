use pnp::feeder::{Feeder, FeederId};
use pnp::head::{Head, Nozzle, NozzleId};
use pnp::part::PartId;

use crate::error::HardwareFault;

/// The stateful parts of the machine: feeders and the nozzles on each head.
///
/// Owned by the hardware thread while a [`crate::channel::HardwareChannel`] is running, everyone else works on a
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MachineResources {
    pub heads: Vec<Head>,
    pub feeders: Vec<Feeder>,
}

impl MachineResources {
    pub fn new(heads: Vec<Head>, feeders: Vec<Feeder>) -> Self {
        Self {
            heads,
            feeders,
        }
    }

    pub fn nozzles(&self) -> impl Iterator<Item = &Nozzle> {
        self.heads
            .iter()
            .flat_map(|head| head.nozzles.iter())
    }

    pub fn nozzle(&self, id: &NozzleId) -> Option<&Nozzle> {
        self.nozzles()
            .find(|nozzle| nozzle.id.eq(id))
    }

    pub fn feeder(&self, id: &FeederId) -> Option<&Feeder> {
        self.feeders
            .iter()
            .find(|feeder| feeder.id.eq(id))
    }

    /// First empty nozzle, in head order.
    pub fn free_nozzle(&self) -> Option<&Nozzle> {
        self.nozzles()
            .find(|nozzle| nozzle.is_empty())
    }

    /// Enabled feeders assigned to the part, regardless of their stock.
    pub fn feeders_for<'a>(&'a self, part_id: &'a PartId) -> impl Iterator<Item = &'a Feeder> + 'a {
        self.feeders
            .iter()
            .filter(move |feeder| feeder.is_stocking(part_id))
    }

    /// First enabled feeder assigned to the part that still has parts, otherwise the first enabled one.
    pub fn select_feeder<'a>(&'a self, part_id: &'a PartId) -> Option<&'a Feeder> {
        self.feeders_for(part_id)
            .find(|feeder| feeder.has_part())
            .or_else(|| {
                self.feeders_for(part_id)
                    .next()
            })
    }

    pub(crate) fn nozzle_mut(&mut self, id: &NozzleId) -> Result<&mut Nozzle, HardwareFault> {
        self.heads
            .iter_mut()
            .flat_map(|head| head.nozzles.iter_mut())
            .find(|nozzle| nozzle.id.eq(id))
            .ok_or_else(|| HardwareFault::UnknownNozzle(id.clone()))
    }

    pub(crate) fn feeder_mut(&mut self, id: &FeederId) -> Result<&mut Feeder, HardwareFault> {
        self.feeders
            .iter_mut()
            .find(|feeder| feeder.id.eq(id))
            .ok_or_else(|| HardwareFault::UnknownFeeder(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use math::pose::Pose;
    use nalgebra::Vector2;
    use pnp::head::HeadId;

    use super::*;

    fn resources() -> MachineResources {
        let empty = Feeder::new(FeederId::from("F1"), PartId::from("P1"), Pose::ZERO, Vector2::new(4.0, 0.0), 0);
        let stocked = Feeder::new(FeederId::from("F2"), PartId::from("P1"), Pose::ZERO, Vector2::new(4.0, 0.0), 5);
        let mut disabled = Feeder::new(FeederId::from("F3"), PartId::from("P2"), Pose::ZERO, Vector2::new(4.0, 0.0), 5);
        disabled.enabled = false;

        MachineResources::new(vec![Head::new(HeadId::from("H1"), &["N1", "N2"])], vec![empty, stocked, disabled])
    }

    #[test]
    fn select_feeder_prefers_stocked_feeders() {
        // given
        let resources = resources();

        // expect
        assert_eq!(
            resources
                .select_feeder(&PartId::from("P1"))
                .map(|feeder| feeder.id.clone()),
            Some(FeederId::from("F2"))
        );
        assert_eq!(resources.select_feeder(&PartId::from("P2")), None);
    }

    #[test]
    fn free_nozzle_skips_occupied_nozzles() {
        // given
        let mut resources = resources();
        resources
            .nozzle_mut(&NozzleId::from("N1"))
            .unwrap()
            .part = Some(PartId::from("P1"));

        // expect
        assert_eq!(resources.free_nozzle().map(|nozzle| nozzle.id.clone()), Some(NozzleId::from("N2")));
    }

    #[test]
    fn unknown_nozzle() {
        // given
        let mut resources = resources();

        // expect
        assert_eq!(
            resources.nozzle_mut(&NozzleId::from("N9")),
            Err(HardwareFault::UnknownNozzle(NozzleId::from("N9")))
        );
    }
}
