use pnp::board_location::BoardLocation;
use pnp::feeder::Feeder;
use pnp::part::Part;

use crate::retry::PickRetryAction;

/// Pluggable policy, consulted before the default retry policy.
pub trait JobProcessorDelegate: Send {
    /// Return `None` to let the retry policy decide.
    fn part_pick_failed(
        &mut self,
        board_location: &BoardLocation,
        part: &Part,
        feeder: Option<&Feeder>,
    ) -> Option<PickRetryAction>;
}

#[derive(Debug, Default)]
pub struct DefaultDelegate;

impl JobProcessorDelegate for DefaultDelegate {
    fn part_pick_failed(&mut self, _: &BoardLocation, _: &Part, _: Option<&Feeder>) -> Option<PickRetryAction> {
        None
    }
}

/// Always answers with the same action.
#[derive(Debug)]
pub struct FixedActionDelegate(pub PickRetryAction);

impl JobProcessorDelegate for FixedActionDelegate {
    fn part_pick_failed(&mut self, _: &BoardLocation, _: &Part, _: Option<&Feeder>) -> Option<PickRetryAction> {
        Some(self.0)
    }
}
