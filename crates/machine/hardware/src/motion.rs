use math::pose::Pose;
use pnp::head::NozzleId;

use crate::error::HardwareFault;

/// Driver layer that executes primitive motion.
///
/// Implementations are moved onto the hardware thread and are only ever called from there, one command at a time.
pub trait MotionExecutor: Send {
    /// Moves the head carrying `nozzle` so the nozzle tip is at `pose`.
    fn move_to(&mut self, nozzle: &NozzleId, pose: Pose) -> Result<(), HardwareFault>;

    /// Picks at the current location, `Ok(false)` when the part was not picked up (e.g. vacuum check failed).
    fn pick(&mut self, nozzle: &NozzleId) -> Result<bool, HardwareFault>;

    /// Releases the part at the current location.
    fn place(&mut self, nozzle: &NozzleId) -> Result<(), HardwareFault>;
}

impl<T: MotionExecutor + ?Sized> MotionExecutor for Box<T> {
    fn move_to(&mut self, nozzle: &NozzleId, pose: Pose) -> Result<(), HardwareFault> {
        (**self).move_to(nozzle, pose)
    }

    fn pick(&mut self, nozzle: &NozzleId) -> Result<bool, HardwareFault> {
        (**self).pick(nozzle)
    }

    fn place(&mut self, nozzle: &NozzleId) -> Result<(), HardwareFault> {
        (**self).place(nozzle)
    }
}
