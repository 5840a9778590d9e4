//! In-memory stand-ins for the driver and vision layers, used by tests and the demo runner.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use math::pose::Pose;
use pnp::head::NozzleId;
use pnp::part::{Part, PartId};
use tracing::trace;

use crate::error::{HardwareFault, MeasurementUnavailable};
use crate::motion::MotionExecutor;
use crate::vision::{VisionMeasurement, VisionOffset};

#[derive(Debug, Clone, PartialEq)]
pub enum MotionCommand {
    MoveTo { nozzle: NozzleId, pose: Pose },
    Pick { nozzle: NozzleId },
    Place { nozzle: NozzleId },
}

/// Shared view of the commands a [`SimulatedMotion`] executed, usable after the executor was moved away.
#[derive(Debug, Clone, Default)]
pub struct MotionLog {
    commands: Arc<Mutex<Vec<MotionCommand>>>,
}

impl MotionLog {
    fn lock(&self) -> MutexGuard<'_, Vec<MotionCommand>> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn commands(&self) -> Vec<MotionCommand> {
        self.lock().clone()
    }

    pub fn pick_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|command| matches!(command, MotionCommand::Pick { .. }))
            .count()
    }

    pub fn place_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|command| matches!(command, MotionCommand::Place { .. }))
            .count()
    }
}

/// Executes nothing, records everything.
///
/// Picks succeed unless scripted otherwise; a fault can be injected after a number of commands.
#[derive(Debug, Default)]
pub struct SimulatedMotion {
    log: MotionLog,
    pick_results: VecDeque<bool>,
    always_miss: bool,
    fault_after: Option<usize>,
    fault_on: Option<usize>,
    attempted: usize,
}

impl SimulatedMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results for the next picks, in order. Once used up picks succeed again.
    pub fn with_pick_results(mut self, results: impl IntoIterator<Item = bool>) -> Self {
        self.pick_results.extend(results);
        self
    }

    pub fn with_always_miss(mut self) -> Self {
        self.always_miss = true;
        self
    }

    /// Every command after the first `commands` ones fails with [`HardwareFault::Motion`].
    pub fn with_fault_after(mut self, commands: usize) -> Self {
        self.fault_after = Some(commands);
        self
    }

    /// Only the command with this 0-based index fails.
    pub fn with_fault_on(mut self, command: usize) -> Self {
        self.fault_on = Some(command);
        self
    }

    pub fn log(&self) -> MotionLog {
        self.log.clone()
    }

    fn record(&mut self, command: MotionCommand) -> Result<(), HardwareFault> {
        let index = self.attempted;
        self.attempted += 1;
        if self
            .fault_after
            .is_some_and(|limit| index >= limit)
            || self.fault_on == Some(index)
        {
            return Err(HardwareFault::Motion(format!("simulated fault. command: {:?}", command)));
        }

        trace!("simulated. command: {:?}", command);
        self.log
            .commands
            .lock()
            .map_err(|_| HardwareFault::Motion("motion log poisoned".to_string()))?
            .push(command);
        Ok(())
    }
}

impl MotionExecutor for SimulatedMotion {
    fn move_to(&mut self, nozzle: &NozzleId, pose: Pose) -> Result<(), HardwareFault> {
        self.record(MotionCommand::MoveTo {
            nozzle: nozzle.clone(),
            pose,
        })
    }

    fn pick(&mut self, nozzle: &NozzleId) -> Result<bool, HardwareFault> {
        self.record(MotionCommand::Pick {
            nozzle: nozzle.clone(),
        })?;

        if self.always_miss {
            return Ok(false);
        }
        Ok(self
            .pick_results
            .pop_front()
            .unwrap_or(true))
    }

    fn place(&mut self, nozzle: &NozzleId) -> Result<(), HardwareFault> {
        self.record(MotionCommand::Place {
            nozzle: nozzle.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    pub camera_pose: Pose,
    pub part_id: PartId,
    pub pre_rotated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VisionLog {
    requests: Arc<Mutex<Vec<VisionRequest>>>,
}

impl VisionLog {
    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Returns queued offsets in order, then a zero offset.
///
/// The returned offset echoes the requested pre-rotation.
#[derive(Debug, Default)]
pub struct ScriptedVision {
    results: VecDeque<Result<Pose, MeasurementUnavailable>>,
    log: VisionLog,
}

impl ScriptedVision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Pose) -> Self {
        self.results.push_back(Ok(offset));
        self
    }

    pub fn with_offsets(mut self, offsets: impl IntoIterator<Item = Pose>) -> Self {
        self.results
            .extend(offsets.into_iter().map(Ok));
        self
    }

    pub fn with_unavailable(mut self, reason: &str) -> Self {
        self.results
            .push_back(Err(MeasurementUnavailable::new(reason)));
        self
    }

    pub fn log(&self) -> VisionLog {
        self.log.clone()
    }
}

impl VisionMeasurement for ScriptedVision {
    fn measure(&mut self, camera_pose: Pose, part: &Part, pre_rotated: bool) -> Result<VisionOffset, MeasurementUnavailable> {
        self.log
            .requests
            .lock()
            .map_err(|_| MeasurementUnavailable::new("vision log poisoned"))?
            .push(VisionRequest {
                camera_pose,
                part_id: part.id.clone(),
                pre_rotated,
            });

        let offset = self
            .results
            .pop_front()
            .unwrap_or(Ok(Pose::ZERO))?;

        Ok(VisionOffset::new(offset, pre_rotated))
    }
}
