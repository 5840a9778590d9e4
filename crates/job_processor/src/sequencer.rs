use hardware::channel::{MachineHandle, PickOutcome};
use hardware::error::HardwareFault;
use hardware::resources::MachineResources;
use hardware::vision::VisionMeasurement;
use math::pose::Pose;
use pnp::board_location::BoardLocation;
use pnp::feeder::{Feeder, FeederId};
use pnp::head::NozzleId;
use pnp::job::Job;
use pnp::library::PartLibrary;
use pnp::part::Part;
use pnp::placement::Placement;
use tracing::{debug, info, warn};

use crate::alignment::AlignmentController;
use crate::config::JobProcessorConfig;
use crate::control::JobControl;
use crate::delegate::JobProcessorDelegate;
use crate::error::{AlignmentError, JobError, JobFailure};
use crate::event::{JobProcessorEvent, JobProgress, Listeners};
use crate::retry::{FailureKind, PickRetryAction, RetryPolicy};

/// Position of the sequencer in the job, kept between runs so a paused job resumes where it left off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub board_index: usize,
    /// Index into the board's placements, including those that are not placed.
    pub placement_index: usize,
    board_started: bool,
}

impl Cursor {
    fn next_board(&mut self) {
        self.board_index += 1;
        self.placement_index = 0;
        self.board_started = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Paused,
    Stopped,
}

struct Decision {
    action: PickRetryAction,
    /// The delegate answered, its action is used as-is.
    delegated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed,
    Skipped,
    /// A stop was requested before the part was picked.
    Interrupted,
}

/// Walks the placements of a job in board order: pick, align, place.
///
/// Failures of a single placement are resolved here (retry or skip), only fatal failures are returned.
pub struct PlacementSequencer<'a> {
    machine: &'a MachineHandle,
    vision: &'a mut dyn VisionMeasurement,
    parts: &'a PartLibrary,
    config: &'a JobProcessorConfig,
    delegate: &'a mut dyn JobProcessorDelegate,
    listeners: &'a mut Listeners,
    control: &'a JobControl,
    retry_policy: RetryPolicy,
}

impl<'a> PlacementSequencer<'a> {
    pub fn new(
        machine: &'a MachineHandle,
        vision: &'a mut dyn VisionMeasurement,
        parts: &'a PartLibrary,
        config: &'a JobProcessorConfig,
        delegate: &'a mut dyn JobProcessorDelegate,
        listeners: &'a mut Listeners,
        control: &'a JobControl,
    ) -> Self {
        Self {
            machine,
            vision,
            parts,
            config,
            delegate,
            listeners,
            control,
            retry_policy: RetryPolicy::new(config.retry.max_pick_attempts),
        }
    }

    /// Processes placements from `cursor` onwards until the job is done, or a pause or stop is requested.
    pub fn run(&mut self, job: &Job, cursor: &mut Cursor, progress: &mut JobProgress) -> Result<SequenceOutcome, JobFailure> {
        while let Some(board_location) = job
            .board_locations
            .get(cursor.board_index)
        {
            if !board_location.enabled {
                debug!("Skipping disabled board. board: {}", board_location.board.name);
                cursor.next_board();
                continue;
            }

            while let Some(placement) = board_location
                .board
                .placements
                .get(cursor.placement_index)
            {
                if !board_location.is_placeable(placement) {
                    cursor.placement_index += 1;
                    continue;
                }

                if self.control.is_stop_requested() {
                    return Ok(SequenceOutcome::Stopped);
                }
                if self.control.is_pause_requested() {
                    return Ok(SequenceOutcome::Paused);
                }

                if !cursor.board_started {
                    info!("Processing board. board: {}", board_location.board.name);
                    self.listeners
                        .emit(JobProcessorEvent::BoardProcessingStarted(board_location));
                    cursor.board_started = true;
                }

                match self.process_placement(board_location, placement)? {
                    PlacementOutcome::Placed => progress.placed += 1,
                    PlacementOutcome::Skipped => progress.skipped += 1,
                    PlacementOutcome::Interrupted => return Ok(SequenceOutcome::Stopped),
                }
                cursor.placement_index += 1;

                let status = format!(
                    "Processed {} of {} placements. placed: {}, skipped: {}",
                    progress.processed(),
                    progress.total,
                    progress.placed,
                    progress.skipped
                );
                self.listeners
                    .emit(JobProcessorEvent::DetailedStatusUpdated(&status));
            }

            cursor.next_board();
        }

        Ok(SequenceOutcome::Completed)
    }

    pub fn process_placement(
        &mut self,
        board_location: &BoardLocation,
        placement: &Placement,
    ) -> Result<PlacementOutcome, JobFailure> {
        let machine = self.machine;
        let config = self.config;

        self.listeners
            .emit(JobProcessorEvent::PartProcessingStarted {
                board_location,
                placement,
            });

        let part = self.resolve_part(placement)?;
        let nominal = board_location
            .placement_pose(placement)
            .add(Pose::new(0.0, 0.0, part.height, 0.0));

        info!(
            "Processing placement. board: {}, placement: {}, part: {}, pose: {}",
            board_location.board.name, placement.id, part.id, nominal
        );

        let mut attempt = 0;
        loop {
            if self.control.is_stop_requested() {
                info!("Stop requested, placement not started. placement: {}", placement.id);
                return Ok(PlacementOutcome::Interrupted);
            }
            attempt += 1;

            let snapshot = machine.snapshot()?;
            let nozzle = snapshot
                .free_nozzle()
                .map(|nozzle| nozzle.id.clone())
                .ok_or_else(|| JobFailure::new(JobError::HeadError, "No free nozzle"))?;
            let feeder = snapshot
                .select_feeder(&part.id)
                .ok_or_else(|| {
                    JobFailure::new(
                        JobError::FeederError,
                        format!("No feeder available. part: {}", part.id),
                    )
                })?;

            let pick_failure = match machine.pick(&nozzle, &feeder.id)? {
                PickOutcome::Picked => None,
                PickOutcome::Missed => Some(FailureKind::PickMissed),
                PickOutcome::FeederEmpty => Some(FailureKind::FeederEmpty),
            };
            if let Some(failure) = pick_failure {
                let decision = self.decide(board_location, part, Some(feeder), failure, attempt);
                match decision.action {
                    PickRetryAction::Retry => continue,
                    PickRetryAction::SkipPlacement
                        if !decision.delegated && self.fail_over(&snapshot, part, &feeder.id)? =>
                    {
                        attempt = 0;
                        continue;
                    }
                    PickRetryAction::SkipPlacement => return Ok(self.skip(board_location, placement)),
                    PickRetryAction::Abort => return Err(abort_failure(failure, placement, part)),
                }
            }

            debug!("Picked. placement: {}, nozzle: {}, feeder: {}", placement.id, nozzle, feeder.id);
            self.listeners
                .emit(JobProcessorEvent::PartPicked {
                    board_location,
                    placement,
                });

            let alignment = AlignmentController::new(machine, &mut *self.vision, &config.alignment).align(
                part,
                nominal,
                &nozzle,
            );
            let placement_pose = match alignment {
                Ok(result) => {
                    debug!(
                        "Aligned. placement: {}, offset: {}, passes: {}, converged: {}",
                        placement.id, result.offset, result.passes_used, result.converged
                    );
                    result.placement_pose
                }
                Err(AlignmentError::HardwareFault(fault)) => return Err(self.release_after_fault(&nozzle, fault)),
                Err(error) => {
                    let failure = match error {
                        AlignmentError::OffsetTooLarge {
                            ..
                        } => FailureKind::OffsetTooLarge,
                        _ => FailureKind::MeasurementUnavailable,
                    };
                    warn!("Alignment failed, discarding part. placement: {}, error: {}", placement.id, error);
                    machine.discard(&nozzle, config.discard_pose)?;

                    match self
                        .decide(board_location, part, Some(feeder), failure, attempt)
                        .action
                    {
                        PickRetryAction::Retry => continue,
                        PickRetryAction::SkipPlacement => return Ok(self.skip(board_location, placement)),
                        PickRetryAction::Abort => return Err(abort_failure(failure, placement, part)),
                    }
                }
            };

            machine
                .move_to(&nozzle, placement_pose)
                .and_then(|_| machine.place(&nozzle))
                .map_err(|fault| self.release_after_fault(&nozzle, fault))?;

            info!("Placed. placement: {}, pose: {}", placement.id, placement_pose);
            self.listeners
                .emit(JobProcessorEvent::PartPlaced {
                    board_location,
                    placement,
                    pose: placement_pose,
                });
            self.listeners
                .emit(JobProcessorEvent::PartProcessingCompleted {
                    board_location,
                    placement,
                });

            return Ok(PlacementOutcome::Placed);
        }
    }

    fn resolve_part(&self, placement: &Placement) -> Result<&'a Part, JobFailure> {
        let parts = self.parts;
        let part = parts
            .get(&placement.part_id)
            .ok_or_else(|| {
                JobFailure::new(
                    JobError::PartError,
                    format!("Unknown part. placement: {}, part: {}", placement.id, placement.part_id),
                )
            })?;

        if part.height <= 0.0 {
            return Err(JobFailure::new(
                JobError::PartError,
                format!("Invalid part height. part: {}, height: {}", part.id, part.height),
            ));
        }

        Ok(part)
    }

    fn decide(
        &mut self,
        board_location: &BoardLocation,
        part: &Part,
        feeder: Option<&Feeder>,
        failure: FailureKind,
        attempt: u32,
    ) -> Decision {
        let delegate_override = self
            .delegate
            .part_pick_failed(board_location, part, feeder);
        let action = self
            .retry_policy
            .decide(failure, attempt, delegate_override);

        warn!(
            "Pick failed. part: {}, failure: {}, attempt: {}, action: {}",
            part.id, failure, attempt, action
        );
        Decision {
            action,
            delegated: delegate_override.is_some(),
        }
    }

    /// Disables a feeder that used up its pick attempts, if another enabled feeder stocks the part.
    ///
    /// Returns `true` when the placement can continue with the substitute.
    fn fail_over(&self, snapshot: &MachineResources, part: &Part, failed: &FeederId) -> Result<bool, HardwareFault> {
        let Some(substitute) = snapshot
            .feeders_for(&part.id)
            .find(|feeder| feeder.id.ne(failed))
        else {
            return Ok(false);
        };

        warn!(
            "Disabling feeder after failed picks. feeder: {}, part: {}, substitute: {}",
            failed, part.id, substitute.id
        );
        self.machine
            .set_feeder_enabled(failed, false)?;
        Ok(true)
    }

    /// Tries to drop the part held by the nozzle so a later job does not start with an occupied nozzle.
    fn release_after_fault(&self, nozzle: &NozzleId, fault: HardwareFault) -> JobFailure {
        if let Err(error) = self
            .machine
            .discard(nozzle, self.config.discard_pose)
        {
            warn!("Unable to discard part after hardware fault. nozzle: {}, error: {}", nozzle, error);
        }
        fault.into()
    }

    fn skip(&mut self, board_location: &BoardLocation, placement: &Placement) -> PlacementOutcome {
        warn!("Skipping placement. board: {}, placement: {}", board_location.board.name, placement.id);
        self.listeners
            .emit(JobProcessorEvent::PartSkipped {
                board_location,
                placement,
            });
        self.listeners
            .emit(JobProcessorEvent::PartProcessingCompleted {
                board_location,
                placement,
            });
        PlacementOutcome::Skipped
    }
}

fn abort_failure(failure: FailureKind, placement: &Placement, part: &Part) -> JobFailure {
    let error = match failure {
        FailureKind::PickMissed => JobError::PickError,
        FailureKind::FeederEmpty => JobError::FeederError,
        FailureKind::OffsetTooLarge | FailureKind::MeasurementUnavailable => JobError::AlignmentError,
    };

    JobFailure::new(
        error,
        format!("Aborted after {}. placement: {}, part: {}", failure, placement.id, part.id),
    )
}
