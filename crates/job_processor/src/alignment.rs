use hardware::channel::MachineHandle;
use hardware::vision::VisionMeasurement;
use math::angle::normalize_angle_deg_within;
use math::pose::Pose;
use pnp::head::NozzleId;
use pnp::part::{AlignmentSettings, Part};
use tracing::{debug, warn};

use crate::config::AlignmentConfig;
use crate::error::AlignmentError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentResult {
    /// Cumulative offset over all passes, nominal pose minus corrected pose.
    pub offset: Pose,
    /// Where the head must be to place the part at the nominal pose.
    pub placement_pose: Pose,
    pub pre_rotated: bool,
    pub passes_used: u32,
    pub converged: bool,
}

impl AlignmentResult {
    fn uncorrected(nominal: Pose) -> Self {
        Self {
            offset: Pose::ZERO,
            placement_pose: nominal,
            pre_rotated: false,
            passes_used: 0,
            converged: true,
        }
    }
}

/// Runs the bottom vision feedback loop for a part held by a nozzle.
pub struct AlignmentController<'a> {
    machine: &'a MachineHandle,
    vision: &'a mut dyn VisionMeasurement,
    config: &'a AlignmentConfig,
}

impl<'a> AlignmentController<'a> {
    pub fn new(machine: &'a MachineHandle, vision: &'a mut dyn VisionMeasurement, config: &'a AlignmentConfig) -> Self {
        Self {
            machine,
            vision,
            config,
        }
    }

    /// Measures the part and computes the head pose that places it at `nominal`.
    ///
    /// Pre-rotated parts are measured at the corrected pose on every pass, each reading is the residual left by the
    /// previous correction. Running out of passes is not an error, the result then has `converged == false`.
    ///
    /// A part measured at 0 degrees does not move on the nozzle between measurements, so the post-rotated correction
    /// is computed from a single measurement.
    pub fn align(&mut self, part: &Part, nominal: Pose, nozzle: &NozzleId) -> Result<AlignmentResult, AlignmentError> {
        let settings = match self.config.settings_for(part) {
            Some(settings) if self.config.is_enabled_for(part) => settings,
            _ => {
                debug!("Alignment disabled. part: {}", part.id);
                return Ok(AlignmentResult::uncorrected(nominal));
            }
        };

        let pre_rotate = settings
            .pre_rotate
            .resolve(self.config.pre_rotate);
        let max_passes = settings.max_vision_passes.max(1);

        let mut target = nominal;
        let mut passes_used = 0;
        let mut converged = false;
        let mut pre_rotated: bool;

        loop {
            // pre-rotation measures the part at its placement angle, otherwise at 0 degrees
            let measure_pose = if pre_rotate {
                target
            } else {
                target.with_rotation(0.0)
            };
            self.machine
                .move_to(nozzle, measure_pose)?;

            let measurement = self
                .vision
                .measure(measure_pose, part, pre_rotate)?;
            passes_used += 1;
            pre_rotated = measurement.pre_rotated;

            let angle_offset = normalize_angle_deg_within(
                measurement.offset.rotation,
                settings.max_rotation.limit(),
            );
            let offset = measurement
                .offset
                .with_rotation(angle_offset);

            debug!(
                "Alignment pass. part: {}, pass: {}/{}, pre_rotated: {}, offset: {}",
                part.id, passes_used, max_passes, pre_rotated, offset
            );

            if !pre_rotated {
                target = correct_post_rotated(target, offset);
                converged = true;
                break;
            }

            if offset.linear_magnitude() > self.config.pre_rotate_offset_limit {
                return Err(AlignmentError::OffsetTooLarge {
                    offset,
                    limit: self.config.pre_rotate_offset_limit,
                });
            }
            target = correct_pre_rotated(target, offset);

            if is_within_tolerance(part, settings, &offset) {
                converged = true;
                break;
            }
            if passes_used >= max_passes {
                break;
            }
        }

        if !converged {
            warn!(
                "Alignment did not converge. part: {}, passes: {}, placement_pose: {}",
                part.id, passes_used, target
            );
        }

        Ok(AlignmentResult {
            offset: nominal.subtract_with_rotation(target),
            placement_pose: target,
            pre_rotated,
            passes_used,
            converged,
        })
    }
}

/// The part is already at its placement angle, rotating the nozzle by the small angular offset swings the
/// off-center part around the nozzle axis, so the translation is un-rotated before it is removed.
fn correct_pre_rotated(target: Pose, offset: Pose) -> Pose {
    let offset = offset
        .rotate_xy(-offset.rotation)
        .with_rotation(offset.rotation);
    target.subtract_with_rotation(offset)
}

/// The offset was measured at 0 degrees, the part center is rotated into the placement angle about the nozzle
/// before translating to the target.
fn correct_post_rotated(target: Pose, offset: Pose) -> Pose {
    let angle = target.rotation - offset.rotation;
    Pose::ZERO
        .rotate_about_point(offset, angle)
        .with_rotation(angle)
        .add(target)
        .subtract(offset)
}

/// Besides the center offset, the displacement of a body corner caused by the angular offset is checked, so large
/// parts react more sensitively to angular offsets.
fn is_within_tolerance(part: &Part, settings: &AlignmentSettings, offset: &Pose) -> bool {
    let (corner_x, corner_y) = part.package.corner();
    let corner = Pose::from_xy(corner_x, corner_y);
    let corner_displacement = corner.linear_distance_to(&corner.rotate_xy(offset.rotation));

    offset.linear_magnitude() <= settings.max_linear_offset
        && corner_displacement <= settings.max_linear_offset
        && offset.rotation.abs() <= settings.max_angular_offset
}
