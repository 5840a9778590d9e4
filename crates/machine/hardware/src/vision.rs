use math::pose::Pose;
use pnp::part::Part;

use crate::error::MeasurementUnavailable;

/// How far the part on the nozzle deviates from the camera center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionOffset {
    pub offset: Pose,
    /// Confirms the measurement was taken with the part already rotated to its placement angle.
    pub pre_rotated: bool,
}

impl VisionOffset {
    pub fn new(offset: Pose, pre_rotated: bool) -> Self {
        Self {
            offset,
            pre_rotated,
        }
    }
}

/// Bottom vision, the image processing behind it is not part of this crate.
pub trait VisionMeasurement: Send {
    fn measure(&mut self, camera_pose: Pose, part: &Part, pre_rotated: bool) -> Result<VisionOffset, MeasurementUnavailable>;
}

impl<F> VisionMeasurement for F
where
    F: FnMut(Pose, &Part, bool) -> Result<VisionOffset, MeasurementUnavailable> + Send,
{
    fn measure(&mut self, camera_pose: Pose, part: &Part, pre_rotated: bool) -> Result<VisionOffset, MeasurementUnavailable> {
        self(camera_pose, part, pre_rotated)
    }
}
