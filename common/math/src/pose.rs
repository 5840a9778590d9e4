use std::fmt::{Display, Formatter};

use nalgebra::{Point2, Rotation2, Vector2};

use crate::angle::normalize_angle_deg_signed;

/// Default tolerance used when comparing poses that went through floating point arithmetic.
pub const POSE_EPSILON: f64 = 1e-9;

/// A position and rotation in machine (or board) space.
///
/// Uses right-handed cartesian coordinate system, all lengths share one unit (mm), conversions happen at the
/// boundary of the system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// Positive = Right
    pub x: f64,
    /// Positive = Up
    pub y: f64,
    pub z: f64,
    /// Degrees, positive values indicate anti-clockwise rotation
    pub rotation: f64,
}

impl Pose {
    pub const ZERO: Pose = Pose {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        rotation: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            z,
            rotation,
        }
    }

    pub const fn from_xy(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Self {
            rotation,
            ..self
        }
    }

    pub fn with_z(self, z: f64) -> Self {
        Self {
            z,
            ..self
        }
    }

    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Applies `delta` on top of `self`, translations and rotations accumulate.
    ///
    /// Together with [`Pose::invert`] this forms the offset group used when combining vision offsets, i.e.
    /// `compose(p, invert(p))` is the zero pose and `invert(invert(p)) == p`.
    pub fn compose(self, delta: Pose) -> Self {
        Self::new(
            self.x + delta.x,
            self.y + delta.y,
            self.z + delta.z,
            self.rotation + delta.rotation,
        )
    }

    pub fn invert(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.rotation)
    }

    /// Translation only, the rotation of `self` is kept.
    pub fn add(self, other: Pose) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z, self.rotation)
    }

    /// Translation only, the rotation of `self` is kept.
    pub fn subtract(self, other: Pose) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z, self.rotation)
    }

    pub fn add_with_rotation(self, other: Pose) -> Self {
        self.compose(other)
    }

    /// Removes translation and rotation of `other`.
    ///
    /// Callers holding an offset that was measured in a rotated frame must un-rotate it first, see
    /// [`Pose::rotate_xy`].
    pub fn subtract_with_rotation(self, other: Pose) -> Self {
        self.compose(other.invert())
    }

    /// Rotates the translation about the origin, z and rotation are unchanged.
    pub fn rotate_xy(self, angle: f64) -> Self {
        let rotated = Rotation2::new(angle.to_radians()) * Vector2::new(self.x, self.y);
        Self {
            x: rotated.x,
            y: rotated.y,
            ..self
        }
    }

    /// Rotates the translation about `center`.
    pub fn rotate_about_point(self, center: Pose, angle: f64) -> Self {
        self.subtract(center)
            .rotate_xy(angle)
            .add(center)
    }

    /// Distance from the origin in the XY plane.
    pub fn linear_magnitude(&self) -> f64 {
        Vector2::new(self.x, self.y).norm()
    }

    pub fn linear_distance_to(&self, other: &Pose) -> f64 {
        nalgebra::distance(&self.point(), &other.point())
    }

    /// Compares all components, rotations are compared modulo 360 degrees.
    pub fn approx_eq(&self, other: &Pose, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
            && normalize_angle_deg_signed(self.rotation - other.rotation).abs() <= epsilon
    }
}

impl Display for Pose {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x: {:.3}, y: {:.3}, z: {:.3}, rotation: {:.3})",
            self.x, self.y, self.z, self.rotation
        )
    }
}
