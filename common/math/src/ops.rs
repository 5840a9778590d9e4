use nalgebra::{Point2, Vector2};

/// Multiplies a feeder pitch by a part index, e.g. the 3rd pocket on a tape.
pub fn step_along(origin: Point2<f64>, pitch: Vector2<f64>, index: u32) -> Point2<f64> {
    origin + pitch * f64::from(index)
}
