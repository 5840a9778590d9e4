use num_traits::Float;

/// Normalize to (-180, 180]
pub fn normalize_angle_deg_signed<T: Float>(angle: T) -> T {
    let full_circle = T::from(360.0).unwrap();
    let half_circle = T::from(180.0).unwrap();

    let mut normalized = angle % full_circle;
    if normalized <= -half_circle {
        normalized = normalized + full_circle;
    } else if normalized > half_circle {
        normalized = normalized - full_circle;
    }
    normalized
}

/// Normalize to [0, 360)
pub fn normalize_angle_deg_unsigned<T: Float>(angle: T) -> T {
    let full_circle = T::from(360.0).unwrap();
    let normalized = angle % full_circle;
    if normalized < T::zero() {
        normalized + full_circle
    } else {
        normalized
    }
}

/// Normalize to (-limit, limit], wrapping around in steps of `2 * limit`.
///
/// Vision results for rectangular bodies can only be trusted modulo 90 degrees, calling this with a limit of 45
/// folds such a result into the smallest correction.
pub fn normalize_angle_deg_within<T: Float>(angle: T, limit: T) -> T {
    let period = limit + limit;

    let mut normalized = angle % period;
    if normalized <= -limit {
        normalized = normalized + period;
    } else if normalized > limit {
        normalized = normalized - period;
    }
    normalized
}
