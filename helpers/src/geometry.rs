use std::f64::consts::PI;

/// Distances below this are treated as zero when a direction has to be derived from them.
pub const DIST_EPS: f64 = 1e-9;

/// dist returns the euclidean distance between two points.
pub fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

/// wrap_angle maps an angle (rad) into the half-open range (-pi, pi].
pub fn wrap_angle(angle: f64) -> f64 {
    let mut wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI {
        wrapped -= 2.0 * PI;
    }
    wrapped
}

/// heading_to returns the heading (rad) pointing from `from` to `to`, or `None` if both points
/// coincide and no direction is defined.
pub fn heading_to(from: [f64; 2], to: [f64; 2]) -> Option<f64> {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];

    if dx.hypot(dy) < DIST_EPS {
        None
    } else {
        Some(dy.atan2(dx))
    }
}
