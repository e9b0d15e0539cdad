use helpers::geometry::{dist, heading_to, wrap_angle};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Deserialize;

/// Within this multiple of the capture radius the AI steers at the look-ahead waypoint instead
/// of the current target.
pub const LOOKAHEAD_RADIUS_FACTOR: f64 = 1.5;

/// * `lookahead` - Number of waypoints beyond the current target the AI steers at when close to
/// the current target
/// * `top_speed_variance` - (-) Half width of the uniform top speed multiplier range around 1
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiPars {
    pub lookahead: usize,
    pub top_speed_variance: f64,
}

impl Default for AiPars {
    fn default() -> Self {
        AiPars {
            lookahead: 3,
            top_speed_variance: 0.12,
        }
    }
}

/// draw_top_speed_mult draws an AI racer's top speed multiplier uniformly from
/// [1 - variance, 1 + variance].
pub fn draw_top_speed_mult<R: Rng + ?Sized>(rng: &mut R, variance: f64) -> f64 {
    Uniform::new_inclusive(1.0 - variance, 1.0 + variance).sample(rng)
}

/// steering_target_idx returns the index of the waypoint the AI steers at: the current target
/// while it is still far away, otherwise the waypoint `lookahead` positions further on.
pub fn steering_target_idx(
    pos: [f64; 2],
    waypoints: &[[f64; 2]],
    cur_idx: usize,
    capture_radius: f64,
    lookahead: usize,
) -> usize {
    if dist(pos, waypoints[cur_idx]) > capture_radius * LOOKAHEAD_RADIUS_FACTOR {
        cur_idx
    } else {
        (cur_idx + lookahead) % waypoints.len()
    }
}

/// heading_error returns the shortest signed angle (rad) from the current heading to the
/// direction of the target, in (-pi, pi]. A target on top of the racer gives no error, i.e.
/// the heading is held.
pub fn heading_error(pos: [f64; 2], heading: f64, target: [f64; 2]) -> f64 {
    match heading_to(pos, target) {
        Some(desired) => wrap_angle(desired - heading),
        None => 0.0,
    }
}

/// calc_steering returns the unclamped heading change the AI wants to apply this tick.
pub fn calc_steering(
    pos: [f64; 2],
    heading: f64,
    waypoints: &[[f64; 2]],
    cur_idx: usize,
    capture_radius: f64,
    ai_pars: &AiPars,
) -> f64 {
    let target_idx = steering_target_idx(pos, waypoints, cur_idx, capture_radius, ai_pars.lookahead);
    heading_error(pos, heading, waypoints[target_idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::{FRAC_PI_2, PI};

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];

    #[test]
    fn steers_at_current_target_while_far_away() {
        assert_eq!(steering_target_idx([0.0, 0.0], &SQUARE, 1, 10.0, 3), 1);
        assert_eq!(steering_target_idx([90.0, 0.0], &SQUARE, 1, 10.0, 3), 0);
        assert_eq!(steering_target_idx([90.0, 0.0], &SQUARE, 1, 10.0, 2), 3);
    }

    #[test]
    fn heading_error_takes_shortest_way() {
        assert_abs_diff_eq!(heading_error([0.0, 0.0], 0.0, [0.0, 10.0]), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(
            heading_error([0.0, 0.0], 0.75 * PI, [-10.0, -10.0]),
            FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            heading_error([0.0, 0.0], -0.75 * PI, [-10.0, 10.0]),
            -FRAC_PI_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn coincident_target_holds_heading() {
        let err = heading_error([100.0, 0.0], 1.0, [100.0, 0.0]);
        assert!(!err.is_nan());
        assert_abs_diff_eq!(err, 0.0);
    }

    #[test]
    fn calc_steering_uses_lookahead_near_target() {
        let ai_pars = AiPars {
            lookahead: 1,
            top_speed_variance: 0.0,
        };
        let delta = calc_steering([95.0, 0.0], 0.0, &SQUARE, 1, 10.0, &ai_pars);
        assert_abs_diff_eq!(delta, (100.0f64).atan2(5.0), epsilon = 1e-12);
    }

    #[test]
    fn top_speed_mult_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let mult = draw_top_speed_mult(&mut rng, 0.12);
            assert!(mult >= 0.88 - 1e-12 && mult <= 1.12 + 1e-12);
        }
        assert_abs_diff_eq!(draw_top_speed_mult(&mut rng, 0.0), 1.0);
    }
}
