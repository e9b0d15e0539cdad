use crate::core::controls::Controls;
use crate::core::track::StartPose;
use serde::Deserialize;

/// * `max_speed` - (px/s) Top speed of a trolley with a top speed multiplier of 1
/// * `acceleration` - (px/s²) Speed gain per second while accelerating
/// * `braking_force` - (px/s²) Speed loss per second while braking
/// * `turn_rate` - (rad/s) Heading change per second, independent of the speed
/// * `friction` - (-) Speed multiplier applied once per tick while coasting, must be < 1
/// * `min_turn_speed` - (px/s) Player steering only has an effect above this speed
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrolleyPars {
    pub max_speed: f64,
    pub acceleration: f64,
    pub braking_force: f64,
    pub turn_rate: f64,
    pub friction: f64,
    pub min_turn_speed: f64,
}

impl Default for TrolleyPars {
    fn default() -> Self {
        TrolleyPars {
            max_speed: 220.0,
            acceleration: 180.0,
            braking_force: 320.0,
            turn_rate: 2.8,
            friction: 0.96,
            min_turn_speed: 5.0,
        }
    }
}

/// Kinematic state of a single trolley. `heading` is in radians with 0 along +x and positive
/// angles turning clockwise on screen (y axis points down).
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    pub pos: [f64; 2],
    pub heading: f64,
    pub speed: f64,
}

impl Kinematics {
    pub fn new(start_pose: &StartPose) -> Kinematics {
        Kinematics {
            pos: [start_pose.x, start_pose.y],
            heading: start_pose.heading_deg.to_radians(),
            speed: 0.0,
        }
    }

    /// apply_controls updates speed and heading from the player's inputs. Accelerating takes
    /// precedence over braking, coasting decays the speed by the friction factor per tick.
    pub fn apply_controls(&mut self, controls: &Controls, trolley_pars: &TrolleyPars, dt: f64) {
        if controls.accelerate {
            self.speed = (self.speed + trolley_pars.acceleration * dt).min(trolley_pars.max_speed);
        } else if controls.brake {
            self.speed = (self.speed - trolley_pars.braking_force * dt).max(0.0);
        } else {
            self.speed *= trolley_pars.friction;
        }

        if self.speed > trolley_pars.min_turn_speed {
            let turn = trolley_pars.turn_rate * dt;
            if controls.turn_left {
                self.heading -= turn;
            }
            if controls.turn_right {
                self.heading += turn;
            }
        }
    }

    /// apply_steering accelerates towards the racer's own top speed and rotates by the given
    /// heading delta. The delta is clamped to the maximum turn of this tick.
    pub fn apply_steering(
        &mut self,
        heading_delta: f64,
        top_speed_mult: f64,
        trolley_pars: &TrolleyPars,
        dt: f64,
    ) {
        let max_turn = trolley_pars.turn_rate * dt;
        self.heading += heading_delta.max(-max_turn).min(max_turn);

        let speed_max = trolley_pars.max_speed * top_speed_mult;
        self.speed = (self.speed + trolley_pars.acceleration * dt).min(speed_max);
    }

    /// integrate moves the trolley forward along its heading.
    pub fn integrate(&mut self, dt: f64) {
        self.pos[0] += self.heading.cos() * self.speed * dt;
        self.pos[1] += self.heading.sin() * self.speed * dt;
    }
}
