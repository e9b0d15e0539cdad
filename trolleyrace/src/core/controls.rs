use crate::core::racer::Racer;
use crate::core::steering::{calc_steering, AiPars};
use crate::core::track::ScaledTrack;

/// Player input of one tick. Accelerate/brake and the two turn inputs are independent of each
/// other, e.g. holding both turn inputs cancels out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub accelerate: bool,
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// ControlSource is polled once per tick for the current player input. It only gets a read-only
/// view of the player's racer and the track.
pub trait ControlSource {
    fn poll(&mut self, player: &Racer, track: &ScaledTrack) -> Controls;
}

/// NoInput never presses anything, i.e. the player trolley coasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl ControlSource for NoInput {
    fn poll(&mut self, _player: &Racer, _track: &ScaledTrack) -> Controls {
        Controls::default()
    }
}

/// Autopilot drives the player trolley with the waypoint-following policy of the AI, translated
/// into digital inputs. Heading errors within the dead band are not corrected. Unlike the AI it
/// has to respect the player physics, so it brakes into corners sharper than `corner_angle`
/// until the speed is down to `corner_speed`, otherwise it cannot get within the capture
/// radius of tight waypoints.
///
/// * `dead_band` - (rad) Heading errors up to this value are not corrected
/// * `corner_angle` - (rad) Heading errors above this value are treated as a corner
/// * `corner_speed` - (px/s) Braking for a corner stops at this speed
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub ai_pars: AiPars,
    pub dead_band: f64,
    pub corner_angle: f64,
    pub corner_speed: f64,
}

impl Autopilot {
    pub fn new(ai_pars: &AiPars) -> Autopilot {
        Autopilot {
            ai_pars: ai_pars.to_owned(),
            dead_band: 0.05,
            corner_angle: 0.8,
            corner_speed: 40.0,
        }
    }
}

impl ControlSource for Autopilot {
    fn poll(&mut self, player: &Racer, track: &ScaledTrack) -> Controls {
        let heading_err = calc_steering(
            player.kin.pos,
            player.kin.heading,
            &track.centerline,
            player.progress.get_cur_wp_idx(),
            player.progress.get_capture_radius(),
            &self.ai_pars,
        );

        let cornering =
            heading_err.abs() > self.corner_angle && player.kin.speed > self.corner_speed;

        Controls {
            accelerate: !cornering,
            brake: cornering,
            turn_left: heading_err < -self.dead_band,
            turn_right: heading_err > self.dead_band,
        }
    }
}

/// ScriptedInput replays a fixed sequence of inputs, one per poll, and coasts afterwards.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<Controls>,
    cur_step: usize,
}

impl ScriptedInput {
    pub fn new(script: Vec<Controls>) -> ScriptedInput {
        ScriptedInput { script, cur_step: 0 }
    }
}

impl ControlSource for ScriptedInput {
    fn poll(&mut self, _player: &Racer, _track: &ScaledTrack) -> Controls {
        let controls = self.script.get(self.cur_step).copied().unwrap_or_default();
        self.cur_step += 1;
        controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::racer::RacerPars;
    use crate::core::track::{StartPose, TrackPars, Viewport};

    fn track() -> ScaledTrack {
        let pars = TrackPars {
            id: "square".to_owned(),
            name: "Square".to_owned(),
            description: String::new(),
            centerline: vec![[0.0, 0.0], [500.0, 0.0], [500.0, 500.0], [0.0, 500.0]],
            track_width: 20.0,
            start_poses: vec![StartPose {
                x: 10.0,
                y: 0.0,
                heading_deg: 0.0,
            }],
            design_extent: 500.0,
        };
        ScaledTrack::new(
            &pars,
            &Viewport {
                width: 500.0,
                height: 500.0,
            },
        )
        .unwrap()
    }

    fn player(track: &ScaledTrack, heading_deg: f64, speed: f64) -> Racer {
        let racer_pars = RacerPars {
            name: "You".to_owned(),
            color: "#ffdd00".to_owned(),
        };
        let pose = StartPose {
            x: 10.0,
            y: 0.0,
            heading_deg,
        };
        let mut racer = Racer::new(0, true, &racer_pars, &pose, track, 1, 1.0).unwrap();
        racer.kin.speed = speed;
        racer
    }

    #[test]
    fn autopilot_accelerates_on_the_straight() {
        let track = track();
        let mut autopilot = Autopilot::new(&AiPars::default());

        // target waypoint (500, 0) straight ahead
        let controls = autopilot.poll(&player(&track, 0.0, 200.0), &track);
        assert!(controls.accelerate && !controls.brake);
        assert!(!controls.turn_left && !controls.turn_right);
    }

    #[test]
    fn autopilot_brakes_into_sharp_corners() {
        let track = track();
        let mut autopilot = Autopilot::new(&AiPars::default());

        // heading down the screen, the target lies 90 deg to the left
        let controls = autopilot.poll(&player(&track, 90.0, 200.0), &track);
        assert!(controls.brake && !controls.accelerate);
        assert!(controls.turn_left && !controls.turn_right);
    }

    #[test]
    fn autopilot_keeps_corner_speed() {
        let track = track();
        let mut autopilot = Autopilot::new(&AiPars::default());

        // slow enough to make the turn, i.e. no further braking
        let controls = autopilot.poll(&player(&track, 90.0, 30.0), &track);
        assert!(controls.accelerate && !controls.brake);
        assert!(controls.turn_left);
    }

    #[test]
    fn scripted_input_coasts_after_the_script() {
        let track = track();
        let racer = player(&track, 0.0, 0.0);
        let brake = Controls {
            brake: true,
            ..Controls::default()
        };
        let mut script = ScriptedInput::new(vec![brake]);

        assert_eq!(script.poll(&racer, &track), brake);
        assert_eq!(script.poll(&racer, &track), Controls::default());
    }
}
