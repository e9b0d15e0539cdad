use crate::core::controls::Controls;
use crate::core::kinematics::Kinematics;
use crate::core::progress::{AdvanceOutcome, ProgressTracker};
use crate::core::race::SimConstants;
use crate::core::steering::calc_steering;
use crate::core::track::{ScaledTrack, StartPose};
use crate::interfaces::hud_interface::RgbColor;
use anyhow::Context;
use serde::Deserialize;

/// * `name` - Name shown on the HUD and in the results table
/// * `color` - Trolley colour as CSS colour string, e.g. #ffdd00
#[derive(Debug, Deserialize, Clone)]
pub struct RacerPars {
    pub name: String,
    pub color: String,
}

/// Racer is one trolley of a race. Whether it is controlled by the player or by the AI is a
/// runtime flag, both use the same record and update function.
#[derive(Debug, Clone)]
pub struct Racer {
    pub idx: usize,
    pub is_player: bool,
    pub name: String,
    pub color: RgbColor,
    pub kin: Kinematics,
    pub progress: ProgressTracker,
    pub race_position: usize,
    pub top_speed_mult: f64,
}

impl Racer {
    pub fn new(
        idx: usize,
        is_player: bool,
        racer_pars: &RacerPars,
        start_pose: &StartPose,
        track: &ScaledTrack,
        tot_no_laps: u32,
        top_speed_mult: f64,
    ) -> anyhow::Result<Racer> {
        let tmp_color = racer_pars
            .color
            .parse::<css_color_parser::Color>()
            .context(format!(
                "Could not parse colour {} of racer {}!",
                racer_pars.color, racer_pars.name
            ))?;

        let kin = Kinematics::new(start_pose);
        let progress = ProgressTracker::from_start_pos(track, kin.pos, tot_no_laps);

        Ok(Racer {
            idx,
            is_player,
            name: racer_pars.name.to_owned(),
            color: RgbColor {
                r: tmp_color.r,
                g: tmp_color.g,
                b: tmp_color.b,
            },
            kin,
            progress,
            race_position: idx + 1,
            top_speed_mult,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }
}

/// update_racer advances a racer by one tick: player racers follow the given controls, AI
/// racers steer along the waypoints. Afterwards the position is integrated and the waypoint
/// progress is updated. Finished racers are not simulated any more.
pub fn update_racer(
    racer: &mut Racer,
    controls: &Controls,
    track: &ScaledTrack,
    sim_consts: &SimConstants,
    dt: f64,
    race_time: f64,
) -> AdvanceOutcome {
    if racer.is_finished() {
        return AdvanceOutcome::default();
    }

    if racer.is_player {
        racer.kin.apply_controls(controls, &sim_consts.trolley, dt);
    } else {
        let heading_delta = calc_steering(
            racer.kin.pos,
            racer.kin.heading,
            &track.centerline,
            racer.progress.get_cur_wp_idx(),
            racer.progress.get_capture_radius(),
            &sim_consts.ai,
        );
        racer
            .kin
            .apply_steering(heading_delta, racer.top_speed_mult, &sim_consts.trolley, dt);
    }

    racer.kin.integrate(dt);

    racer.progress.advance(racer.kin.pos, &track.centerline, race_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::{TrackPars, Viewport};
    use approx::assert_abs_diff_eq;

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

    fn racer(is_player: bool, track: &ScaledTrack) -> Racer {
        let racer_pars = RacerPars {
            name: "Mei".to_owned(),
            color: "#44aaff".to_owned(),
        };
        Racer::new(1, is_player, &racer_pars, &track.start_poses[0], track, 3, 1.0).unwrap()
    }

    #[test]
    fn new_racer_targets_waypoint_after_nearest() {
        let track = track();
        let racer = racer(false, &track);

        assert_eq!(racer.progress.get_cur_wp_idx(), 1);
        assert_eq!(racer.race_position, 2);
        assert_eq!(racer.color.r, 0x44);
        assert_eq!(racer.color.g, 0xaa);
        assert_eq!(racer.color.b, 0xff);
    }

    #[test]
    fn invalid_colour_is_rejected() {
        let track = track();
        let racer_pars = RacerPars {
            name: "Raj".to_owned(),
            color: "not a colour".to_owned(),
        };
        assert!(Racer::new(0, false, &racer_pars, &track.start_poses[0], &track, 3, 1.0).is_err());
    }

    #[test]
    fn ai_racer_accelerates_and_moves_forward() {
        let track = track();
        let mut racer = racer(false, &track);
        let sim_consts = SimConstants::default();

        update_racer(&mut racer, &Controls::default(), &track, &sim_consts, 0.1, 0.1);

        assert_abs_diff_eq!(racer.kin.speed, 18.0, epsilon = 1e-9);
        assert_abs_diff_eq!(racer.kin.pos[0], 11.8, epsilon = 1e-9);
        assert_abs_diff_eq!(racer.kin.pos[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn player_racer_follows_controls() {
        let track = track();
        let mut racer = racer(true, &track);
        let sim_consts = SimConstants::default();

        update_racer(&mut racer, &Controls::default(), &track, &sim_consts, 0.1, 0.1);
        assert_abs_diff_eq!(racer.kin.speed, 0.0);

        let controls = Controls {
            accelerate: true,
            ..Controls::default()
        };
        update_racer(&mut racer, &controls, &track, &sim_consts, 0.1, 0.2);
        assert_abs_diff_eq!(racer.kin.speed, 18.0, epsilon = 1e-9);
    }
}
