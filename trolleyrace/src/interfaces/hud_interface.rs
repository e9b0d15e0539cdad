use crate::core::race::{Race, RaceStage};
use crate::post::race_result::RaceResult;

pub const MAX_HUD_UPDATE_FREQUENCY: f64 = 20.0;

/// Conversion factor from px/s to the km/h shown on the HUD.
pub const KMH_PER_PX_S: f64 = 0.18;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Default)]
pub struct RacerState {
    pub idx: usize,
    pub name: String,
    pub is_player: bool,
    pub color: RgbColor,
    pub pos: [f64; 2],
    pub heading: f64,
    pub speed_kmh: f64,
    pub lap: u32,
    pub race_position: usize,
    pub finished: bool,
}

/// RaceSnapshot is everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct RaceSnapshot {
    pub stage: RaceStage,
    pub countdown: u32,
    pub clock: f64,
    pub tot_no_laps: u32,
    pub racer_states: Vec<RacerState>,

    // final results payload (sent once when the results are ready)
    pub final_result: Option<RaceResult>,
}

impl RaceSnapshot {
    pub fn from_race(race: &Race) -> RaceSnapshot {
        let racer_states = race
            .racers
            .iter()
            .map(|racer| RacerState {
                idx: racer.idx,
                name: racer.name.to_owned(),
                is_player: racer.is_player,
                color: racer.color,
                pos: racer.kin.pos,
                heading: racer.kin.heading,
                speed_kmh: (racer.kin.speed * KMH_PER_PX_S).round(),
                lap: (racer.progress.get_compl_laps() + 1).min(race.tot_no_laps),
                race_position: racer.race_position,
                finished: racer.is_finished(),
            })
            .collect();

        RaceSnapshot {
            stage: race.get_stage(),
            countdown: race.state.countdown,
            clock: race.state.clock,
            tot_no_laps: race.tot_no_laps,
            racer_states,
            final_result: race.get_race_result(),
        }
    }

    pub fn get_player_state(&self) -> Option<&RacerState> {
        self.racer_states.iter().find(|state| state.is_player)
    }

    /// get_leaderboard returns the racer states sorted by race position.
    pub fn get_leaderboard(&self) -> Vec<&RacerState> {
        let mut leaderboard: Vec<&RacerState> = self.racer_states.iter().collect();
        leaderboard.sort_by_key(|state| state.race_position);
        leaderboard
    }
}
