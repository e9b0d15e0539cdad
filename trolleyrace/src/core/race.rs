use crate::core::controls::Controls;
use crate::core::kinematics::TrolleyPars;
use crate::core::racer::{update_racer, Racer, RacerPars};
use crate::core::steering::{draw_top_speed_mult, AiPars};
use crate::core::track::ScaledTrack;
use crate::post::race_result::{RaceResult, ResultEntry};
use anyhow::Context;
use helpers::general::{argsort, InputValueError, SortOrder};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

/// * `tot_no_laps` - Total number of laps
/// * `countdown` - (s) Countdown before the start, decremented once per second
/// * `t_finish_delay` - (s) Delay between the end of the race and the availability of the
/// results
/// * `with_player` - True if the first participant is controlled by the player, false for an
/// AI-only race
/// * `participants` - Racers in grid order
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RacePars {
    pub tot_no_laps: u32,
    pub countdown: u32,
    pub t_finish_delay: f64,
    pub with_player: bool,
    pub participants: Vec<RacerPars>,
}

impl Default for RacePars {
    fn default() -> Self {
        let roster = [
            ("You", "#ffdd00"),
            ("Ali", "#ff4444"),
            ("Mei", "#44aaff"),
            ("Kumar", "#44ff88"),
            ("Siti", "#ff8844"),
            ("Raj", "#cc44ff"),
            ("Bao", "#ff44cc"),
            ("Rani", "#44ffee"),
        ];

        RacePars {
            tot_no_laps: 3,
            countdown: 3,
            t_finish_delay: 2.0,
            with_player: true,
            participants: roster
                .iter()
                .map(|&(name, color)| RacerPars {
                    name: name.to_owned(),
                    color: color.to_owned(),
                })
                .collect(),
        }
    }
}

/// Physics and AI constants shared by all racers.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SimConstants {
    pub trolley: TrolleyPars,
    pub ai: AiPars,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceStage {
    Countdown,
    Running,
    Finished,
}

/// RaceState contains the race clock, the countdown and the finish bookkeeping. `finish_order`
/// holds racer indices in the order the racers finished, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct RaceState {
    pub clock: f64,
    pub countdown: u32,
    pub started: bool,
    pub finished: bool,
    pub finish_order: Vec<usize>,
    t_countdown: f64,
    t_since_finish: f64,
}

impl RaceState {
    fn new(countdown: u32) -> RaceState {
        RaceState {
            countdown,
            started: countdown == 0,
            ..RaceState::default()
        }
    }
}

#[derive(Debug)]
pub struct Race {
    pub track: ScaledTrack,
    pub sim_consts: SimConstants,
    pub racers: Vec<Racer>,
    pub state: RaceState,
    pub tot_no_laps: u32,
    t_finish_delay: f64,
    player_idx: Option<usize>,
}

impl Race {
    pub fn new<R: Rng + ?Sized>(
        race_pars: &RacePars,
        track: ScaledTrack,
        sim_consts: SimConstants,
        rng: &mut R,
    ) -> anyhow::Result<Race> {
        let no_racers = race_pars.participants.len();

        if no_racers == 0 {
            return Err(InputValueError::new("Race requires at least one participant").into());
        }
        if race_pars.tot_no_laps == 0 {
            return Err(InputValueError::new("Race requires at least one lap").into());
        }
        if !(race_pars.t_finish_delay >= 0.0) {
            return Err(InputValueError::new(format!(
                "Finish delay must be non-negative, but is {}",
                race_pars.t_finish_delay
            ))
            .into());
        }
        if !(0.0..1.0).contains(&sim_consts.ai.top_speed_variance) {
            return Err(InputValueError::new(format!(
                "Top speed variance must be in [0.0, 1.0[, but is {}",
                sim_consts.ai.top_speed_variance
            ))
            .into());
        }
        if track.start_poses.len() < no_racers {
            return Err(InputValueError::new(format!(
                "Track {} has {} start poses for {} racers",
                track.id,
                track.start_poses.len(),
                no_racers
            ))
            .into());
        }

        // create racers, the player (if any) is the first participant
        let mut racers = Vec::with_capacity(no_racers);

        for (idx, racer_pars) in race_pars.participants.iter().enumerate() {
            let is_player = race_pars.with_player && idx == 0;
            let top_speed_mult = if is_player {
                1.0
            } else {
                draw_top_speed_mult(rng, sim_consts.ai.top_speed_variance)
            };

            racers.push(
                Racer::new(
                    idx,
                    is_player,
                    racer_pars,
                    &track.start_poses[idx],
                    &track,
                    race_pars.tot_no_laps,
                    top_speed_mult,
                )
                .context(format!("Failed to create racer {}!", idx))?,
            );
            debug!(
                racer = %racer_pars.name,
                top_speed_mult,
                first_wp = racers[idx].progress.get_cur_wp_idx(),
                "Racer created"
            );
        }

        info!(
            track = %track.name,
            no_racers,
            tot_no_laps = race_pars.tot_no_laps,
            "Race created"
        );

        Ok(Race {
            track,
            sim_consts,
            racers,
            state: RaceState::new(race_pars.countdown),
            tot_no_laps: race_pars.tot_no_laps,
            t_finish_delay: race_pars.t_finish_delay,
            player_idx: if race_pars.with_player { Some(0) } else { None },
        })
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// simulate_timestep advances the race by one tick of `dt` seconds. `controls` is only used
    /// for the player racer.
    pub fn simulate_timestep(&mut self, dt: f64, controls: &Controls) {
        match self.get_stage() {
            RaceStage::Countdown => self.handle_countdown(dt),
            RaceStage::Running => {
                self.state.clock += dt;
                self.update_racers(dt, controls);
                self.update_standings();
            }
            RaceStage::Finished => self.state.t_since_finish += dt,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // RACE SIMULATOR PARTS ------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// Racers stay on the grid during the countdown. The tick that completes the countdown does
    /// not move them either.
    fn handle_countdown(&mut self, dt: f64) {
        self.state.t_countdown += dt;

        while self.state.t_countdown >= 1.0 && self.state.countdown > 0 {
            self.state.t_countdown -= 1.0;
            self.state.countdown -= 1;

            if self.state.countdown > 0 {
                info!(countdown = self.state.countdown, "Countdown");
            }
        }

        if self.state.countdown == 0 {
            self.state.started = true;
            info!("Race started");
        }
    }

    fn update_racers(&mut self, dt: f64, controls: &Controls) {
        let race_time = self.state.clock;

        for racer in self.racers.iter_mut() {
            let outcome = update_racer(racer, controls, &self.track, &self.sim_consts, dt, race_time);

            if outcome.no_laps_compl > 0 {
                debug!(
                    racer = %racer.name,
                    compl_laps = racer.progress.get_compl_laps(),
                    race_time,
                    "Lap completed"
                );
            }
            if outcome.finished_now {
                info!(racer = %racer.name, race_time, "Racer finished");
            }
        }
    }

    /// update_standings ranks the racers by their progress, appends newly finished racers to
    /// the finish order and checks whether the race is over. It must run after all racers were
    /// updated in the current tick.
    fn update_standings(&mut self) {
        let race_progs: Vec<u64> = self
            .racers
            .iter()
            .map(|racer| racer.progress.get_race_prog())
            .collect();

        for (rank, &idx) in argsort(&race_progs, SortOrder::Descending).iter().enumerate() {
            self.racers[idx].race_position = rank + 1;
        }

        for racer in self.racers.iter() {
            if racer.is_finished() && !self.state.finish_order.contains(&racer.idx) {
                self.state.finish_order.push(racer.idx);
            }
        }

        let player_finished = self
            .get_player()
            .map_or(false, |player| player.is_finished());
        let all_finished = self.state.finish_order.len() == self.racers.len();

        if player_finished || all_finished {
            self.state.finished = true;
            info!(
                race_time = self.state.clock,
                no_finished = self.state.finish_order.len(),
                "Race finished"
            );
        }
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn get_stage(&self) -> RaceStage {
        if self.state.finished {
            RaceStage::Finished
        } else if self.state.started {
            RaceStage::Running
        } else {
            RaceStage::Countdown
        }
    }

    pub fn get_player(&self) -> Option<&Racer> {
        self.player_idx.map(|idx| &self.racers[idx])
    }

    /// The results become available once the finish delay has elapsed after the race end.
    pub fn results_ready(&self) -> bool {
        self.state.finished && self.state.t_since_finish >= self.t_finish_delay
    }

    /// get_race_result returns the final results as soon as they are ready.
    pub fn get_race_result(&self) -> Option<RaceResult> {
        if self.results_ready() {
            Some(self.build_race_result())
        } else {
            None
        }
    }

    /// build_race_result ranks the finishers in finish order followed by all racers that did
    /// not finish (without finish time).
    pub fn build_race_result(&self) -> RaceResult {
        let mut entries: Vec<ResultEntry> = Vec::with_capacity(self.racers.len());

        let dnf_idxs = self
            .racers
            .iter()
            .filter(|racer| !self.state.finish_order.contains(&racer.idx))
            .map(|racer| racer.idx);

        for idx in self.state.finish_order.iter().copied().chain(dnf_idxs) {
            let racer = &self.racers[idx];
            entries.push(ResultEntry {
                position: entries.len() + 1,
                name: racer.name.to_owned(),
                is_player: racer.is_player,
                finish_time: racer.progress.get_finish_time(),
            });
        }

        RaceResult {
            track_id: self.track.id.to_owned(),
            track_name: self.track.name.to_owned(),
            tot_no_laps: self.tot_no_laps,
            entries,
        }
    }
}
