use crate::core::controls::{ControlSource, Controls};
use crate::core::race::{Race, RaceStage};
use crate::interfaces::hud_interface::{RaceSnapshot, MAX_HUD_UPDATE_FREQUENCY};
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use flume::Sender;
use helpers::general::InputValueError;
use rand::Rng;
use std::error::Error;
use std::fmt;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const MIN_TIMESTEP_SIZE: f64 = 0.001;
pub const MAX_TIMESTEP_SIZE: f64 = 0.1;

/// RaceAbortedError is returned if a race did not produce results within the maximum simulated
/// time. `standings` holds the racers that finished so far followed by everybody else without a
/// finish time.
#[derive(Debug, Clone)]
pub struct RaceAbortedError {
    pub t_race_max: f64,
    pub standings: RaceResult,
}

impl fmt::Display for RaceAbortedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Race was aborted after {:.1}s of simulated time without finishing!",
            self.t_race_max
        )
    }
}

impl Error for RaceAbortedError {}

/// handle_race creates and simulates a race on the basis of the inserted parameters, and returns
/// the results for post-processing.
///
/// * `control_source` - Polled once per tick for the player input (ignored in AI-only races)
/// * `rng` - Random number generator used to draw the AI skill levels
/// * `t_race_max` - (s) Simulated time after which the race is aborted with a
/// `RaceAbortedError`
/// * `tx` - If inserted, the race is simulated in real-time and snapshots are streamed through it
/// * `realtime_factor` - Speed-up of the real-time simulation
#[allow(clippy::too_many_arguments)]
pub fn handle_race<R: Rng + ?Sized>(
    sim_pars: &SimPars,
    timestep_size: f64,
    t_race_max: f64,
    control_source: &mut dyn ControlSource,
    rng: &mut R,
    tx: Option<&Sender<RaceSnapshot>>,
    realtime_factor: f64,
) -> anyhow::Result<RaceResult> {
    if !(MIN_TIMESTEP_SIZE..=MAX_TIMESTEP_SIZE).contains(&timestep_size) {
        return Err(InputValueError::new(format!(
            "Timestep size must be in [{}, {}], but is {}",
            MIN_TIMESTEP_SIZE, MAX_TIMESTEP_SIZE, timestep_size
        ))
        .into());
    }
    if tx.is_some() && !(realtime_factor > 0.0) {
        return Err(InputValueError::new(format!(
            "Real-time factor must be positive, but is {}",
            realtime_factor
        ))
        .into());
    }

    let track = sim_pars.load_track()?;
    let mut race = Race::new(
        &sim_pars.race_pars,
        track,
        sim_pars.sim_consts.to_owned(),
        rng,
    )
    .context("Failed to create race!")?;

    let mut t_sim = 0.0;
    let mut t_hud_update = f64::NEG_INFINITY;
    let mut t_update_print = 0.0;

    loop {
        let t_start = Instant::now();

        // poll the player input only while the race is running, the input is ignored otherwise
        let controls = match (race.get_stage(), race.get_player()) {
            (RaceStage::Running, Some(player)) => control_source.poll(player, &race.track),
            _ => Controls::default(),
        };

        race.simulate_timestep(timestep_size, &controls);
        t_sim += timestep_size;

        if race.results_ready() {
            break;
        }

        if t_sim > t_race_max {
            return Err(RaceAbortedError {
                t_race_max,
                standings: race.build_race_result(),
            }
            .into());
        }

        if race.state.clock > t_update_print + 0.9999 {
            let leader = race.racers.iter().find(|racer| racer.race_position == 1);
            debug!(
                race_time = race.state.clock,
                leader = leader.map_or("", |racer| racer.name.as_str()),
                "Simulating..."
            );
            t_update_print = race.state.clock;
        }

        // real-time case: stream snapshots and keep the simulation in sync with the wall clock
        if let Some(tx) = tx {
            if t_sim > t_hud_update + 1.0 / MAX_HUD_UPDATE_FREQUENCY - 0.001 {
                tx.send(RaceSnapshot::from_race(&race))
                    .context("Failed to send race snapshot!")?;
                t_hud_update = t_sim;
            }

            // sleep until time step is finished in real-time as well (calculation in ms)
            let t_sleep = (timestep_size * 1000.0 / realtime_factor) as i64
                - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                warn!("Could not keep up with real-time!");
            }
        }
    }

    let race_result = race.build_race_result();

    // after the loop finishes, send the snapshot with the final result once
    if let Some(tx) = tx {
        tx.send(RaceSnapshot::from_race(&race))
            .context("Failed to send final race result!")?;
    }

    info!(
        race_time = race.state.clock,
        winner = race_result
            .entries
            .first()
            .map_or("", |entry| entry.name.as_str()),
        "Results ready"
    );

    Ok(race_result)
}
