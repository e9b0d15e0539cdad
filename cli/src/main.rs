use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trolleyrace::core::controls::Autopilot;
use trolleyrace::core::handle_race::{handle_race, RaceAbortedError};
use trolleyrace::core::race::RaceStage;
use trolleyrace::interfaces::hud_interface::RaceSnapshot;
use trolleyrace::post::race_result::{format_race_time, RaceResult};
use trolleyrace::pre::read_sim_pars::{read_sim_pars, read_track_pars, SimPars};
use trolleyrace::pre::sim_opts::SimOpts;

fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// hud_line returns the one-line console HUD of a snapshot. The line follows the player, or the
/// leader in an AI-only race.
fn hud_line(snapshot: &RaceSnapshot) -> String {
    if snapshot.stage == RaceStage::Countdown {
        return format!("COUNTDOWN: {}", snapshot.countdown);
    }

    let focus = snapshot
        .get_player_state()
        .or_else(|| snapshot.get_leaderboard().first().copied());

    match focus {
        Some(state) => format!(
            "{} | {:<6} | lap {}/{} | pos {}/{} | {:3.0} km/h",
            format_race_time(snapshot.clock),
            state.name,
            state.lap,
            snapshot.tot_no_laps,
            state.race_position,
            snapshot.racer_states.len(),
            state.speed_kmh
        ),
        None => format_race_time(snapshot.clock),
    }
}

/// accept_aborted turns an aborted race into its standings so far. The AI may fail to complete a
/// lap on tight tracks, in which case the racers concerned are listed as DNF.
fn accept_aborted(res: anyhow::Result<RaceResult>) -> anyhow::Result<RaceResult> {
    match res {
        Ok(race_result) => Ok(race_result),
        Err(err) => match err.downcast_ref::<RaceAbortedError>() {
            Some(aborted) => {
                warn!("{} Printing the standings at the time of the abort", aborted);
                Ok(aborted.standings.to_owned())
            }
            None => Err(err),
        },
    }
}

fn export_results(race_result: &RaceResult, csv_path: Option<&Path>) -> anyhow::Result<()> {
    race_result.print_results();

    if let Some(csv_path) = csv_path {
        race_result.write_results_csv(csv_path)?;
        info!("Results written to {}", csv_path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if sim_opts.debug { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // get simulation parameters
    let mut sim_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        info!("Reading simulation parameters from {}", parfile_path.display());
        read_sim_pars(parfile_path)?
    } else {
        info!("No parameter file provided, using the built-in race");
        SimPars::default()
    };

    if let Some(track_id) = &sim_opts.track {
        if sim_pars.track_pars.is_some() {
            warn!("Built-in track {} replaces the custom track of the parameter file", track_id);
        }
        sim_pars.track_id = track_id.to_owned();
        sim_pars.track_pars = None;
    }
    if let Some(track_file) = &sim_opts.track_file {
        info!("Reading custom track from {}", track_file.display());
        sim_pars.track_pars = Some(read_track_pars(track_file)?);
    }
    if sim_opts.spectate {
        sim_pars.race_pars.with_player = false;
    }

    let track_pars = sim_pars.get_track_pars();
    info!(
        "Simulating {} ({} laps, {} racers) with a time step size of {:.4}s",
        track_pars.name,
        sim_pars.race_pars.tot_no_laps,
        sim_pars.race_pars.participants.len(),
        sim_opts.timestep_size
    );

    let mut autopilot = Autopilot::new(&sim_pars.sim_consts.ai);
    let mut rng = create_rng(sim_opts.seed);

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.live {
        // NON-LIVE CASE - run as fast as possible and print the results afterwards
        let t_start = Instant::now();

        let race_result = accept_aborted(handle_race(
            &sim_pars,
            sim_opts.timestep_size,
            sim_opts.t_race_max,
            &mut autopilot,
            &mut rng,
            None,
            sim_opts.realtime_factor,
        ))?;

        info!("Execution time: {}ms", t_start.elapsed().as_millis());
        export_results(&race_result, sim_opts.csv_path.as_deref())?;
    } else {
        // LIVE CASE - simulate in a separate thread and print the HUD from the streamed snapshots
        info!("Starting live simulation...");
        let (tx, rx) = flume::unbounded();

        let sim_opts_thread = sim_opts.clone();
        let sim_pars_thread = sim_pars.clone();

        let sim_thread = thread::spawn(move || {
            handle_race(
                &sim_pars_thread,
                sim_opts_thread.timestep_size,
                sim_opts_thread.t_race_max,
                &mut autopilot,
                &mut rng,
                Some(&tx),
                sim_opts_thread.realtime_factor,
            )
        });

        // print one HUD line per simulated second and whenever the stage or countdown changes
        let mut last_stage: Option<(RaceStage, u32)> = None;
        let mut t_last_print = f64::NEG_INFINITY;

        for snapshot in rx.iter() {
            let stage = Some((snapshot.stage, snapshot.countdown));
            if last_stage != stage || snapshot.clock >= t_last_print + 1.0 {
                println!("{}", hud_line(&snapshot));
                last_stage = stage;
                t_last_print = snapshot.clock;
            }
        }

        let race_result = accept_aborted(
            sim_thread
                .join()
                .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))?,
        )
        .context("Live simulation failed!")?;
        export_results(&race_result, sim_opts.csv_path.as_deref())?;
    }

    Ok(())
}
