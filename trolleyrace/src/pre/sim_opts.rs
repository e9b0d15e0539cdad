use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "trolleyrace",
    about = "Headless runner for the trolley race simulation"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Let the AI drive all trolleys (no player)
    #[clap(short, long)]
    pub spectate: bool,

    /// Stream live HUD updates and simulate in real-time
    #[clap(short, long)]
    pub live: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the simulation parameter file (OPTIONAL: if not set, the built-in race is used)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set path to a custom track file, replaces the track of the parameter file
    #[clap(long)]
    pub track_file: Option<PathBuf>,

    /// Select a built-in track by id (east_coast_park, bishan_park, sentosa)
    #[clap(long)]
    pub track: Option<String>,

    /// Set seed for the AI skill draw, a random seed is used if not set
    #[clap(long)]
    pub seed: Option<u64>,

    /// Set real-time factor (only relevant in live mode)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 0.1]
    #[clap(short, long, default_value = "0.016666666666666666")]
    pub timestep_size: f64,

    /// Set maximum simulated time in seconds before the race is aborted
    #[clap(long, default_value = "900.0")]
    pub t_race_max: f64,

    /// Set path of a CSV file the results are written to
    #[clap(long)]
    pub csv_path: Option<PathBuf>,
}
