use crate::core::race::{RacePars, SimConstants};
use crate::core::track::{ScaledTrack, TrackPars, Viewport};
use crate::pre::builtin_tracks::{get_track_pars, DEFAULT_TRACK_ID};
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

fn default_track_id() -> String {
    DEFAULT_TRACK_ID.to_owned()
}

/// SimPars is used to store all other parameter structs. Every part has defaults, i.e. a
/// parameter file only has to contain the values that differ from the built-in race.
///
/// * `track_id` - Id of the built-in track to race on
/// * `track_pars` - Custom track, replaces the built-in track selected by `track_id`
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    #[serde(default)]
    pub race_pars: RacePars,
    #[serde(default)]
    pub sim_consts: SimConstants,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_track_id")]
    pub track_id: String,
    #[serde(default)]
    pub track_pars: Option<TrackPars>,
}

impl Default for SimPars {
    fn default() -> Self {
        SimPars {
            race_pars: RacePars::default(),
            sim_consts: SimConstants::default(),
            viewport: Viewport::default(),
            track_id: default_track_id(),
            track_pars: None,
        }
    }
}

impl SimPars {
    /// get_track_pars returns the custom track if one was set, otherwise the selected built-in
    /// track.
    pub fn get_track_pars(&self) -> TrackPars {
        match &self.track_pars {
            Some(track_pars) => track_pars.to_owned(),
            None => get_track_pars(&self.track_id),
        }
    }

    /// load_track scales the selected track into the configured viewport.
    pub fn load_track(&self) -> anyhow::Result<ScaledTrack> {
        let track_pars = self.get_track_pars();
        ScaledTrack::new(&track_pars, &self.viewport)
            .context(format!("Failed to load track {}!", track_pars.id))
    }
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

/// read_track_pars reads a custom track from a JSON file.
pub fn read_track_pars(filepath: &Path) -> anyhow::Result<TrackPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open track file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse track file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn partial_parameter_file_uses_defaults() {
        let json = r#"{
            "race_pars": { "tot_no_laps": 5, "with_player": false },
            "sim_consts": { "trolley": { "max_speed": 250.0 } },
            "track_id": "sentosa"
        }"#;
        let sim_pars: SimPars = serde_json::from_str(json).unwrap();

        assert_eq!(sim_pars.race_pars.tot_no_laps, 5);
        assert!(!sim_pars.race_pars.with_player);
        assert_eq!(sim_pars.race_pars.countdown, 3);
        assert_eq!(sim_pars.race_pars.participants.len(), 8);
        assert_abs_diff_eq!(sim_pars.sim_consts.trolley.max_speed, 250.0);
        assert_abs_diff_eq!(sim_pars.sim_consts.trolley.acceleration, 180.0);
        assert_eq!(sim_pars.sim_consts.ai.lookahead, 3);
        assert_abs_diff_eq!(sim_pars.viewport.width, 1024.0);
        assert_eq!(sim_pars.get_track_pars().id, "sentosa");
    }

    #[test]
    fn empty_parameter_file_is_the_default_race() {
        let sim_pars: SimPars = serde_json::from_str("{}").unwrap();
        assert_eq!(sim_pars.track_id, DEFAULT_TRACK_ID);
        assert!(sim_pars.track_pars.is_none());
        assert!(sim_pars.load_track().is_ok());
    }

    #[test]
    fn custom_track_replaces_builtin_track() {
        let json = r#"{
            "track_pars": {
                "id": "triangle",
                "name": "Triangle",
                "centerline": [[0.0, 0.0], [100.0, 0.0], [50.0, 80.0]],
                "track_width": 10.0,
                "start_poses": [{ "x": 0.0, "y": 0.0, "heading_deg": 0.0 }],
                "design_extent": 100.0
            }
        }"#;
        let sim_pars: SimPars = serde_json::from_str(json).unwrap();
        let track = sim_pars.load_track().unwrap();

        assert_eq!(track.id, "triangle");
        assert_eq!(track.no_waypoints(), 3);
        assert_eq!(track.description, "");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_sim_pars(Path::new("does/not/exist.json")).is_err());
        assert!(read_track_pars(Path::new("does/not/exist.json")).is_err());
    }
}
