//! Track data of the three built-in circuits. The centre-lines were traced from OpenStreetMap
//! road and path geometry and normalised to a 2000 x 2000 design square.

use crate::core::track::{StartPose, TrackPars};
use tracing::warn;

pub const DEFAULT_TRACK_ID: &str = "east_coast_park";

const DESIGN_EXTENT: f64 = 2000.0;

const EAST_COAST_PARK_CENTERLINE: [[f64; 2]; 38] = [
    [120.0, 1000.0], [180.0, 960.0], [270.0, 920.0], [400.0, 900.0],
    [540.0, 895.0], [680.0, 900.0], [800.0, 920.0], [920.0, 950.0],
    [1040.0, 990.0], [1160.0, 1020.0], [1280.0, 1040.0], [1400.0, 1050.0],
    [1520.0, 1040.0], [1640.0, 1010.0], [1760.0, 960.0], [1860.0, 900.0],
    [1920.0, 840.0], [1960.0, 780.0], [1970.0, 700.0], [1940.0, 630.0],
    [1880.0, 570.0], [1800.0, 530.0], [1700.0, 510.0], [1580.0, 520.0],
    [1460.0, 550.0], [1340.0, 580.0], [1200.0, 590.0], [1060.0, 570.0],
    [920.0, 540.0], [780.0, 530.0], [640.0, 550.0], [510.0, 590.0],
    [400.0, 640.0], [300.0, 710.0], [230.0, 790.0], [180.0, 880.0],
    [150.0, 960.0], [120.0, 1000.0],
];

const EAST_COAST_PARK_GRID: [[f64; 3]; 8] = [
    [120.0, 1020.0, 0.0], [120.0, 980.0, 0.0],
    [150.0, 1040.0, 0.0], [150.0, 960.0, 0.0],
    [180.0, 1060.0, 0.0], [180.0, 940.0, 0.0],
    [210.0, 1050.0, 0.0], [210.0, 950.0, 0.0],
];

const BISHAN_PARK_CENTERLINE: [[f64; 2]; 25] = [
    [1000.0, 200.0], [1120.0, 220.0], [1260.0, 270.0], [1380.0, 350.0],
    [1470.0, 460.0], [1530.0, 590.0], [1560.0, 730.0], [1540.0, 870.0],
    [1490.0, 1000.0], [1410.0, 1120.0], [1300.0, 1220.0], [1180.0, 1290.0],
    [1040.0, 1320.0], [900.0, 1300.0], [770.0, 1250.0], [660.0, 1160.0],
    [580.0, 1050.0], [540.0, 920.0], [530.0, 780.0], [560.0, 640.0],
    [620.0, 520.0], [710.0, 420.0], [820.0, 340.0], [940.0, 270.0],
    [1000.0, 200.0],
];

const BISHAN_PARK_GRID: [[f64; 3]; 8] = [
    [1000.0, 220.0, 90.0], [980.0, 220.0, 90.0],
    [1020.0, 240.0, 90.0], [960.0, 240.0, 90.0],
    [1040.0, 260.0, 90.0], [940.0, 260.0, 90.0],
    [1060.0, 280.0, 90.0], [920.0, 280.0, 90.0],
];

const SENTOSA_CENTERLINE: [[f64; 2]; 24] = [
    [1000.0, 300.0], [1150.0, 290.0], [1300.0, 310.0], [1440.0, 370.0],
    [1560.0, 470.0], [1640.0, 600.0], [1680.0, 750.0], [1670.0, 900.0],
    [1620.0, 1040.0], [1530.0, 1160.0], [1400.0, 1250.0], [1260.0, 1300.0],
    [1100.0, 1310.0], [950.0, 1280.0], [820.0, 1220.0], [710.0, 1130.0],
    [620.0, 1010.0], [560.0, 870.0], [520.0, 720.0], [520.0, 580.0],
    [570.0, 450.0], [670.0, 350.0], [800.0, 300.0], [1000.0, 300.0],
];

const SENTOSA_GRID: [[f64; 3]; 8] = [
    [1000.0, 310.0, 90.0], [980.0, 310.0, 90.0],
    [1020.0, 330.0, 90.0], [960.0, 330.0, 90.0],
    [1040.0, 350.0, 90.0], [940.0, 350.0, 90.0],
    [1060.0, 370.0, 90.0], [920.0, 370.0, 90.0],
];

fn build_track_pars(
    id: &str,
    name: &str,
    description: &str,
    track_width: f64,
    centerline: &[[f64; 2]],
    grid: &[[f64; 3]],
) -> TrackPars {
    TrackPars {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        centerline: centerline.to_vec(),
        track_width,
        start_poses: grid
            .iter()
            .map(|slot| StartPose {
                x: slot[0],
                y: slot[1],
                heading_deg: slot[2],
            })
            .collect(),
        design_extent: DESIGN_EXTENT,
    }
}

/// all_track_ids returns the ids of the built-in tracks in track select order.
pub fn all_track_ids() -> [&'static str; 3] {
    [DEFAULT_TRACK_ID, "bishan_park", "sentosa"]
}

fn east_coast_park() -> TrackPars {
    build_track_pars(
        "east_coast_park",
        "East Coast Park",
        "A scenic coastal dash along East Coast Park Service Road.",
        48.0,
        &EAST_COAST_PARK_CENTERLINE,
        &EAST_COAST_PARK_GRID,
    )
}

fn bishan_park() -> TrackPars {
    build_track_pars(
        "bishan_park",
        "Bishan-Ang Mo Kio Park",
        "A twisty river-valley loop through Bishan-AMK Park.",
        44.0,
        &BISHAN_PARK_CENTERLINE,
        &BISHAN_PARK_GRID,
    )
}

fn sentosa() -> TrackPars {
    build_track_pars(
        "sentosa",
        "Sentosa Circuit",
        "A high-speed island circuit weaving through Sentosa's resort roads.",
        52.0,
        &SENTOSA_CENTERLINE,
        &SENTOSA_GRID,
    )
}

/// find_track_pars returns the built-in track with the given id.
pub fn find_track_pars(track_id: &str) -> Option<TrackPars> {
    match track_id {
        "east_coast_park" => Some(east_coast_park()),
        "bishan_park" => Some(bishan_park()),
        "sentosa" => Some(sentosa()),
        _ => None,
    }
}

/// get_track_pars returns the built-in track with the given id. Unknown ids fall back to the
/// default track instead of failing the race start.
pub fn get_track_pars(track_id: &str) -> TrackPars {
    match find_track_pars(track_id) {
        Some(track_pars) => track_pars,
        None => {
            warn!(
                track_id,
                fallback = DEFAULT_TRACK_ID,
                "Unknown track id, using default track"
            );
            east_coast_park()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::{ScaledTrack, Viewport};

    #[test]
    fn all_builtin_tracks_load() {
        for track_id in all_track_ids().iter() {
            let track_pars = find_track_pars(track_id).unwrap();
            assert_eq!(track_pars.id, *track_id);
            assert_eq!(track_pars.start_poses.len(), 8);

            let track = ScaledTrack::new(&track_pars, &Viewport::default()).unwrap();

            // the raw data repeats the first waypoint as the last one
            assert_eq!(track.no_waypoints(), track_pars.centerline.len() - 1);
            assert!(track.capture_radius() >= 24.0);
        }
    }

    #[test]
    fn unknown_track_falls_back_to_default() {
        assert!(find_track_pars("changi").is_none());
        assert_eq!(get_track_pars("changi").id, DEFAULT_TRACK_ID);
        assert_eq!(get_track_pars("sentosa").id, "sentosa");
    }
}
