use anyhow::Context;
use helpers::general::{argmin, InputValueError};
use helpers::geometry::dist;
use serde::{Deserialize, Serialize};

/// Minimum waypoint capture radius in viewport units.
pub const MIN_CAPTURE_RADIUS: f64 = 24.0;

/// Capture radius as a fraction of the (scaled) track width.
pub const CAPTURE_RADIUS_WIDTH_FRAC: f64 = 0.65;

/// * `x` - x coordinate of the grid slot
/// * `y` - y coordinate of the grid slot
/// * `heading_deg` - (deg) Initial heading, 0 points along +x, 90 along +y (screen down)
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct StartPose {
    pub x: f64,
    pub y: f64,
    pub heading_deg: f64,
}

/// * `id` - Track id used for selection, e.g. east_coast_park
/// * `name` - Display name
/// * `description` - Short description for the track select screen
/// * `centerline` - Closed centre-line polyline in design space (the closing segment from the
/// last back to the first point is implicit, a repeated first point at the end is allowed)
/// * `track_width` - Track width in design space
/// * `start_poses` - Grid slots in design space, one per racer
/// * `design_extent` - Side length of the square design space the geometry is authored in
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackPars {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub centerline: Vec<[f64; 2]>,
    pub track_width: f64,
    pub start_poses: Vec<StartPose>,
    pub design_extent: f64,
}

/// * `width` - Viewport width
/// * `height` - Viewport height
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1024.0,
            height: 576.0,
        }
    }
}

/// ScaledTrack is a track whose geometry was mapped from design space into viewport space. It
/// is derived from the `TrackPars` and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledTrack {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scale: f64,
    pub offset: [f64; 2],
    pub centerline: Vec<[f64; 2]>,
    pub track_width: f64,
    pub start_poses: Vec<StartPose>,
}

fn check_positive(val: f64, what: &str) -> Result<(), InputValueError> {
    if val.is_finite() && val > 0.0 {
        Ok(())
    } else {
        Err(InputValueError::new(format!(
            "{} must be finite and positive, but is {}",
            what, val
        )))
    }
}

impl ScaledTrack {
    /// new scales the track geometry uniformly into the viewport and centres the design square
    /// in it. A closing point that duplicates the first one is dropped such that the number of
    /// waypoints equals the number of waypoints of one lap.
    pub fn new(track_pars: &TrackPars, viewport: &Viewport) -> anyhow::Result<ScaledTrack> {
        check_positive(viewport.width, "Viewport width")?;
        check_positive(viewport.height, "Viewport height")?;
        check_positive(track_pars.design_extent, "Design extent")
            .context(format!("Invalid geometry of track {}!", track_pars.id))?;

        if !(track_pars.track_width.is_finite() && track_pars.track_width >= 0.0) {
            return Err(InputValueError::new(format!(
                "Track width must be finite and non-negative, but is {}",
                track_pars.track_width
            )))
            .context(format!("Invalid geometry of track {}!", track_pars.id));
        }

        let scale = viewport.width.min(viewport.height) / track_pars.design_extent;
        let offset = [
            (viewport.width - track_pars.design_extent * scale) / 2.0,
            (viewport.height - track_pars.design_extent * scale) / 2.0,
        ];
        let scale_point = |x: f64, y: f64| [x * scale + offset[0], y * scale + offset[1]];

        let mut centerline: Vec<[f64; 2]> = track_pars
            .centerline
            .iter()
            .map(|p| scale_point(p[0], p[1]))
            .collect();

        if centerline.len() > 1 && centerline.first() == centerline.last() {
            centerline.pop();
        }

        if centerline.len() < 3 {
            return Err(InputValueError::new(format!(
                "Centre-line requires at least 3 distinct waypoints, but has {}",
                centerline.len()
            )))
            .context(format!("Invalid geometry of track {}!", track_pars.id));
        }

        let start_poses = track_pars
            .start_poses
            .iter()
            .map(|pose| {
                let [x, y] = scale_point(pose.x, pose.y);
                StartPose {
                    x,
                    y,
                    heading_deg: pose.heading_deg,
                }
            })
            .collect();

        let track = ScaledTrack {
            id: track_pars.id.to_owned(),
            name: track_pars.name.to_owned(),
            description: track_pars.description.to_owned(),
            scale,
            offset,
            centerline,
            track_width: track_pars.track_width * scale,
            start_poses,
        };

        if !(track.length() > 0.0) {
            return Err(InputValueError::new("Centre-line has zero length"))
                .context(format!("Invalid geometry of track {}!", track_pars.id));
        }

        Ok(track)
    }

    /// Number of waypoints of one lap.
    pub fn no_waypoints(&self) -> usize {
        self.centerline.len()
    }

    /// Length of the closed centre-line including the implicit closing segment.
    pub fn length(&self) -> f64 {
        let n = self.centerline.len();
        (0..n)
            .map(|i| dist(self.centerline[i], self.centerline[(i + 1) % n]))
            .sum()
    }

    /// Distance threshold within which a racer has reached its target waypoint. Wider tracks
    /// give a more forgiving corridor.
    pub fn capture_radius(&self) -> f64 {
        MIN_CAPTURE_RADIUS.max(self.track_width * CAPTURE_RADIUS_WIDTH_FRAC)
    }

    /// nearest_waypoint_idx returns the index of the waypoint closest to the given position.
    pub fn nearest_waypoint_idx(&self, pos: [f64; 2]) -> usize {
        let dists: Vec<f64> = self.centerline.iter().map(|&wp| dist(pos, wp)).collect();
        argmin(&dists).unwrap_or(0)
    }
}
