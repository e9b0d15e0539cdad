use crate::core::track::ScaledTrack;
use helpers::geometry::dist;

/// AdvanceOutcome summarizes what happened during one call of `ProgressTracker::advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdvanceOutcome {
    pub no_wps_passed: usize,
    pub no_laps_compl: u32,
    pub finished_now: bool,
}

/// ProgressTracker keeps track of a racer's progress along the closed waypoint polyline: the
/// next unclaimed waypoint, the completed laps, and whether (and when) the racer finished.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    // parameters
    no_wps: usize,
    capture_radius: f64,
    tot_no_laps: u32,

    // progress
    cur_wp_idx: usize,
    compl_laps: u32,
    finished: bool,
    finish_time: Option<f64>,
}

impl ProgressTracker {
    pub fn new(
        start_wp_idx: usize,
        no_wps: usize,
        capture_radius: f64,
        tot_no_laps: u32,
    ) -> ProgressTracker {
        ProgressTracker {
            no_wps,
            capture_radius,
            tot_no_laps,
            cur_wp_idx: start_wp_idx % no_wps,
            compl_laps: 0,
            finished: false,
            finish_time: None,
        }
    }

    /// from_start_pos creates a tracker whose first target is the waypoint after the one
    /// nearest to the start position, i.e. the racer does not target the point it stands on.
    pub fn from_start_pos(track: &ScaledTrack, start_pos: [f64; 2], tot_no_laps: u32) -> ProgressTracker {
        let no_wps = track.no_waypoints();
        ProgressTracker::new(
            (track.nearest_waypoint_idx(start_pos) + 1) % no_wps,
            no_wps,
            track.capture_radius(),
            tot_no_laps,
        )
    }

    /// advance claims every waypoint the racer is within the capture radius of, one after the
    /// other. At most one lap worth of waypoints is claimed per call. When the final lap is
    /// completed the racer is marked as finished at `race_time` and no further waypoints are
    /// claimed.
    pub fn advance(&mut self, pos: [f64; 2], waypoints: &[[f64; 2]], race_time: f64) -> AdvanceOutcome {
        let mut outcome = AdvanceOutcome::default();

        if self.finished {
            return outcome;
        }

        for _ in 0..self.no_wps {
            if dist(pos, waypoints[self.cur_wp_idx]) > self.capture_radius {
                break;
            }

            self.cur_wp_idx = (self.cur_wp_idx + 1) % self.no_wps;
            outcome.no_wps_passed += 1;

            // wrapped around -> lap completed
            if self.cur_wp_idx == 0 {
                self.compl_laps += 1;
                outcome.no_laps_compl += 1;

                if self.compl_laps >= self.tot_no_laps {
                    self.finished = true;
                    self.finish_time = Some(race_time);
                    outcome.finished_now = true;
                    break;
                }
            }
        }

        outcome
    }

    /// get_race_prog returns the progress metric used for ranking: completed laps times the
    /// number of waypoints plus the index of the current target waypoint.
    pub fn get_race_prog(&self) -> u64 {
        self.compl_laps as u64 * self.no_wps as u64 + self.cur_wp_idx as u64
    }

    pub fn get_cur_wp_idx(&self) -> usize {
        self.cur_wp_idx
    }

    pub fn get_compl_laps(&self) -> u32 {
        self.compl_laps
    }

    pub fn get_tot_no_laps(&self) -> u32 {
        self.tot_no_laps
    }

    pub fn get_capture_radius(&self) -> f64 {
        self.capture_radius
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn get_finish_time(&self) -> Option<f64> {
        self.finish_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]];

    #[test]
    fn racer_on_waypoint_claims_it() {
        let mut tracker = ProgressTracker::new(2, 4, 10.0, 3);
        let outcome = tracker.advance([100.0, 100.0], &SQUARE, 0.5);

        assert_eq!(outcome.no_wps_passed, 1);
        assert_eq!(tracker.get_cur_wp_idx(), 3);
    }

    #[test]
    fn single_lap_race_finishes_on_wrap() {
        let mut tracker = ProgressTracker::new(1, 4, 10.0, 1);

        tracker.advance([0.0, 0.0], &SQUARE, 0.1);
        assert_eq!(tracker.get_cur_wp_idx(), 1);

        tracker.advance([95.0, 3.0], &SQUARE, 1.0);
        tracker.advance([104.0, 97.0], &SQUARE, 2.0);
        assert!(!tracker.is_finished());

        let outcome = tracker.advance([2.0, 99.0], &SQUARE, 3.25);
        assert!(outcome.finished_now);
        assert_eq!(outcome.no_laps_compl, 1);
        assert!(tracker.is_finished());
        assert_eq!(tracker.get_finish_time(), Some(3.25));
        assert_eq!(tracker.get_cur_wp_idx(), 0);
        assert_eq!(tracker.get_compl_laps(), 1);

        // finished racers stay finished and do not advance any more
        let outcome = tracker.advance([0.0, 0.0], &SQUARE, 4.0);
        assert_eq!(outcome, AdvanceOutcome::default());
        assert_eq!(tracker.get_finish_time(), Some(3.25));
        assert_eq!(tracker.get_cur_wp_idx(), 0);
    }

    #[test]
    fn n_advances_from_zero_complete_exactly_one_lap() {
        let mut tracker = ProgressTracker::new(0, 4, 10.0, 5);

        for i in 0..4 {
            let wp = SQUARE[i];
            tracker.advance(wp, &SQUARE, i as f64);
        }

        assert_eq!(tracker.get_cur_wp_idx(), 0);
        assert_eq!(tracker.get_compl_laps(), 1);
        assert_eq!(tracker.get_race_prog(), 4);
    }

    #[test]
    fn advances_over_several_waypoints_in_one_tick() {
        let waypoints = [[0.0, 0.0], [5.0, 0.0], [10.0, 0.0], [100.0, 0.0], [50.0, 50.0]];
        let mut tracker = ProgressTracker::new(1, 5, 6.0, 3);

        let outcome = tracker.advance([7.0, 0.0], &waypoints, 0.0);
        assert_eq!(outcome.no_wps_passed, 2);
        assert_eq!(tracker.get_cur_wp_idx(), 3);
    }

    #[test]
    fn huge_capture_radius_is_bounded_to_one_lap_per_tick() {
        let mut tracker = ProgressTracker::new(1, 4, 1.0e9, 10);

        let outcome = tracker.advance([50.0, 50.0], &SQUARE, 0.0);
        assert_eq!(outcome.no_wps_passed, 4);
        assert_eq!(outcome.no_laps_compl, 1);
        assert_eq!(tracker.get_cur_wp_idx(), 1);
    }

    #[test]
    fn finish_stops_advancing_in_the_same_tick() {
        let mut tracker = ProgressTracker::new(2, 4, 1.0e9, 1);

        let outcome = tracker.advance([50.0, 50.0], &SQUARE, 9.0);
        assert!(outcome.finished_now);
        assert_eq!(outcome.no_wps_passed, 2);
        assert_eq!(tracker.get_cur_wp_idx(), 0);
        assert_eq!(tracker.get_race_prog(), 4);
    }

    #[test]
    fn progress_never_decreases() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut tracker = ProgressTracker::new(0, 4, 30.0, 1000);
        let mut prog_prev = tracker.get_race_prog();

        for step in 0..5000 {
            let pos = [rng.gen_range(-20.0..120.0), rng.gen_range(-20.0..120.0)];
            tracker.advance(pos, &SQUARE, step as f64 * 0.01);

            let prog_cur = tracker.get_race_prog();
            assert!(prog_cur >= prog_prev);
            prog_prev = prog_cur;
        }
    }
}
