use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// ResultEntry is one row of the final results table. `finish_time` is `None` for racers that
/// did not finish.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResultEntry {
    pub position: usize,
    pub name: String,
    pub is_player: bool,
    pub finish_time: Option<f64>,
}

/// RaceResult contains all race information that is required by the results screen.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RaceResult {
    pub track_id: String,
    pub track_name: String,
    pub tot_no_laps: u32,
    pub entries: Vec<ResultEntry>,
}

/// format_race_time formats a race time in seconds as m:ss.cc, e.g. 83.456 -> 1:23.45.
pub fn format_race_time(t: f64) -> String {
    let t = t.max(0.0);
    let min = (t / 60.0).floor() as u64;
    let sec = (t % 60.0).floor() as u64;
    let centis = ((t % 1.0) * 100.0).floor() as u64;
    format!("{}:{:02}.{:02}", min, sec, centis)
}

impl RaceResult {
    /// get_player_entry returns the player's row, if a player took part.
    pub fn get_player_entry(&self) -> Option<&ResultEntry> {
        self.entries.iter().find(|entry| entry.is_player)
    }

    /// results_table returns the results as a plain text table.
    pub fn results_table(&self) -> String {
        let mut table = String::new();

        // writing into a String cannot fail
        let _ = writeln!(
            &mut table,
            "RESULT: {} ({} laps)",
            self.track_name, self.tot_no_laps
        );
        let _ = writeln!(&mut table, "pos, racer       , time");

        for entry in self.entries.iter() {
            let name = if entry.is_player {
                format!("* {}", entry.name)
            } else {
                entry.name.to_owned()
            };
            let time = entry
                .finish_time
                .map_or_else(|| "DNF".to_owned(), format_race_time);
            let _ = writeln!(&mut table, "{:3}, {:12}, {:>9}", entry.position, name, time);
        }

        table
    }

    /// print_results prints the resulting table to the console output.
    pub fn print_results(&self) {
        print!("{}", self.results_table());
    }

    /// write_results_csv writes one line per racer to a CSV file. Racers that did not finish
    /// have an empty finish time.
    pub fn write_results_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path).context(format!(
            "Failed to create result file {}!",
            path.display()
        ))?;

        writer.write_record(&["position", "name", "is_player", "finish_time_s"])?;

        for entry in self.entries.iter() {
            writer.write_record(&[
                entry.position.to_string(),
                entry.name.to_owned(),
                entry.is_player.to_string(),
                entry
                    .finish_time
                    .map_or_else(String::new, |t| format!("{:.3}", t)),
            ])?;
        }

        writer
            .flush()
            .context(format!("Failed to write result file {}!", path.display()))?;
        Ok(())
    }
}
