use crate::types::{Coords, WorkoutId};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_STORE: &str = "mapty-workouts.json";

#[derive(Parser, Debug)]
#[command(name = "mapty", about = "Log running and cycling workouts on a map")]
pub struct Cli {
    /// JSON file holding saved workouts.
    #[arg(long, global = true, env = "MAPTY_STORE", default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    /// Current position as LAT,LNG. Without it the map falls back to a
    /// default center.
    #[arg(long, global = true, env = "MAPTY_HOME", value_name = "LAT,LNG")]
    pub home: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a new workout at a map location.
    Log {
        #[command(subcommand)]
        workout: LogCmd,
    },

    /// Print saved workouts, oldest first.
    List {
        /// Also print coordinates and timestamps.
        #[arg(long)]
        details: bool,
    },

    /// Fly the map to a saved workout.
    Show {
        #[arg(value_name = "ID")]
        id: WorkoutId,
    },

    /// Print the workout sidebar as HTML.
    Html,

    /// Delete every saved workout.
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum LogCmd {
    Running {
        #[command(flatten)]
        common: CommonFields,

        /// Steps per minute.
        #[arg(long, allow_hyphen_values = true)]
        cadence: String,
    },
    Cycling {
        #[command(flatten)]
        common: CommonFields,

        /// Elevation gain in meters.
        #[arg(long, allow_hyphen_values = true)]
        elevation: String,
    },
}

/// Kept as text so the session does the same validation a form would.
#[derive(Args, Debug)]
pub struct CommonFields {
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude)]
    pub lng: f64,

    /// Distance in km.
    #[arg(long, allow_hyphen_values = true)]
    pub distance: String,

    /// Duration in minutes.
    #[arg(long, allow_hyphen_values = true)]
    pub duration: String,
}

fn parse_latitude(s: &str) -> Result<f64, String> {
    parse_degrees(s, 90.0)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    parse_degrees(s, 180.0)
}

/// A finite number of degrees within `[-limit, limit]`.
fn parse_degrees(s: &str, limit: f64) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if (-limit..=limit).contains(&v) {
        Ok(v)
    } else {
        Err(format!("must be a number between -{limit} and {limit}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_running(lat: &str, lng: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([
            "mapty", "log", "running", "--lat", lat, "--lng", lng, "--distance", "5",
            "--duration", "30", "--cadence", "180",
        ])
    }

    #[test]
    fn accepts_coordinates_on_the_globe() {
        let cli = log_running("-31.4", "179.9").unwrap();
        let Cmd::Log {
            workout: LogCmd::Running { common, .. },
        } = cli.cmd
        else {
            panic!("expected log running");
        };
        assert_eq!((common.lat, common.lng), (-31.4, 179.9));
    }

    #[test]
    fn rejects_non_finite_or_out_of_range_coordinates() {
        for (lat, lng) in [("NaN", "1"), ("1", "inf"), ("1e400", "1"), ("91", "0"), ("0", "-181")] {
            assert!(log_running(lat, lng).is_err(), "accepted {lat},{lng}");
        }
    }
}
