use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "wetter")]
#[command(version, about = "Current weather for a place, your position, or your saved locations")]
pub struct Cli {
    /// Config file (default: <config dir>/wetter/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions for a place name
    Search {
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,

        /// Also add the place to the saved locations
        #[arg(long)]
        save: bool,
    },

    /// Show current conditions at the device position and save the place
    Here {
        /// Latitude, overriding location.latitude from the config
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude, overriding location.longitude from the config
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Manage saved locations (lists them when no action is given)
    Saved {
        #[command(subcommand)]
        action: Option<SavedAction>,
    },

    /// Show or change the theme preference
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SavedAction {
    List,
    Add {
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,
    },
    Remove {
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,
    },
    /// Show current conditions for a saved location
    Open {
        #[arg(required = true, num_args = 1..)]
        place: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

/// Multi-word place names arrive as separate arguments
pub fn place_name(parts: &[String]) -> String {
    parts.join(" ").trim().to_string()
}
