use std::path::PathBuf;

use atc_recognition_rs::AirportScope;
use clap::Parser;

const DEFAULT_FIXES_PATH: &str = "crates/atc_recognition_rs/resources/fixes/fixes.json";

/// Turns ATC transmissions into radar client commands, one per line on stdout.
#[derive(Debug, Clone, Parser)]
#[command(name = "vfv", version)]
pub struct Args {
    /// Airport whose fixes are loaded, `ALL` for every airport. Unset loads only general fixes.
    #[arg(long, env = "VFV_AIRPORT")]
    pub airport: Option<AirportScope>,

    /// Fix gazetteer (JSON).
    #[arg(long, env = "VFV_FIXES", default_value = DEFAULT_FIXES_PATH)]
    pub fixes: PathBuf,

    /// Replaces the built-in normalizer rule tables (RON).
    #[arg(long, env = "VFV_RULES")]
    pub rules: Option<PathBuf>,

    /// OpenFlights airline database (JSON) extending the built-in callsign table.
    #[arg(long, env = "VFV_AIRLINES")]
    pub airlines: Option<PathBuf>,

    /// Whisper model. With a model, inputs ending in `.wav` are transcribed first.
    #[cfg(feature = "whisper")]
    #[arg(long, env = "VFV_MODEL")]
    pub model: Option<PathBuf>,

    /// Number of delivered commands kept in the session history.
    #[arg(long, default_value_t = 32)]
    pub history: usize,

    /// Print the airports present in the gazetteer and exit.
    #[arg(long)]
    pub list_airports: bool,

    /// Transcripts to process. Read line by line from stdin when none are given.
    pub inputs: Vec<String>,
}

impl Args {
    pub fn airport_scope(&self) -> AirportScope {
        self.airport.clone().unwrap_or_default()
    }
}
