//! Aviation helper types
//!
//! Strongly typed aviation values (altitudes, headings, runways, speeds, squawk codes) and the
//! compact command grammar understood by the simulated ATC client.

pub mod clearance {
    pub mod airlines;
    pub mod aviation_command;
}
pub mod errors;
pub mod types {
    pub mod altitude;
    pub mod heading;
    pub mod runway;
    pub mod speed;
    pub mod transponder;
}

pub use errors::Error;
