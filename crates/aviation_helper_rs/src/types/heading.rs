use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::errors::Error;

/// A magnetic heading in whole degrees, 1 to 360. North is 360, never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Heading(u32);

impl Heading {
    pub fn new(degrees: u32) -> Result<Self, Error> {
        match degrees {
            1..=360 => Ok(Self(degrees)),
            _ => Err(Error::InvalidHeading(degrees)),
        }
    }

    pub fn degrees(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Heading {
    type Error = Error;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}

impl From<Heading> for u32 {
    fn from(value: Heading) -> Self {
        value.0
    }
}

impl Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Deserialize, Serialize, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Turn commands use lowercase prefixes so they never collide with absolute `H` headings.
    pub fn prefix(self) -> char {
        match self {
            TurnDirection::Left => 'l',
            TurnDirection::Right => 'r',
        }
    }
}
