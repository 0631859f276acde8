use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum RunwaySide {
    #[strum(to_string = "L", serialize = "left")]
    Left,
    #[strum(to_string = "R", serialize = "right")]
    Right,
    #[strum(to_string = "C", serialize = "center", serialize = "centre")]
    Center,
}

/// Runway designator: number 1 to 36 plus an optional parallel-runway side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Runway {
    number: u8,
    side: Option<RunwaySide>,
}

impl Runway {
    pub fn new(number: u32, side: Option<RunwaySide>) -> Result<Self, Error> {
        match number {
            1..=36 => Ok(Self {
                number: number as u8,
                side,
            }),
            _ => Err(Error::InvalidRunway(number)),
        }
    }

    /// Builds a runway from the spoken number and side texts ("28", "left" / "l").
    pub fn parse(number: &str, side: Option<&str>) -> Result<Self, Error> {
        let number: u32 = number
            .parse()
            .map_err(|_| Error::InvalidNumber(number.to_owned()))?;
        let side = side
            .map(|side| {
                side.parse::<RunwaySide>()
                    .map_err(|_| Error::InvalidRunwaySide(side.to_owned()))
            })
            .transpose()?;
        Self::new(number, side)
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn side(&self) -> Option<RunwaySide> {
        self.side
    }
}

impl Display for Runway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.number)?;
        if let Some(side) = self.side {
            write!(f, "{side}")?;
        }
        Ok(())
    }
}
