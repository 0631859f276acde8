use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Indicated airspeed in knots, as assigned by ATC (two or three digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Speed(u32);

impl Speed {
    pub fn new(knots: u32) -> Result<Self, Error> {
        match knots {
            10..=999 => Ok(Self(knots)),
            _ => Err(Error::InvalidSpeed(knots)),
        }
    }

    pub fn knots(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Speed {
    type Error = Error;

    fn try_from(knots: u32) -> Result<Self, Self::Error> {
        Self::new(knots)
    }
}

impl From<Speed> for u32 {
    fn from(value: Speed) -> Self {
        value.0
    }
}

impl Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
