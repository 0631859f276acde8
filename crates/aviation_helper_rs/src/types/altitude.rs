use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Highest altitude the command grammar can carry (three digits of hundreds of feet).
pub const MAX_ALTITUDE_FEET: u32 = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum VerticalDirection {
    Climb,
    Descend,
}

impl VerticalDirection {
    pub fn prefix(self) -> char {
        match self {
            VerticalDirection::Climb => 'C',
            VerticalDirection::Descend => 'D',
        }
    }
}

/// An assigned altitude in feet.
///
/// Displays in the client's hundreds-of-feet notation: 16000 ft is `160`, 7000 ft is `070`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Altitude(u32);

impl Altitude {
    pub fn from_feet(feet: u32) -> Result<Self, Error> {
        match feet {
            100..=MAX_ALTITUDE_FEET => Ok(Self(feet)),
            _ => Err(Error::InvalidAltitude(feet)),
        }
    }

    pub fn from_flight_level(level: u32) -> Result<Self, Error> {
        Self::from_feet(level.saturating_mul(100))
    }

    /// Interprets a spoken altitude number. Values below 100 are thousands of feet
    /// ("maintain 15" means 15,000 ft). Separators such as commas are ignored.
    pub fn from_spoken(raw: &str) -> Result<Self, Error> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let value: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidNumber(raw.to_owned()))?;
        let feet = if value < 100 { value * 1000 } else { value };
        Self::from_feet(feet)
    }

    pub fn feet(self) -> u32 {
        self.0
    }

    pub fn hundreds(self) -> u32 {
        self.0 / 100
    }
}

impl TryFrom<u32> for Altitude {
    type Error = Error;

    fn try_from(feet: u32) -> Result<Self, Self::Error> {
        Self::from_feet(feet)
    }
}

impl From<Altitude> for u32 {
    fn from(value: Altitude) -> Self {
        value.0
    }
}

impl Display for Altitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.hundreds())
    }
}

/// Total formatter for raw altitude text: never fails, anything non-numeric becomes `000`.
pub fn format_altitude(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let Ok(value) = digits.parse::<u64>() else {
        return "000".to_owned();
    };
    let feet = if value < 100 { value * 1000 } else { value };
    format!("{:03}", feet / 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_altitude() {
        assert_eq!(format_altitude("16000"), "160");
        assert_eq!(format_altitude("7000"), "070");
        assert_eq!(format_altitude("15"), "150");
        assert_eq!(format_altitude("4,000"), "040");
        assert_eq!(format_altitude(""), "000");
        assert_eq!(format_altitude("level"), "000");
    }

    #[test]
    fn test_spoken_altitude() {
        assert_eq!(Altitude::from_spoken("5").unwrap().feet(), 5000);
        assert_eq!(Altitude::from_spoken("11").unwrap().to_string(), "110");
        assert_eq!(Altitude::from_spoken("2500").unwrap().to_string(), "025");
        assert!(matches!(
            Altitude::from_spoken("0"),
            Err(Error::InvalidAltitude(0))
        ));
        assert!(matches!(
            Altitude::from_spoken("120000"),
            Err(Error::InvalidAltitude(120000))
        ));
        assert!(Altitude::from_spoken("feet").is_err());
    }

    #[test]
    fn test_flight_level() {
        assert_eq!(Altitude::from_flight_level(350).unwrap().to_string(), "350");
        assert!(Altitude::from_flight_level(0).is_err());
    }
}
