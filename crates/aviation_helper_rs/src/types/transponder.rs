use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Four-digit transponder code. Each digit is octal (0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SquawkCode(u16);

impl SquawkCode {
    pub fn code(self) -> u16 {
        self.0
    }
}

impl FromStr for SquawkCode {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        if val.len() != 4 || !val.chars().all(|c| ('0'..='7').contains(&c)) {
            return Err(Error::InvalidSquawk(val.to_owned()));
        }
        let code =
            u16::from_str_radix(val, 8).map_err(|_| Error::InvalidSquawk(val.to_owned()))?;
        Ok(Self(code))
    }
}

impl Display for SquawkCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squawk_codes() {
        assert_eq!("1200".parse::<SquawkCode>().unwrap().to_string(), "1200");
        assert_eq!("0457".parse::<SquawkCode>().unwrap().to_string(), "0457");
        assert!("1280".parse::<SquawkCode>().is_err());
        assert!("120".parse::<SquawkCode>().is_err());
        assert!("12000".parse::<SquawkCode>().is_err());
    }
}
