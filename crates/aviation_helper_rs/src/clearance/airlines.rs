use serde::{Deserialize, Deserializer, de};

use crate::errors::Error;
#[cfg(feature = "fs")]
use std::{fs::File, io::BufReader, path::Path};

/// Spoken forms by which an operator is addressed on frequency, keyed by ICAO designator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsignDesignator {
    pub icao: String,
    /// Lowercase phrases; the ICAO code itself is always included.
    pub spoken: Vec<String>,
}

/// Built-in telephony table: ICAO designator followed by the phrases a transcript may contain.
const KNOWN_CALLSIGNS: &[(&str, &[&str])] = &[
    // Major US carriers
    ("SKW", &["skywest", "sky west"]),
    ("WJA", &["westjet", "west jet", "wj"]),
    ("AAL", &["american"]),
    ("DAL", &["delta"]),
    ("UAL", &["united"]),
    ("SWA", &["southwest", "south west"]),
    ("JBU", &["jetblue", "jet blue"]),
    ("ASA", &["alaska"]),
    ("FFT", &["frontier", "frontier flight"]),
    ("NKS", &["spirit", "spirit wings"]),
    ("HAL", &["hawaiian"]),
    ("MXY", &["moxy"]),
    // US regionals
    ("ENY", &["envoy"]),
    ("EDV", &["endeavor"]),
    ("JIA", &["bluestreak", "blue streak", "psa"]),
    ("PDT", &["piedmont"]),
    ("RPA", &["brickyard", "republic"]),
    ("ASH", &["mesa", "air shuttle"]),
    ("GJS", &["lindbergh", "gojet", "go jet"]),
    ("ASQ", &["acey", "expressjet"]),
    (
        "UCA",
        &["commutair", "commuter air", "commutar air", "comm air", "com air", "comair", "cmair"],
    ),
    // International
    ("ACA", &["air canada"]),
    ("DLH", &["lufthansa"]),
    ("BAW", &["speedbird", "british airways"]),
    ("AFR", &["air france", "airfrans"]),
    ("UAE", &["emirates"]),
    ("QTR", &["qatari", "qatar"]),
    ("CPA", &["cathay"]),
    ("SIA", &["singapore"]),
    ("JAL", &["japan air", "japan"]),
    ("ANA", &["all nippon"]),
    // Cargo
    ("FDX", &["fedex", "fed ex"]),
    ("UPS", &[]),
    ("GTI", &["giant", "atlas"]),
    ("CKS", &["connie", "kalitta"]),
    ("PAC", &["polar"]),
    ("SOO", &["southern air"]),
    // Charter
    ("SCX", &["sun country"]),
    ("AAY", &["allegiant"]),
    // Military and government
    ("RCH", &["reach"]),
    ("EJM", &["patriot"]),
    ("NJE", &["navy"]),
];

/// The built-in designators, ICAO code included among the spoken forms.
pub fn known_designators() -> Vec<CallsignDesignator> {
    KNOWN_CALLSIGNS
        .iter()
        .map(|(icao, spoken)| CallsignDesignator {
            icao: (*icao).to_owned(),
            spoken: spoken
                .iter()
                .map(|phrase| (*phrase).to_owned())
                .chain(std::iter::once(icao.to_lowercase()))
                .collect(),
        })
        .collect()
}

/// One row of an OpenFlights-style airline database.
#[derive(Debug, Clone, Deserialize)]
pub struct AirlineEntry {
    #[serde(deserialize_with = "deserialize_string_as_i32")]
    pub id: i32,
    pub name: String,
    #[serde(deserialize_with = "deserialize_option_string_n")]
    pub alias: Option<String>,
    #[serde(deserialize_with = "deserialize_option_string")]
    pub iata: Option<String>,
    #[serde(deserialize_with = "deserialize_option_string")]
    pub icao: Option<String>,
    #[serde(deserialize_with = "deserialize_option_string")]
    pub callsign: Option<String>,
    pub country: String,
    #[serde(deserialize_with = "deserialize_bool")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Airlines(pub Vec<AirlineEntry>);

impl Airlines {
    pub fn load_airlines<R>(reader: R) -> Result<Self, Error>
    where
        R: std::io::Read,
    {
        let res = serde_json::from_reader(reader)?;
        Ok(res)
    }

    #[cfg(feature = "fs")]
    pub fn load_airlines_from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::load_airlines(BufReader::new(file))
    }

    /// Designators for every active airline with both an ICAO code and a telephony callsign.
    pub fn designators(&self) -> Vec<CallsignDesignator> {
        self.0
            .iter()
            .filter(|airline| airline.active)
            .filter_map(|airline| {
                let icao = airline.icao.as_deref()?;
                let callsign = airline.callsign.as_deref()?;
                if icao.len() != 3 || icao == "N/A" {
                    return None;
                }
                Some(CallsignDesignator {
                    icao: icao.to_uppercase(),
                    spoken: vec![callsign.to_lowercase(), icao.to_lowercase()],
                })
            })
            .collect()
    }
}

fn deserialize_string_as_i32<'de, D>(d: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(d)?;
    let res = s.parse().map_err(|err| {
        serde::de::Error::custom(format!("Could not parse i32: {s}, Err: {err:?}"))
    })?;
    Ok(res)
}

fn deserialize_option_string_n<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(d)?;
    let res = s.filter(|s| s != "\\N");
    Ok(res)
}

fn deserialize_option_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(d)?;
    let res = s.filter(|s| !s.is_empty());
    Ok(res)
}

fn deserialize_bool<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(d)?;
    let res = match s.as_str() {
        "N" | "n" => false,
        "Y" | "y" => true,
        _ => {
            return Err(de::Error::invalid_value(
                de::Unexpected::Str(&s),
                &r#""Y" or "N""#,
            ));
        }
    };
    Ok(res)
}
