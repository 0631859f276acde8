//! Numeric and named entities in a normalized transcript

use aviation_helper_rs::{
    clearance::aviation_command::{ApproachForm, ApproachKind},
    types::{
        altitude::Altitude,
        heading::{Heading, TurnDirection},
        runway::Runway,
        speed::Speed,
    },
};
use regex::{Captures, Regex};

use crate::{Error, Issue};

/// Words that end a spoken fix name after "direct".
const FIX_PHRASE_STOP_WORDS: &[&str] = &[
    "and", "at", "then", "descend", "climb", "maintain", "expedite", "turn", "heading", "fly",
    "speed", "reduce", "increase", "knots", "contact", "expect", "cleared", "intercept",
    "squawk", "ident", "resume", "cancel", "say", "runway", "cross", "for",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingInstruction {
    pub heading: Heading,
    pub turn: Option<TurnDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedInstruction {
    Assign(Speed),
    Say,
}

/// Everything found in one transmission. Fields are absent when not spoken or out of range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedEntities {
    pub callsign: Option<String>,
    pub altitude: Option<Altitude>,
    pub heading: Option<HeadingInstruction>,
    pub speed: Option<SpeedInstruction>,
    pub runway: Option<Runway>,
    pub approach: Option<ApproachKind>,
    /// The words after "direct", before resolution against the gazetteer.
    pub fix_phrase: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EntityExtractor {
    altitude_noise: Vec<Regex>,
    altitude_thousands: Regex,
    flight_level: Regex,
    altitude_feet: Regex,
    altitude_command_feet: Regex,
    bare_altitude: Regex,
    heading_spaced: Regex,
    heading: Regex,
    turn: Regex,
    speed_knots: Regex,
    speed_keyword: Regex,
    say_speed: Regex,
    runway: Regex,
    runway_compact: Regex,
    approach: Regex,
    direct: Regex,
}

impl EntityExtractor {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            altitude_noise: vec![
                Regex::new(r"\bheading\s+\d{1,3}\b")?,
                Regex::new(r"\bspeed\s+(?:to\s+)?\d{2,3}\b")?,
                Regex::new(r"\b\d{2,3}\s*knots?\b")?,
                Regex::new(r"\bsquawk\s*\d{4}\b")?,
                Regex::new(r"\brunway\s+\d{1,2}\b")?,
            ],
            altitude_thousands: Regex::new(
                r"\b(?:descend|climb|maintain)\D*(\d+)\s*(?:thousand|k)\b(?:\s*(?:and\s+)?(\d)\s*hundred\b)?",
            )?,
            flight_level: Regex::new(r"\bflight\s+level\s*(\d{2,3})\b")?,
            altitude_feet: Regex::new(r"\b(?:altitude|level)\D*(\d[\d,]*)\s*(?:feet|ft)\b")?,
            altitude_command_feet: Regex::new(
                r"\b(?:descend|climb|maintain)\D*(\d{3,5})\s*(?:feet|ft)\b",
            )?,
            bare_altitude: Regex::new(r"\b(\d{3,5})\b")?,
            heading_spaced: Regex::new(r"\bheading\s+(\d)\s(\d)\s(\d)\b")?,
            heading: Regex::new(r"\bheading\s+(\d{1,3})\b")?,
            turn: Regex::new(r"\bturn\s+(left|right)\s+heading\b")?,
            speed_knots: Regex::new(r"\b(\d{2,3})\s*knots?\b")?,
            speed_keyword: Regex::new(r"\bspeed\s+(?:to\s+)?(\d{2,3})\b")?,
            say_speed: Regex::new(r"\bsay\s+(?:your\s+)?(?:air)?speed\b")?,
            runway: Regex::new(r"\brunway\s+(\d{1,2})(?:\s*(left|right|center)|([lrc]))?\b")?,
            runway_compact: Regex::new(r"\b(\d{1,2})([lrc])\b")?,
            approach: Regex::new(r"\b(expect|cleared)\s+(ils|rnav|visual)\b")?,
            direct: Regex::new(r"\b(?:cleared|proceed)\s+direct\s+(.+)$")?,
        })
    }

    /// Runs every extractor. Values that were spoken but fall outside their legal range are
    /// reported as issues instead.
    pub fn extract(&self, text: &str, callsign: Option<&str>) -> (ExtractedEntities, Vec<Issue>) {
        let mut issues = Vec::new();
        let altitude = keep(&mut issues, "altitude", self.altitude(text, callsign));
        let heading =
            keep(&mut issues, "heading", self.heading(text)).map(|heading| HeadingInstruction {
                heading,
                turn: self.turn_direction(text),
            });
        let speed = keep(&mut issues, "speed", self.speed(text))
            .map(SpeedInstruction::Assign)
            .or_else(|| self.say_speed.is_match(text).then_some(SpeedInstruction::Say));
        let runway = keep(&mut issues, "runway", self.runway(text));

        let entities = ExtractedEntities {
            callsign: callsign.map(str::to_owned),
            altitude,
            heading,
            speed,
            runway,
            approach: self.approaches(text).first().map(|(_, kind)| *kind),
            fix_phrase: self.fix_phrase(text),
        };
        (entities, issues)
    }

    /// Altitude in feet, looked for after removing the callsign and other numbered phrases.
    pub fn altitude(
        &self,
        text: &str,
        callsign: Option<&str>,
    ) -> Option<Result<Altitude, aviation_helper_rs::Error>> {
        let mut text = text.to_lowercase();
        if let Some(callsign) = callsign.filter(|c| !c.is_empty()) {
            match callsign_regex(callsign) {
                Ok(spoken) => text = spoken.replace(&text, " ").into_owned(),
                Err(err) => log::warn!("Could not match callsign {callsign:?}: {err}"),
            }
        }
        for noise in &self.altitude_noise {
            text = noise.replace_all(&text, " ").into_owned();
        }

        if let Some(caps) = self.altitude_thousands.captures(&text) {
            return Some(thousands_to_altitude(&caps));
        }
        if let Some(caps) = self.flight_level.captures(&text) {
            return Some(parse_number(&caps[1]).and_then(Altitude::from_flight_level));
        }
        if let Some(caps) = self
            .altitude_feet
            .captures(&text)
            .or_else(|| self.altitude_command_feet.captures(&text))
        {
            return Some(Altitude::from_spoken(&caps[1]));
        }
        self.bare_altitude
            .captures_iter(&text)
            .filter_map(|caps| caps.get(1))
            .find(|number| {
                !text[number.end()..]
                    .trim_start()
                    .starts_with(|c: char| c.is_alphabetic())
            })
            .map(|number| Altitude::from_spoken(number.as_str()))
    }

    pub fn heading(&self, text: &str) -> Option<Result<Heading, aviation_helper_rs::Error>> {
        let digits = match self.heading_spaced.captures(text) {
            Some(caps) => format!("{}{}{}", &caps[1], &caps[2], &caps[3]),
            None => self.heading.captures(text)?[1].to_owned(),
        };
        Some(parse_number(&digits).and_then(Heading::new))
    }

    /// Only a turn that introduces the heading counts: "turn left heading 270".
    pub fn turn_direction(&self, text: &str) -> Option<TurnDirection> {
        let caps = self.turn.captures(text)?;
        caps[1].parse().ok()
    }

    pub fn speed(&self, text: &str) -> Option<Result<Speed, aviation_helper_rs::Error>> {
        let caps = self
            .speed_knots
            .captures(text)
            .or_else(|| self.speed_keyword.captures(text))?;
        Some(parse_number(&caps[1]).and_then(Speed::new))
    }

    pub fn runway(&self, text: &str) -> Option<Result<Runway, aviation_helper_rs::Error>> {
        if let Some(caps) = self.runway.captures(text) {
            let side = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
            return Some(Runway::parse(&caps[1], side));
        }
        let caps = self.runway_compact.captures(text)?;
        Some(Runway::parse(&caps[1], Some(&caps[2])))
    }

    /// Every "expect/cleared <kind>" phrase, in the order spoken.
    pub fn approaches(&self, text: &str) -> Vec<(ApproachForm, ApproachKind)> {
        self.approach
            .captures_iter(text)
            .filter_map(|caps| {
                let form = match &caps[1] {
                    "expect" => ApproachForm::Expect,
                    _ => ApproachForm::Cleared,
                };
                let kind = match &caps[2] {
                    "ils" => ApproachKind::Ils,
                    "rnav" => ApproachKind::Rnav,
                    "visual" => ApproachKind::Visual,
                    _ => return None,
                };
                Some((form, kind))
            })
            .collect()
    }

    /// The spoken fix name following "cleared direct" or "proceed direct", up to the next
    /// instruction keyword or number.
    pub fn fix_phrase(&self, text: &str) -> Option<String> {
        let caps = self.direct.captures(text)?;
        let words: Vec<&str> = caps[1]
            .split_whitespace()
            .take_while(|word| {
                !FIX_PHRASE_STOP_WORDS.contains(word) && !word.chars().any(|c| c.is_ascii_digit())
            })
            .collect();
        (!words.is_empty()).then(|| words.join(" "))
    }
}

/// The callsign as a whole word; letters and digits may be spoken apart ("xyz 123").
fn callsign_regex(callsign: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from(r"\b");
    let mut previous: Option<char> = None;
    for c in callsign.to_lowercase().chars() {
        if previous.is_some_and(|p| p.is_ascii_digit() != c.is_ascii_digit()) {
            pattern.push_str(r"\s*");
        }
        pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        previous = Some(c);
    }
    pattern.push_str(r"\b");
    Regex::new(&pattern)
}

fn parse_number(digits: &str) -> Result<u32, aviation_helper_rs::Error> {
    digits
        .parse()
        .map_err(|_| aviation_helper_rs::Error::InvalidNumber(digits.to_owned()))
}

fn keep<T>(
    issues: &mut Vec<Issue>,
    entity: &'static str,
    found: Option<Result<T, aviation_helper_rs::Error>>,
) -> Option<T> {
    match found? {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Dropping {entity}: {err}");
            issues.push(Issue::InvalidNumericRange {
                entity,
                reason: err.to_string(),
            });
            None
        }
    }
}

/// "5 thousand" and "4 thousand 5 hundred" always count in thousands of feet.
fn thousands_to_altitude(caps: &Captures) -> Result<Altitude, aviation_helper_rs::Error> {
    let thousands = parse_number(&caps[1])?;
    let hundreds = caps
        .get(2)
        .map(|m| parse_number(m.as_str()))
        .transpose()?
        .unwrap_or(0);
    let feet = thousands
        .checked_mul(1000)
        .and_then(|feet| feet.checked_add(hundreds * 100))
        .ok_or_else(|| aviation_helper_rs::Error::InvalidNumber(caps[0].to_owned()))?;
    Altitude::from_feet(feet)
}
