//! Callsign extraction from normalized transcripts

use aviation_helper_rs::clearance::airlines::CallsignDesignator;
use regex::Regex;

use crate::Error;

/// Words that mark a bare number as something other than a flight number.
const NUMBER_QUALIFIERS: &[&str] = &["thousand", "feet", "ft", "l", "r", "c"];

/// Finds the addressed aircraft, trying in order: a US civil registration (`n 123ab`), an
/// airline telephony name followed by a flight number, a bare flight number, and finally any
/// short word glued to a number.
#[derive(Debug, Clone)]
pub struct CallsignExtractor {
    n_number: Regex,
    airline: Option<Regex>,
    standalone: Regex,
    generic: Regex,
}

impl CallsignExtractor {
    pub fn new(designators: &[CallsignDesignator]) -> Result<Self, Error> {
        let mut phrases: Vec<&str> = designators
            .iter()
            .flat_map(|designator| designator.spoken.iter())
            .map(String::as_str)
            .filter(|phrase| !phrase.trim().is_empty())
            .collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();

        let airline = if phrases.is_empty() {
            None
        } else {
            let alternatives = phrases
                .iter()
                .map(|phrase| {
                    phrase
                        .split_whitespace()
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join(r"\s*")
                })
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r"\b(?:{alternatives})\s*(\d{{2,4}})([a-z])?\b"
            ))?)
        };

        Ok(Self {
            n_number: Regex::new(r"\bn\s*(\d{1,5}[a-z]{0,2})\b")?,
            airline,
            standalone: Regex::new(r"\b(\d{2,4})\b")?,
            generic: Regex::new(r"\b([a-z]{2,5})\s*(\d{2,4})([a-z])?\b")?,
        })
    }

    /// Returns the uppercase callsign, or `None` when no pattern applies.
    pub fn extract(&self, text: &str) -> Option<String> {
        let text = text.to_lowercase();

        if let Some(caps) = self.n_number.captures(&text) {
            return Some(caps[1].to_uppercase());
        }

        if let Some(caps) = self.airline.as_ref().and_then(|re| re.captures(&text)) {
            let suffix = caps.get(2).map_or("", |m| m.as_str());
            return Some(format!("{}{}", &caps[1], suffix.to_uppercase()));
        }

        let standalone = self.standalone.captures_iter(&text).find_map(|caps| {
            let number = caps.get(1)?;
            let qualified = text[number.end()..]
                .split_whitespace()
                .next()
                .is_some_and(|word| NUMBER_QUALIFIERS.contains(&word));
            (!qualified).then(|| number.as_str().to_owned())
        });
        if standalone.is_some() {
            return standalone;
        }

        self.generic.captures(&text).map(|caps| {
            let suffix = caps.get(3).map_or("", |m| m.as_str());
            format!("{}{}{}", &caps[1], &caps[2], suffix).to_uppercase()
        })
    }
}
