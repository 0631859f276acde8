//! Spoken fix names to written identifiers
//!
//! Resolution tries three tiers and stops at the first hit: an exact match against a spoken
//! variant or the identifier itself, the best token-set similarity at or above the threshold,
//! and finally an identical metaphone key.

use rphonetic::{Encoder, Metaphone};
use serde::Deserialize;

use crate::{fuzzy::token_set_ratio, gazetteer::Gazetteer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum token-set similarity (0-100) for a fuzzy match.
    pub fuzzy_threshold: u8,
    /// How many near misses to report for an unresolved phrase.
    pub suggestion_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 70,
            suggestion_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Fuzzy(u8),
    Phonetic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixMatch {
    pub written: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone)]
struct Candidate {
    text: String,
    sound: String,
    entry: usize,
}

#[derive(Debug, Clone)]
pub struct FixResolver {
    gazetteer: Gazetteer,
    candidates: Vec<Candidate>,
    config: ResolverConfig,
}

impl FixResolver {
    pub fn new(gazetteer: Gazetteer, config: ResolverConfig) -> Self {
        let mut candidates = Vec::new();
        for (entry, fix) in gazetteer.entries().iter().enumerate() {
            let written_is_variant = fix.spoken_variants.contains(&fix.written);
            let texts = fix
                .spoken_variants
                .iter()
                .chain((!written_is_variant).then_some(&fix.written));
            for text in texts {
                candidates.push(Candidate {
                    text: text.clone(),
                    sound: sound_key(text),
                    entry,
                });
            }
        }
        Self {
            gazetteer,
            candidates,
            config,
        }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Written identifier for a spoken phrase, if any tier matches.
    pub fn resolve_fix(&self, spoken: &str) -> Option<String> {
        self.resolve(spoken).map(|found| found.written)
    }

    pub fn resolve(&self, spoken: &str) -> Option<FixMatch> {
        let spoken = clean_phrase(spoken)?;
        let found = self
            .exact(&spoken)
            .or_else(|| self.fuzzy(&spoken))
            .or_else(|| self.phonetic(&spoken))?;
        let (candidate, tier) = found;
        let written = self.gazetteer.entries()[candidate.entry].written.clone();
        log::debug!(
            "Resolved fix {spoken:?} to {written} via {:?} on {:?}",
            tier,
            candidate.text
        );
        Some(FixMatch { written, tier })
    }

    /// Closest candidate texts with their similarity scores, best first.
    pub fn suggestions(&self, spoken: &str) -> Vec<(String, u8)> {
        let Some(spoken) = clean_phrase(spoken) else {
            return vec![];
        };
        let mut scored: Vec<(&str, u8)> = self
            .candidates
            .iter()
            .map(|candidate| {
                (
                    candidate.text.as_str(),
                    token_set_ratio(&spoken, &candidate.text),
                )
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let mut suggestions: Vec<(String, u8)> = Vec::new();
        for (text, score) in scored {
            if suggestions.len() == self.config.suggestion_limit {
                break;
            }
            if suggestions.iter().all(|(seen, _)| seen != text) {
                suggestions.push((text.to_owned(), score));
            }
        }
        suggestions
    }

    fn exact(&self, spoken: &str) -> Option<(&Candidate, MatchTier)> {
        self.candidates
            .iter()
            .find(|candidate| candidate.text == spoken)
            .map(|candidate| (candidate, MatchTier::Exact))
    }

    fn fuzzy(&self, spoken: &str) -> Option<(&Candidate, MatchTier)> {
        let mut best: Option<(&Candidate, u8)> = None;
        for candidate in &self.candidates {
            let score = token_set_ratio(spoken, &candidate.text);
            if score >= self.config.fuzzy_threshold && best.is_none_or(|(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, score)| (candidate, MatchTier::Fuzzy(score)))
    }

    fn phonetic(&self, spoken: &str) -> Option<(&Candidate, MatchTier)> {
        let sound = sound_key(spoken);
        if sound.is_empty() {
            return None;
        }
        self.candidates
            .iter()
            .find(|candidate| candidate.sound == sound)
            .map(|candidate| (candidate, MatchTier::Phonetic))
    }
}

/// "KNIGHT" and "NIGHT" share the key `NT`.
fn sound_key(text: &str) -> String {
    Metaphone::default().encode(text)
}

fn clean_phrase(phrase: &str) -> Option<String> {
    let cleaned: String = phrase
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::gazetteer::AirportScope;

    const FIXES: &str = r#"{
        "KDCA": {
            "AJANK": "janke intersection",
            "JNKEE": "janke",
            "SWANN": "swann",
            "NITES": "night",
            "BOOKE": ["book", "booky"]
        }
    }"#;

    static RESOLVER: LazyLock<FixResolver> = LazyLock::new(|| {
        let gazetteer =
            Gazetteer::from_json_str(FIXES, AirportScope::Airport("KDCA".to_owned())).unwrap();
        FixResolver::new(gazetteer, ResolverConfig::default())
    });

    #[test]
    fn test_exact_beats_better_fuzzy_entries() {
        // "AJANK" sorts first and scores 100 on token sets, but "janke" is an exact variant.
        let found = RESOLVER.resolve("Janke").unwrap();
        assert_eq!(found.written, "JNKEE");
        assert_eq!(found.tier, MatchTier::Exact);
    }

    #[test]
    fn test_written_identifier_matches_exactly() {
        let found = RESOLVER.resolve("booke").unwrap();
        assert_eq!(found.written, "BOOKE");
        assert_eq!(found.tier, MatchTier::Exact);
    }

    #[test]
    fn test_fuzzy_tier() {
        let found = RESOLVER.resolve("swan").unwrap();
        assert_eq!(found.written, "SWANN");
        assert_eq!(found.tier, MatchTier::Fuzzy(80));
    }

    #[test]
    fn test_phonetic_tier() {
        let found = RESOLVER.resolve("kneyt").unwrap();
        assert_eq!(found.written, "NITES");
        assert_eq!(found.tier, MatchTier::Phonetic);
    }

    #[test]
    fn test_sound_keys() {
        assert_eq!(sound_key("KNIGHT"), sound_key("NIGHT"));
        assert_ne!(sound_key("SWANN"), sound_key("NIGHT"));
        assert!(sound_key("").is_empty());
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(RESOLVER.resolve_fix("zebra"), None);
        assert_eq!(RESOLVER.resolve_fix(""), None);
        assert_eq!(RESOLVER.resolve_fix("?!"), None);
    }

    #[test]
    fn test_suggestions() {
        let suggestions = RESOLVER.suggestions("swan");
        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0], ("SWANN".to_owned(), 80));
        assert!(suggestions.windows(2).all(|w| w[0].1 >= w[1].1));

        let resolver = FixResolver::new(
            RESOLVER.gazetteer().clone(),
            ResolverConfig {
                suggestion_limit: 2,
                ..Default::default()
            },
        );
        assert_eq!(resolver.suggestions("swan").len(), 2);
        assert!(resolver.suggestions("").is_empty());
    }

    #[test]
    fn test_empty_gazetteer() {
        let resolver = FixResolver::new(Gazetteer::empty(AirportScope::All), Default::default());
        assert_eq!(resolver.resolve_fix("janke"), None);
        assert!(resolver.suggestions("janke").is_empty());
    }
}
