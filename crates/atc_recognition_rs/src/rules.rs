//! Rewrite rule tables for the normalizer
//!
//! Rules are data: a RON document lists the protected phrases plus two ordered rule lists.
//! The built-in table is compiled into the binary; a file with the same shape can replace it.

use std::path::Path;

use regex::{Captures, NoExpand, Regex};
use serde::Deserialize;

use crate::Error;

const BUILTIN_RULES: &str = include_str!("../resources/normalizer/rules.ron");

/// Each protected phrase is stood in for by its own private-use character.
pub const MAX_PROTECTED_PHRASES: usize = 0x1700;

/// How one rule is written in the RON table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum RuleSpec {
    /// Whole-word literal replacement. Spaces inside the phrase match any whitespace run.
    Word(String, String),
    /// Regex replacement; the replacement may refer to capture groups as `${1}`.
    Pattern(String, String),
    /// Every match is glued together: whitespace and hyphens inside it are dropped.
    Join(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleTablesConfig {
    pub protected_phrases: Vec<String>,
    pub lexical_rules: Vec<RuleSpec>,
    pub structural_rules: Vec<RuleSpec>,
}

impl RuleTablesConfig {
    pub fn from_ron_str(content: &str) -> Result<Self, Error> {
        Ok(ron::from_str(content)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}

#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pattern: Regex,
    replacement: Replacement,
}

#[derive(Debug, Clone)]
enum Replacement {
    Literal(String),
    Template(String),
    Join,
}

impl ReplacementRule {
    pub fn compile(spec: &RuleSpec) -> Result<Self, Error> {
        let rule = match spec {
            RuleSpec::Word(from, to) => Self {
                pattern: word_regex(from)?,
                replacement: Replacement::Literal(to.clone()),
            },
            RuleSpec::Pattern(pattern, to) => Self {
                pattern: Regex::new(pattern)?,
                replacement: Replacement::Template(to.clone()),
            },
            RuleSpec::Join(pattern) => Self {
                pattern: Regex::new(pattern)?,
                replacement: Replacement::Join,
            },
        };
        Ok(rule)
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.replacement {
            Replacement::Literal(to) => self.pattern.replace_all(text, NoExpand(to)),
            Replacement::Template(to) => self.pattern.replace_all(text, to.as_str()),
            Replacement::Join => self.pattern.replace_all(text, |caps: &Captures| {
                caps[0]
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '-')
                    .collect::<String>()
            }),
        }
        .into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct ProtectedPhrase {
    pub phrase: String,
    pub(crate) matcher: Regex,
}

/// Compiled rule tables, ready for the normalizer.
#[derive(Debug, Clone)]
pub struct RuleTables {
    protected: Vec<ProtectedPhrase>,
    lexical: Vec<ReplacementRule>,
    structural: Vec<ReplacementRule>,
}

impl RuleTables {
    pub fn builtin() -> Result<Self, Error> {
        Self::compile(&RuleTablesConfig::from_ron_str(BUILTIN_RULES)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::compile(&RuleTablesConfig::load_from_file(path)?)
    }

    pub fn compile(config: &RuleTablesConfig) -> Result<Self, Error> {
        let mut phrases: Vec<String> = config
            .protected_phrases
            .iter()
            .map(|phrase| phrase.trim().to_lowercase())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        // Longest first, so "ils runway" wins over "runway".
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();
        if phrases.len() > MAX_PROTECTED_PHRASES {
            return Err(Error::TooManyProtectedPhrases(phrases.len()));
        }

        let protected = phrases
            .into_iter()
            .map(|phrase| {
                Ok(ProtectedPhrase {
                    matcher: word_regex(&phrase)?,
                    phrase,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let lexical = config
            .lexical_rules
            .iter()
            .map(ReplacementRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        let structural = config
            .structural_rules
            .iter()
            .map(ReplacementRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Compiled rule tables: {} protected phrases, {} lexical rules, {} structural rules",
            protected.len(),
            lexical.len(),
            structural.len()
        );
        Ok(Self {
            protected,
            lexical,
            structural,
        })
    }

    pub fn protected_phrases(&self) -> &[ProtectedPhrase] {
        &self.protected
    }

    pub fn lexical_rules(&self) -> &[ReplacementRule] {
        &self.lexical
    }

    pub fn structural_rules(&self) -> &[ReplacementRule] {
        &self.structural
    }
}

fn word_regex(phrase: &str) -> Result<Regex, regex::Error> {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"\b{body}\b"))
}
