//! Transcript normalizer
//!
//! Turns raw speech-to-text output into a canonical lowercase form: digits instead of number
//! words, single letters instead of phonetic alphabet words, and a stable vocabulary for
//! command phrases. The input is lowercased and stripped of punctuation other than `,` `.` `-`,
//! then rewritten in passes of fixed order:
//!
//! 1. replace protected phrases with placeholders
//! 2. lexical rules
//! 3. structural rules
//! 4. restore placeholders
//! 5. collapse whitespace
//!
//! Passes repeat until the text stops changing, so normalizing a normalized transcript is a
//! no-op.

use crate::{
    Error,
    rules::{ReplacementRule, RuleTables},
};

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';
const PLACEHOLDER_BASE: u32 = 0xE100;
const MAX_PASSES: usize = 32;

#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: RuleTables,
}

impl Normalizer {
    pub fn new(rules: RuleTables) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Result<Self, Error> {
        Ok(Self::new(RuleTables::builtin()?))
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    /// Total: any input yields a (possibly empty) string.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(&strip_punctuation(raw));
        for pass in 1..=MAX_PASSES {
            let next = self.rewrite(text.clone());
            if next == text {
                log::trace!("Normalized {raw:?} -> {text:?} in {pass} passes");
                return text;
            }
            text = next;
        }
        log::warn!("Normalizing {raw:?} did not settle after {MAX_PASSES} passes");
        text
    }

    fn rewrite(&self, mut text: String) -> String {
        let shielded = self.protect(&mut text);
        text = apply_all(self.rules.lexical_rules(), text);
        text = apply_all(self.rules.structural_rules(), text);
        for (placeholder, phrase) in shielded {
            text = text.replace(&placeholder, phrase);
        }
        collapse_whitespace(&text)
    }

    fn protect(&self, text: &mut String) -> Vec<(String, &str)> {
        let mut shielded = Vec::new();
        for (index, protected) in self.rules.protected_phrases().iter().enumerate() {
            if !protected.matcher.is_match(text) {
                continue;
            }
            let Some(placeholder) = placeholder(index) else {
                break;
            };
            *text = protected
                .matcher
                .replace_all(text, regex::NoExpand(&placeholder))
                .into_owned();
            shielded.push((placeholder, protected.phrase.as_str()));
        }
        shielded
    }
}

/// Private-use characters never survive punctuation stripping, so placeholders cannot collide
/// with transcript text.
fn placeholder(index: usize) -> Option<String> {
    let offset = u32::try_from(index).ok()?;
    let marker = char::from_u32(PLACEHOLDER_BASE.checked_add(offset)?)?;
    Some(format!("{PLACEHOLDER_OPEN}{marker}{PLACEHOLDER_CLOSE}"))
}

fn strip_punctuation(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, ',' | '.' | '-'))
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn apply_all(rules: &[ReplacementRule], text: String) -> String {
    rules.iter().fold(text, |text, rule| rule.apply(&text))
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::rules::{RuleSpec, RuleTablesConfig};

    static NORMALIZER: LazyLock<Normalizer> = LazyLock::new(|| Normalizer::builtin().unwrap());

    fn tables(protected: &[&str], lexical: Vec<RuleSpec>) -> RuleTables {
        RuleTables::compile(&RuleTablesConfig {
            protected_phrases: protected.iter().map(|p| (*p).to_owned()).collect(),
            lexical_rules: lexical,
            structural_rules: vec![],
        })
        .unwrap()
    }

    #[test]
    fn test_transmissions() {
        let cases = [
            (
                "SkyWest four five two, descend and maintain five thousand",
                "skywest 452 descend and maintain 5 thousand",
            ),
            (
                "Delta one two three turn left heading two seven zero",
                "delta 123 turn left heading 270",
            ),
            (
                "American four five six cleared ILS runway two eight left",
                "american 456 cleared ils runway 28 left",
            ),
            (
                "November one two three alpha bravo maintain eight thousand",
                "n 123ab maintain 8 thousand",
            ),
            ("squawk one two zero zero", "squawk 1200"),
            ("fly heading tree six zero", "heading 360"),
            ("reduce speed to two twenty five knots", "reduce speed to 225 knots"),
            ("climb to maintain one one thousand", "climb and maintain 11 thousand"),
            ("descend and maintain 4,000", "descend and maintain 4000"),
            ("runway 2-8 right", "runway 28 right"),
        ];
        for (raw, expected) in cases {
            assert_eq!(NORMALIZER.normalize(raw), expected, "input: {raw}");
        }
    }

    #[test]
    fn test_digit_runs() {
        let cases = [
            (
                "November one two three four five maintain eight thousand",
                "n 12345 maintain 8 thousand",
            ),
            ("November one two three four five alpha bravo", "n 12345ab"),
            ("squawk seven seven zero zero", "squawk 7700"),
            ("heading two seventy", "heading 270"),
            ("runway 1-2-3-4", "runway 1234"),
        ];
        for (raw, expected) in cases {
            let once = NORMALIZER.normalize(raw);
            assert_eq!(once, expected, "input: {raw}");
            assert_eq!(NORMALIZER.normalize(&once), once, "input: {raw}");
        }
    }

    #[test]
    fn test_rewrites_settle() {
        assert_eq!(
            NORMALIZER.normalize("fly fly heading two seven zero"),
            "heading 270"
        );
        assert_eq!(NORMALIZER.normalize("one alpha bravo charlie"), "1ab c");
    }

    #[test]
    fn test_punctuation_and_whitespace() {
        assert_eq!(
            NORMALIZER.normalize("  Delta 123?!   Turn   LEFT; heading 270.  "),
            "delta 123 turn left heading 270"
        );
        assert_eq!(NORMALIZER.normalize(""), "");
        assert_eq!(NORMALIZER.normalize("?!;:"), "");
    }

    #[test]
    fn test_rule_order_compounds() {
        // "clair" becomes "clear" first, which the later "clear direct" rule then rewrites.
        assert_eq!(
            NORMALIZER.normalize("clair direct janke"),
            "cleared direct janke"
        );
        assert_eq!(NORMALIZER.normalize("remember one"), "n 1");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "SkyWest four five two, descend and maintain five thousand",
            "Delta one two three turn left heading two seven zero",
            "American four five six cleared ILS runway two eight left",
            "November one two three alpha bravo maintain eight thousand",
            "united 12 expect the rnav runway 1 9",
            "clair direct janke",
            "squawk one two zero zero and ident",
        ];
        for raw in inputs {
            let once = NORMALIZER.normalize(raw);
            assert_eq!(NORMALIZER.normalize(&once), once, "input: {raw}");
        }
    }

    #[test]
    fn test_protected_phrases_survive_rules() {
        let lexical = vec![RuleSpec::Word("delta".into(), "d".into())];
        let unprotected = Normalizer::new(tables(&[], lexical.clone()));
        assert_eq!(unprotected.normalize("delta 12"), "d 12");

        let protected = Normalizer::new(tables(&["delta"], lexical));
        assert_eq!(protected.normalize("delta 12"), "delta 12");
    }

    #[test]
    fn test_longest_protected_phrase_wins() {
        let lexical = vec![
            RuleSpec::Word("ils".into(), "x".into()),
            RuleSpec::Word("runway".into(), "y".into()),
        ];
        let normalizer = Normalizer::new(tables(&["runway", "ils runway"], lexical));
        assert_eq!(normalizer.normalize("ils runway 28"), "ils runway 28");
        assert_eq!(normalizer.normalize("ils approach"), "x approach");
    }

    #[test]
    fn test_placeholder_lookalikes_are_stripped() {
        let spoofed = format!(
            "delta {PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE} one",
            char::from_u32(PLACEHOLDER_BASE).unwrap()
        );
        assert_eq!(NORMALIZER.normalize(&spoofed), "delta 1");
    }
}
