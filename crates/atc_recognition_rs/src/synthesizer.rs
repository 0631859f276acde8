//! Intent detection and command assembly
//!
//! Intents are checked in a fixed order (altitude, heading, speed, contact, approach, direct,
//! then the single-word specials) and each recognized intent appends its tokens. The result is
//! a callsign plus at least one token, or a [`Rejection`].

use aviation_helper_rs::{
    clearance::{
        airlines::CallsignDesignator,
        aviation_command::{ApproachForm, ApproachKind, Command, CommandToken},
    },
    types::{altitude::VerticalDirection, runway::Runway, transponder::SquawkCode},
};
use regex::Regex;

use crate::{
    Error, Issue, Rejection,
    callsign::CallsignExtractor,
    entities::{EntityExtractor, ExtractedEntities, SpeedInstruction},
    fix_resolver::FixResolver,
};

/// Phrases after "cancel" that are instructions rather than a retraction.
const CANCEL_INSTRUCTIONS: &[&str] = &["approach clearance", "speed restriction"];

struct NamedVisual {
    name: &'static str,
    code: &'static str,
    runway: u8,
}

const NAMED_VISUALS: &[NamedVisual] = &[
    NamedVisual {
        name: "mt vernon",
        code: "MTV",
        runway: 1,
    },
    NamedVisual {
        name: "river",
        code: "RIV",
        runway: 19,
    },
];

/// A command plus whatever was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub command: Command,
    pub entities: ExtractedEntities,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone)]
struct IntentMatchers {
    disregard: Regex,
    cancel: Regex,
    descend: Regex,
    climb: Regex,
    expedite: Regex,
    contact: Regex,
    tower: Regex,
    handoff: Regex,
    expect: Regex,
    visual: Regex,
    named_visuals: Vec<Regex>,
    intercept_localizer: Regex,
    cancel_approach: Regex,
    climb_via_sid: Regex,
    squawk: Regex,
    ident: Regex,
    resume_normal_speed: Regex,
    say_heading: Regex,
    resume_own_navigation: Regex,
}

impl IntentMatchers {
    fn new() -> Result<Self, Error> {
        Ok(Self {
            disregard: Regex::new(r"\bdisregard\b")?,
            cancel: Regex::new(r"\bcancel\b")?,
            descend: Regex::new(r"\bdescend\b")?,
            climb: Regex::new(r"\b(?:climb|maintain)\b")?,
            expedite: Regex::new(r"\bexpedite\b")?,
            contact: Regex::new(r"\bcontact\b")?,
            tower: Regex::new(r"\btower\b")?,
            handoff: Regex::new(r"\b(?:center|approach|departure)\b")?,
            expect: Regex::new(r"\bexpect\b")?,
            visual: Regex::new(r"\bvisual\b")?,
            named_visuals: NAMED_VISUALS
                .iter()
                .map(|visual| Regex::new(&format!(r"\b{}\b", regex::escape(visual.name))))
                .collect::<Result<_, _>>()?,
            intercept_localizer: Regex::new(r"\bintercept\s+(?:the\s+)?localizer\b")?,
            cancel_approach: Regex::new(r"\bcancel\s+approach\s+clearance\b")?,
            climb_via_sid: Regex::new(r"\bclimb\s+via\s+(?:the\s+)?sid\b")?,
            squawk: Regex::new(r"\bsquawk\s*(\d{4})\b")?,
            ident: Regex::new(r"\bident\b")?,
            resume_normal_speed: Regex::new(
                r"\b(?:cancel\s+speed\s+restrictions?|resume\s+normal\s+speed)\b",
            )?,
            say_heading: Regex::new(
                r"\b(?:say\s+present\s+heading|whats\s+your\s+heading|what\s+is\s+your\s+heading)\b",
            )?,
            resume_own_navigation: Regex::new(r"\bresume\s+own\s+navigation\b")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    callsign: CallsignExtractor,
    entities: EntityExtractor,
    resolver: FixResolver,
    intents: IntentMatchers,
}

impl CommandSynthesizer {
    pub fn new(designators: &[CallsignDesignator], resolver: FixResolver) -> Result<Self, Error> {
        Ok(Self {
            callsign: CallsignExtractor::new(designators)?,
            entities: EntityExtractor::new()?,
            resolver,
            intents: IntentMatchers::new()?,
        })
    }

    pub fn resolver(&self) -> &FixResolver {
        &self.resolver
    }

    /// The command for a normalized transcript, or `None` when nothing should be sent.
    pub fn synthesize(&self, normalized: &str) -> Option<Command> {
        self.interpret(normalized).ok().map(|found| found.command)
    }

    pub fn interpret(&self, normalized: &str) -> Result<Synthesized, Rejection> {
        let text = normalized.to_lowercase();
        let callsign = self.callsign.extract(&text).ok_or(Rejection::NoCallsign)?;
        if self.is_disregarded(&text) {
            return Err(Rejection::Disregarded);
        }

        let (entities, mut issues) = self.entities.extract(&text, Some(&callsign));
        let mut tokens = Vec::new();
        self.altitude_tokens(&text, &entities, &mut tokens);
        if let Some(heading) = entities.heading {
            tokens.push(match heading.turn {
                Some(turn_direction) => CommandToken::TurnHeading {
                    turn_direction,
                    heading: heading.heading,
                },
                None => CommandToken::FlyHeading(heading.heading),
            });
        }
        match entities.speed {
            Some(SpeedInstruction::Assign(speed)) => tokens.push(CommandToken::Speed(speed)),
            Some(SpeedInstruction::Say) => tokens.push(CommandToken::SaySpeed),
            None => {}
        }
        self.contact_tokens(&text, &mut tokens);
        self.approach_tokens(&text, entities.runway, &mut tokens);
        self.direct_tokens(&entities, &mut tokens, &mut issues);
        self.special_tokens(&text, &mut tokens, &mut issues);

        log::debug!("{callsign}: {tokens:?}");
        let command = Command::new(callsign.clone(), tokens)
            .ok_or(Rejection::NoIntentRecognized { callsign })?;
        Ok(Synthesized {
            command,
            entities,
            issues,
        })
    }

    fn is_disregarded(&self, text: &str) -> bool {
        if self.intents.disregard.is_match(text) {
            return true;
        }
        self.intents.cancel.find_iter(text).any(|found| {
            let rest = text[found.end()..].trim_start();
            !CANCEL_INSTRUCTIONS
                .iter()
                .any(|instruction| rest.starts_with(instruction))
        })
    }

    fn altitude_tokens(
        &self,
        text: &str,
        entities: &ExtractedEntities,
        tokens: &mut Vec<CommandToken>,
    ) {
        let direction = if self.intents.descend.is_match(text) {
            VerticalDirection::Descend
        } else if self.intents.climb.is_match(text) {
            VerticalDirection::Climb
        } else {
            return;
        };
        if self.intents.expedite.is_match(text) {
            tokens.push(CommandToken::Expedite(direction));
        } else if let Some(altitude) = entities.altitude {
            tokens.push(CommandToken::ChangeAltitude {
                direction,
                altitude,
            });
        }
    }

    fn contact_tokens(&self, text: &str, tokens: &mut Vec<CommandToken>) {
        if !self.intents.contact.is_match(text) {
            return;
        }
        if self.intents.tower.is_match(text) {
            tokens.push(CommandToken::ContactTower);
        } else if self.intents.handoff.is_match(text) {
            tokens.push(CommandToken::FrequencyChange);
        }
    }

    /// Named visuals first, then at most one approach per form: the kind spoken first.
    fn approach_tokens(
        &self,
        text: &str,
        runway: Option<Runway>,
        tokens: &mut Vec<CommandToken>,
    ) {
        let Some(runway) = runway else {
            return;
        };

        let mut named_form = None;
        if self.intents.visual.is_match(text) {
            let form = if self.intents.expect.is_match(text) {
                Some(ApproachForm::Expect)
            } else if text.contains("cleared") {
                Some(ApproachForm::Cleared)
            } else {
                None
            };
            let named = NAMED_VISUALS
                .iter()
                .zip(&self.intents.named_visuals)
                .find(|(visual, name)| visual.runway == runway.number() && name.is_match(text));
            if let (Some(form), Some((visual, _))) = (form, named) {
                tokens.push(CommandToken::NamedVisualApproach {
                    form,
                    code: visual.code.to_owned(),
                });
                named_form = Some(form);
            }
        }

        let approaches = self.entities.approaches(text);
        for form in [ApproachForm::Expect, ApproachForm::Cleared] {
            let Some(kind) = approaches
                .iter()
                .find(|(spoken, _)| *spoken == form)
                .map(|(_, kind)| *kind)
            else {
                continue;
            };
            if kind == ApproachKind::Visual && named_form == Some(form) {
                continue;
            }
            tokens.push(CommandToken::Approach { form, kind, runway });
        }
    }

    fn direct_tokens(
        &self,
        entities: &ExtractedEntities,
        tokens: &mut Vec<CommandToken>,
        issues: &mut Vec<Issue>,
    ) {
        let Some(phrase) = &entities.fix_phrase else {
            return;
        };
        match self.resolver.resolve_fix(phrase) {
            Some(fix) => tokens.push(CommandToken::ProceedDirect(fix)),
            None => {
                let suggestions = self.resolver.suggestions(phrase);
                log::warn!("Unknown fix {phrase:?}, closest matches: {suggestions:?}");
                issues.push(Issue::UnresolvedFix {
                    phrase: phrase.clone(),
                    suggestions,
                });
            }
        }
    }

    fn special_tokens(&self, text: &str, tokens: &mut Vec<CommandToken>, issues: &mut Vec<Issue>) {
        let intents = &self.intents;
        if intents.intercept_localizer.is_match(text) {
            tokens.push(CommandToken::InterceptLocalizer);
        }
        if intents.cancel_approach.is_match(text) {
            tokens.push(CommandToken::CancelApproachClearance);
        }
        if intents.climb_via_sid.is_match(text) {
            tokens.push(CommandToken::ClimbViaSid);
        }
        if let Some(caps) = intents.squawk.captures(text) {
            match caps[1].parse::<SquawkCode>() {
                Ok(code) => tokens.push(CommandToken::Squawk(code)),
                Err(err) => {
                    log::warn!("Dropping squawk: {err}");
                    issues.push(Issue::InvalidNumericRange {
                        entity: "squawk",
                        reason: err.to_string(),
                    });
                }
            }
        }
        if intents.ident.is_match(text) {
            tokens.push(CommandToken::Ident);
        }
        if intents.resume_normal_speed.is_match(text) {
            tokens.push(CommandToken::ResumeNormalSpeed);
        }
        if intents.say_heading.is_match(text) {
            tokens.push(CommandToken::SayHeading);
        }
        if intents.resume_own_navigation.is_match(text) {
            tokens.push(CommandToken::ResumeOwnNavigation);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use aviation_helper_rs::clearance::airlines::known_designators;

    use super::*;
    use crate::{
        fix_resolver::ResolverConfig,
        gazetteer::{AirportScope, Gazetteer},
    };

    static SYNTHESIZER: LazyLock<CommandSynthesizer> = LazyLock::new(|| {
        let gazetteer = Gazetteer::from_json_str(
            r#"{ "KDCA": { "JANKE": "janke" }, "GENERAL": { "SWANN": "swan" } }"#,
            AirportScope::Airport("KDCA".to_owned()),
        )
        .unwrap();
        let resolver = FixResolver::new(gazetteer, ResolverConfig::default());
        CommandSynthesizer::new(&known_designators(), resolver).unwrap()
    });

    fn command(text: &str) -> Option<String> {
        SYNTHESIZER.synthesize(text).map(|command| command.to_string())
    }

    fn assert_commands(cases: &[(&str, &str)]) {
        for (text, expected) in cases {
            assert_eq!(command(text).as_deref(), Some(*expected), "input: {text}");
        }
    }

    #[test]
    fn test_basic_instructions() {
        assert_commands(&[
            ("skywest 452 descend and maintain 5 thousand", ";452 D050"),
            ("delta 123 turn left heading 270", ";123 l270"),
            ("american 456 cleared ils runway 28 left", ";456 CI28L"),
            ("n 123ab maintain 8 thousand", ";123AB C080"),
            ("delta 12 fly heading 90", ";12 H090"),
            ("delta 123 turn right after departure fly heading 270", ";123 H270"),
            ("n 12345 maintain 8 thousand", ";12345 C080"),
            ("delta 12 expedite descend and maintain 5 thousand", ";12 ED"),
            ("delta 12 reduce speed to 180 knots", ";12 S180"),
            ("delta 12 say speed", ";12 SS"),
        ]);
    }

    #[test]
    fn test_token_order() {
        assert_commands(&[(
            "delta 123 contact tower descend and maintain 3 thousand turn right heading 090 \
             reduce speed to 180 knots",
            ";123 D030 r090 S180 TO",
        )]);
    }

    #[test]
    fn test_contact() {
        assert_commands(&[
            ("delta 12 contact washington center", ";12 FC"),
            ("delta 12 contact tower", ";12 TO"),
        ]);
        assert_eq!(command("delta 12 contact ground"), None);
    }

    #[test]
    fn test_approaches() {
        assert_commands(&[
            ("united 12 expect rnav runway 19", ";12 ER19"),
            ("delta 12 expect ils expect rnav runway 4 right", ";12 EI04R"),
            ("delta 12 expect ils runway 1 cleared visual", ";12 EI01 CV01"),
            ("jetblue 55 expect mt vernon visual runway 1", ";55 EMTV"),
            ("jetblue 55 cleared river visual runway 19", ";55 CRIV"),
        ]);
        assert_eq!(command("jetblue 55 cleared river visual runway 1"), None);
        assert_eq!(
            SYNTHESIZER
                .interpret("delta 12 cleared ils approach")
                .unwrap_err(),
            Rejection::NoIntentRecognized {
                callsign: "12".to_owned()
            }
        );
    }

    #[test]
    fn test_direct_to_fix() {
        assert_commands(&[
            ("delta 12 cleared direct janke", ";12 DJANKE"),
            ("delta 12 proceed direct swan", ";12 DSWANN"),
        ]);

        let found = SYNTHESIZER
            .interpret("delta 12 cleared direct zebra descend and maintain 5 thousand")
            .unwrap();
        assert_eq!(found.command.to_string(), ";12 D050");
        assert_eq!(found.entities.fix_phrase.as_deref(), Some("zebra"));
        match &found.issues[..] {
            [Issue::UnresolvedFix { phrase, suggestions }] => {
                assert_eq!(phrase, "zebra");
                assert_eq!(suggestions.len(), 3);
            }
            other => panic!("unexpected issues: {other:?}"),
        }
    }

    #[test]
    fn test_specials() {
        assert_commands(&[
            ("delta 12 intercept localizer", ";12 I"),
            ("delta 12 cancel approach clearance", ";12 CAC"),
            ("delta 12 climb via sid", ";12 CVS"),
            ("n 345 squawk 1200 and ident", ";345 SQ1200 ID"),
            ("delta 12 cancel speed restrictions", ";12 S"),
            ("delta 12 resume normal speed", ";12 S"),
            ("delta 12 say present heading", ";12 SH"),
            ("delta 12 whats your heading", ";12 SH"),
            ("delta 12 resume own navigation", ";12 RON"),
        ]);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            SYNTHESIZER
                .interpret("descend and maintain 5 thousand")
                .unwrap_err(),
            Rejection::NoCallsign
        );
        assert_eq!(
            SYNTHESIZER.interpret("delta 123 disregard").unwrap_err(),
            Rejection::Disregarded
        );
        assert_eq!(
            SYNTHESIZER
                .interpret("delta 123 descend and maintain 5 thousand cancel that")
                .unwrap_err(),
            Rejection::Disregarded
        );
        assert_eq!(
            SYNTHESIZER.interpret("delta 123 good day").unwrap_err(),
            Rejection::NoIntentRecognized {
                callsign: "123".to_owned()
            }
        );
        assert_eq!(command(""), None);
    }

    #[test]
    fn test_invalid_values_drop_only_their_token() {
        let found = SYNTHESIZER
            .interpret("delta 12 climb and maintain 150 thousand turn left heading 270")
            .unwrap();
        assert_eq!(found.command.to_string(), ";12 l270");
        assert!(matches!(
            found.issues[..],
            [Issue::InvalidNumericRange { entity: "altitude", .. }]
        ));

        assert_eq!(
            SYNTHESIZER.interpret("n 345 squawk 1280").unwrap_err(),
            Rejection::NoIntentRecognized {
                callsign: "345".to_owned()
            }
        );
    }
}
