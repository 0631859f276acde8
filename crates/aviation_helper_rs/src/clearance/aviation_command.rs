use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::types::{
    altitude::{Altitude, VerticalDirection},
    heading::{Heading, TurnDirection},
    runway::Runway,
    speed::Speed,
    transponder::SquawkCode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ApproachKind {
    Ils,
    Rnav,
    Visual,
}

impl ApproachKind {
    pub fn code(self) -> char {
        match self {
            ApproachKind::Ils => 'I',
            ApproachKind::Rnav => 'R',
            ApproachKind::Visual => 'V',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ApproachForm {
    Expect,
    Cleared,
}

impl ApproachForm {
    pub fn prefix(self) -> char {
        match self {
            ApproachForm::Expect => 'E',
            ApproachForm::Cleared => 'C',
        }
    }
}

/// One instruction in the client's compact grammar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum CommandToken {
    /// `D160` / `C080`
    ChangeAltitude {
        direction: VerticalDirection,
        altitude: Altitude,
    },
    /// `ED` / `EC`
    Expedite(VerticalDirection),
    /// `H270`
    FlyHeading(Heading),
    /// `l090` / `r150`
    TurnHeading {
        turn_direction: TurnDirection,
        heading: Heading,
    },
    /// `S210`
    Speed(Speed),
    SaySpeed,
    ContactTower,
    FrequencyChange,
    /// `EI28L` / `CR04`
    Approach {
        form: ApproachForm,
        kind: ApproachKind,
        runway: Runway,
    },
    /// `EMTV` / `CMTV`
    NamedVisualApproach { form: ApproachForm, code: String },
    /// `DJANKE`
    ProceedDirect(String),
    InterceptLocalizer,
    CancelApproachClearance,
    ClimbViaSid,
    Ident,
    ResumeNormalSpeed,
    SayHeading,
    Squawk(SquawkCode),
    ResumeOwnNavigation,
}

impl Display for CommandToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandToken::ChangeAltitude {
                direction,
                altitude,
            } => write!(f, "{}{altitude}", direction.prefix()),
            CommandToken::Expedite(direction) => write!(f, "E{}", direction.prefix()),
            CommandToken::FlyHeading(heading) => write!(f, "H{heading}"),
            CommandToken::TurnHeading {
                turn_direction,
                heading,
            } => write!(f, "{}{heading}", turn_direction.prefix()),
            CommandToken::Speed(speed) => write!(f, "S{speed}"),
            CommandToken::SaySpeed => f.write_str("SS"),
            CommandToken::ContactTower => f.write_str("TO"),
            CommandToken::FrequencyChange => f.write_str("FC"),
            CommandToken::Approach { form, kind, runway } => {
                write!(f, "{}{}{runway}", form.prefix(), kind.code())
            }
            CommandToken::NamedVisualApproach { form, code } => {
                write!(f, "{}{code}", form.prefix())
            }
            CommandToken::ProceedDirect(fix) => write!(f, "D{fix}"),
            CommandToken::InterceptLocalizer => f.write_str("I"),
            CommandToken::CancelApproachClearance => f.write_str("CAC"),
            CommandToken::ClimbViaSid => f.write_str("CVS"),
            CommandToken::Ident => f.write_str("ID"),
            CommandToken::ResumeNormalSpeed => f.write_str("S"),
            CommandToken::SayHeading => f.write_str("SH"),
            CommandToken::Squawk(code) => write!(f, "SQ{code}"),
            CommandToken::ResumeOwnNavigation => f.write_str("RON"),
        }
    }
}

/// A callsign plus at least one instruction. Renders as `;CALLSIGN TOKEN TOKEN ...`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Command {
    pub callsign: String,
    pub tokens: Vec<CommandToken>,
}

impl Command {
    /// Returns `None` for an empty token list: a bare callsign is never a command.
    pub fn new(callsign: impl Into<String>, tokens: Vec<CommandToken>) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            callsign: callsign.into(),
            tokens,
        })
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ";{}", self.callsign)?;
        for token in &self.tokens {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::runway::RunwaySide;

    #[test]
    fn test_token_grammar() {
        let runway = Runway::new(28, Some(RunwaySide::Left)).unwrap();
        let cases = [
            (
                CommandToken::ChangeAltitude {
                    direction: VerticalDirection::Descend,
                    altitude: Altitude::from_feet(16000).unwrap(),
                },
                "D160",
            ),
            (CommandToken::Expedite(VerticalDirection::Climb), "EC"),
            (CommandToken::FlyHeading(Heading::new(270).unwrap()), "H270"),
            (
                CommandToken::TurnHeading {
                    turn_direction: TurnDirection::Left,
                    heading: Heading::new(90).unwrap(),
                },
                "l090",
            ),
            (CommandToken::Speed(Speed::new(210).unwrap()), "S210"),
            (
                CommandToken::Approach {
                    form: ApproachForm::Expect,
                    kind: ApproachKind::Ils,
                    runway,
                },
                "EI28L",
            ),
            (
                CommandToken::Approach {
                    form: ApproachForm::Cleared,
                    kind: ApproachKind::Rnav,
                    runway: Runway::new(4, None).unwrap(),
                },
                "CR04",
            ),
            (
                CommandToken::NamedVisualApproach {
                    form: ApproachForm::Expect,
                    code: "MTV".to_owned(),
                },
                "EMTV",
            ),
            (CommandToken::ProceedDirect("JANKE".to_owned()), "DJANKE"),
            (CommandToken::Squawk("1200".parse().unwrap()), "SQ1200"),
        ];
        for (token, expected) in cases {
            assert_eq!(token.to_string(), expected);
        }
    }

    #[test]
    fn test_command_rendering() {
        let command = Command::new(
            "452",
            vec![
                CommandToken::ChangeAltitude {
                    direction: VerticalDirection::Descend,
                    altitude: Altitude::from_feet(5000).unwrap(),
                },
                CommandToken::ContactTower,
            ],
        )
        .unwrap();
        assert_eq!(command.to_string(), ";452 D050 TO");
        assert!(Command::new("452", vec![]).is_none());
    }
}
