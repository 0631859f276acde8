use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Std Io Error!")]
    StdIo(#[from] std::io::Error),
    #[error("Serde Json (de)serialization failed!")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Rule table is not valid RON: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
    #[error("{0} protected phrases exceed the placeholder range")]
    TooManyProtectedPhrases(usize),
    #[error("Invalid rule pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("Aviation Helper")]
    AviationHelper(#[from] aviation_helper_rs::errors::Error),
    #[error("Could not load gazetteer {path:?}: {reason}")]
    GazetteerLoad { path: PathBuf, reason: String },
    #[error("Command delivery failed: {0}")]
    Delivery(String),
    #[error("Whisper error: {0}")]
    WhisperError(String),
}

/// Why an utterance produced no command. These are expected outcomes, not failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("no callsign found")]
    NoCallsign,
    #[error("callsign {callsign} found but no instruction recognized")]
    NoIntentRecognized { callsign: String },
    #[error("transmission disregarded")]
    Disregarded,
}

/// A token that was dropped while the rest of the command was kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    UnresolvedFix {
        phrase: String,
        suggestions: Vec<(String, u8)>,
    },
    InvalidNumericRange {
        entity: &'static str,
        reason: String,
    },
}
