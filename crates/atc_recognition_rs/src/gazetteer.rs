//! Navigation fix gazetteer
//!
//! The source file is a JSON object keyed by airport code, plus a `GENERAL` scope shared by all
//! airports. Each scope maps a written fix identifier to one spoken form or a list of them:
//!
//! ```json
//! { "KDCA": { "JANKE": "janke", "BOOKE": ["book", "booky"] }, "GENERAL": { "SWANN": "swan" } }
//! ```

use std::{
    collections::BTreeMap,
    convert::Infallible,
    fmt::Display,
    path::Path,
    str::FromStr,
};

use serde::Deserialize;

use crate::Error;

pub const GENERAL_SCOPE: &str = "GENERAL";

/// Which airports' fixes are loaded. `GENERAL` fixes are always included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AirportScope {
    Airport(String),
    All,
    #[default]
    GeneralOnly,
}

impl FromStr for AirportScope {
    type Err = Infallible;

    /// Empty input selects only the general fixes, `ALL` selects every airport.
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        let code = val.trim().to_uppercase();
        let scope = match code.as_str() {
            "" => AirportScope::GeneralOnly,
            "ALL" => AirportScope::All,
            _ => AirportScope::Airport(code),
        };
        Ok(scope)
    }
}

impl Display for AirportScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AirportScope::Airport(code) => f.write_str(code),
            AirportScope::All => f.write_str("ALL"),
            AirportScope::GeneralOnly => f.write_str(GENERAL_SCOPE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixEntry {
    /// Uppercase identifier as it appears in commands.
    pub written: String,
    /// Uppercase spoken forms, punctuation other than hyphens removed.
    pub spoken_variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpokenForms {
    One(String),
    Many(Vec<String>),
}

impl SpokenForms {
    fn into_vec(self) -> Vec<String> {
        match self {
            SpokenForms::One(form) => vec![form],
            SpokenForms::Many(forms) => forms,
        }
    }
}

/// Fixes visible under one airport scope, airport-specific entries taking precedence over
/// general ones. Entries are ordered by written identifier.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    scope: AirportScope,
    entries: Vec<FixEntry>,
    airports: Vec<String>,
}

impl Gazetteer {
    pub fn empty(scope: AirportScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str, scope: AirportScope) -> Result<Self, Error> {
        let json = json.strip_prefix('\u{FEFF}').unwrap_or(json);
        let scopes: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let airports: Vec<String> = scopes
            .keys()
            .filter(|key| key.as_str() != GENERAL_SCOPE)
            .cloned()
            .collect();

        let mut selected: Vec<&str> = match &scope {
            AirportScope::Airport(code) => {
                if !scopes.contains_key(code) {
                    log::warn!("Airport {code} has no fixes in the gazetteer");
                }
                vec![code.as_str()]
            }
            AirportScope::All => airports.iter().map(String::as_str).collect(),
            AirportScope::GeneralOnly => vec![],
        };
        selected.push(GENERAL_SCOPE);

        let mut merged: BTreeMap<String, FixEntry> = BTreeMap::new();
        for key in selected {
            let Some(value) = scopes.get(key) else {
                continue;
            };
            let fixes: BTreeMap<String, SpokenForms> =
                match serde_json::from_value(value.clone()) {
                    Ok(fixes) => fixes,
                    Err(err) => {
                        log::warn!("Ignoring malformed gazetteer scope {key}: {err}");
                        continue;
                    }
                };
            for (written, forms) in fixes {
                let written = written.trim().to_uppercase();
                if written.is_empty() {
                    continue;
                }
                merged
                    .entry(written.clone())
                    .or_insert_with(|| FixEntry {
                        written,
                        spoken_variants: forms
                            .into_vec()
                            .iter()
                            .filter_map(|form| clean_variant(form))
                            .collect(),
                    });
            }
        }

        log::info!(
            "Loaded {} fixes for scope {scope} ({} airports available)",
            merged.len(),
            airports.len()
        );
        Ok(Self {
            scope,
            entries: merged.into_values().collect(),
            airports,
        })
    }

    pub fn load(path: impl AsRef<Path>, scope: AirportScope) -> Result<Self, Error> {
        let path = path.as_ref();
        let load_error = |reason: String| Error::GazetteerLoad {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|err| load_error(err.to_string()))?;
        Self::from_json_str(&content, scope).map_err(|err| load_error(err.to_string()))
    }

    /// Like [`Gazetteer::load`], but a missing or unreadable file leaves the gazetteer empty.
    pub fn load_or_empty(path: impl AsRef<Path>, scope: AirportScope) -> Self {
        match Self::load(path, scope.clone()) {
            Ok(gazetteer) => gazetteer,
            Err(err) => {
                log::warn!("{err}; direct-to-fix commands will not resolve");
                Self::empty(scope)
            }
        }
    }

    pub fn scope(&self) -> &AirportScope {
        &self.scope
    }

    pub fn entries(&self) -> &[FixEntry] {
        &self.entries
    }

    pub fn get(&self, written: &str) -> Option<&FixEntry> {
        let written = written.to_uppercase();
        self.entries
            .binary_search_by(|entry| entry.written.cmp(&written))
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Airport codes present in the source file, sorted.
    pub fn airports(&self) -> &[String] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn clean_variant(form: &str) -> Option<String> {
    let cleaned: String = form
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}
