//! ATC Recognition Library
//!
//! Turns controller transmissions, as produced by a speech-to-text engine, into the compact
//! command strings a radar simulator client accepts:
//!
//! ```text
//! "SkyWest four five two, descend and maintain five thousand"  ->  ";452 D050"
//! ```
//!
//! The work is split into a [`Normalizer`] (rule-table driven text cleanup) and a
//! [`CommandSynthesizer`] (callsign, entity and intent extraction plus fix resolution).
//! [`CommandPipeline`] chains the two.

pub mod callsign;
pub mod delivery;
pub mod entities;
pub mod errors;
pub mod fix_resolver;
pub mod fuzzy;
pub mod gazetteer;
pub mod normalizer;
pub mod rules;
pub mod speech_to_text;
pub mod synthesizer;

pub use delivery::{CommandSink, WriterSink};
pub use errors::{Error, Issue, Rejection};
pub use fix_resolver::{FixResolver, ResolverConfig};
pub use gazetteer::{AirportScope, Gazetteer};
pub use normalizer::Normalizer;
pub use rules::RuleTables;
pub use speech_to_text::Transcriber;
pub use synthesizer::{CommandSynthesizer, Synthesized};

pub use aviation_helper_rs::clearance::aviation_command::{Command, CommandToken};

use aviation_helper_rs::clearance::airlines::{CallsignDesignator, known_designators};

/// Raw transcript in, command out.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    normalizer: Normalizer,
    synthesizer: CommandSynthesizer,
}

impl CommandPipeline {
    pub fn new(normalizer: Normalizer, synthesizer: CommandSynthesizer) -> Self {
        Self {
            normalizer,
            synthesizer,
        }
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    pub fn interpret(&self, raw: &str) -> Result<Synthesized, Rejection> {
        let normalized = self.normalize(raw);
        match self.synthesizer.interpret(&normalized) {
            Ok(found) => {
                log::info!("{raw:?} -> {}", found.command);
                Ok(found)
            }
            Err(rejection) => {
                log::info!("{raw:?} ignored: {rejection} (normalized: {normalized:?})");
                Err(rejection)
            }
        }
    }

    /// `None` means nothing should be sent for this transmission.
    pub fn process(&self, raw: &str) -> Option<Command> {
        self.interpret(raw).ok().map(|found| found.command)
    }

    pub fn resolver(&self) -> &FixResolver {
        self.synthesizer.resolver()
    }
}

/// Assembles a [`CommandPipeline`]. Unset parts fall back to the built-in rule tables, the
/// built-in airline telephony table and an empty gazetteer.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    rules: Option<RuleTables>,
    designators: Vec<CallsignDesignator>,
    gazetteer: Option<Gazetteer>,
    resolver_config: ResolverConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            rules: None,
            designators: known_designators(),
            gazetteer: None,
            resolver_config: ResolverConfig::default(),
        }
    }

    pub fn rules(mut self, rules: RuleTables) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Adds designators, typically from an airline database, after the built-in ones.
    pub fn designators(mut self, designators: impl IntoIterator<Item = CallsignDesignator>) -> Self {
        self.designators.extend(designators);
        self
    }

    pub fn gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    pub fn resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    pub fn build(self) -> Result<CommandPipeline, Error> {
        let rules = match self.rules {
            Some(rules) => rules,
            None => RuleTables::builtin()?,
        };
        let gazetteer = self
            .gazetteer
            .unwrap_or_else(|| Gazetteer::empty(AirportScope::default()));
        let resolver = FixResolver::new(gazetteer, self.resolver_config);
        let synthesizer = CommandSynthesizer::new(&self.designators, resolver)?;
        Ok(CommandPipeline::new(Normalizer::new(rules), synthesizer))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let pipeline = CommandPipeline::builder().build().unwrap();
        assert_eq!(
            pipeline
                .process("SkyWest four five two, descend and maintain five thousand")
                .map(|command| command.to_string()),
            Some(";452 D050".to_owned())
        );
        assert!(pipeline.resolver().gazetteer().is_empty());
        assert_eq!(
            pipeline.interpret("delta one two three cleared direct janke").unwrap_err(),
            Rejection::NoIntentRecognized {
                callsign: "123".to_owned()
            }
        );
    }

    #[test]
    fn test_extra_designators() {
        let pipeline = CommandPipeline::builder()
            .designators([CallsignDesignator {
                icao: "XAA".to_owned(),
                spoken: vec!["zephyr".to_owned()],
            }])
            .build()
            .unwrap();
        assert_eq!(
            pipeline
                .process("zephyr one two a turn right heading zero niner zero")
                .map(|command| command.to_string()),
            Some(";12A r090".to_owned())
        );
    }
}
