//! # Value Delivery
//!
//! Bridges a finished parse to application types. A caller hands in a
//! [`CommandPopulator`]; after the parse, every command node along the
//! matched chain delivers its bound values to it, and buffered unknown
//! tokens go to the populator's [`UnknownOptionSink`].

use std::collections::{BTreeMap, HashMap};

use crate::command::ProcessedCommand;
use crate::parser::{CommandLineParser, Mode, ParserError, ParserResult};

/// Receiver for tokens a lenient command buffered instead of rejecting.
pub trait UnknownOptionSink {
    /// Called once per buffered token, in line order.
    fn unknown_option(&mut self, _token: &str) {}
}

/// Receiver for the bound values of one parsed command node.
pub trait CommandPopulator: UnknownOptionSink {
    /// Called once per delivered command, parents before children.
    fn populate(&mut self, command: &ProcessedCommand);
}

/// A populator that collects everything into plain maps, keyed by
/// option name. Handy for tests and for callers without their own
/// target type.
#[derive(Debug, Clone, Default)]
pub struct MapPopulator {
    values: HashMap<String, Vec<String>>,
    properties: HashMap<String, BTreeMap<String, String>>,
    arguments: Vec<String>,
    unknown_options: Vec<String>,
    visited: Vec<String>,
}

impl MapPopulator {
    /// Creates an empty populator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The first value bound to `option`, if any.
    pub fn value(&self, option: &str) -> Option<&str> {
        self.values
            .get(option)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value bound to `option`, in line order.
    pub fn values(&self, option: &str) -> &[String] {
        self.values.get(option).map_or(&[], Vec::as_slice)
    }

    /// The key=value pairs bound to a map-valued `option`.
    pub fn properties(&self, option: &str) -> Option<&BTreeMap<String, String>> {
        self.properties.get(option)
    }

    /// Argument values, in line order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Tokens buffered by lenient commands, in line order.
    pub fn unknown_options(&self) -> &[String] {
        &self.unknown_options
    }

    /// Names of the commands delivered so far, parents first.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }
}

impl UnknownOptionSink for MapPopulator {
    fn unknown_option(&mut self, token: &str) {
        self.unknown_options.push(token.to_string());
    }
}

impl CommandPopulator for MapPopulator {
    fn populate(&mut self, command: &ProcessedCommand) {
        self.visited.push(command.name().to_string());
        for option in command.options() {
            if !option.values().is_empty() {
                self.values
                    .insert(option.name().to_string(), option.values().to_vec());
            }
            if !option.properties().is_empty() {
                self.properties
                    .insert(option.name().to_string(), option.properties().clone());
            }
        }
        if let Some(argument) = command.argument() {
            self.arguments.extend(argument.values().iter().cloned());
        }
    }
}

impl CommandLineParser {
    /// Parses `line` and delivers the bound values to `populator`.
    ///
    /// In [`Mode::Validate`] a recorded error is returned before the
    /// populator runs. In [`Mode::Strict`] the populator always sees
    /// what did bind and the first recorded error is returned
    /// afterwards. [`Mode::Completion`] never returns an error.
    pub fn populate(
        &mut self,
        line: &str,
        mode: Mode,
        populator: &mut dyn CommandPopulator,
    ) -> ParserResult<()> {
        self.parse_with_mode(line, mode);
        if mode == Mode::Validate
            && let Some(error) = self.first_error()
        {
            return Err(error);
        }
        self.run_populator(populator);
        if mode == Mode::Strict
            && let Some(error) = self.first_error()
        {
            return Err(error);
        }
        Ok(())
    }

    /// The first error the last parse recorded anywhere in the tree.
    fn first_error(&self) -> Option<ParserError> {
        if let Some(error) = self.command().errors().first() {
            return Some(error.clone());
        }
        self.children().iter().find_map(CommandLineParser::first_error)
    }

    /// Delivers this node and every descendant the parse reached.
    fn run_populator(&self, populator: &mut dyn CommandPopulator) {
        log::trace!("delivering '{}'", self.command().name());
        populator.populate(self.command());
        for token in self.command().unknown_options() {
            populator.unknown_option(token);
        }
        for child in self.children() {
            if child.contains_matched() {
                child.run_populator(populator);
            }
        }
    }
}

// MARK: --- UNIT TESTS ---
