//! # Command Grammar Model
//!
//! A command node as the parser sees it: name, aliases, declared options
//! and arguments, plus the per-parse state a walk accumulates (bound
//! values, recorded errors, the completion verdict, buffered unknown
//! option tokens). Nodes are built once and reused across parses;
//! [`ProcessedCommand::clear`] resets the per-parse half.

pub mod builder;
pub mod option;

pub use option::{OptionKind, ProcessedOption};

use crate::parser::completion::CompleteStatus;
use crate::parser::error::ParserError;

/// How an input word addressed an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionForm {
    /// Matched through `--name` or `--name=value`.
    Long,
    /// Matched through `-c`, `-cvalue` or `-c=value`.
    Short,
}

/// The positional argument slot of a command.
///
/// A command declares at most one slot; `multiple` decides whether it
/// accepts one value or many.
#[derive(Debug, Clone)]
pub struct ProcessedArgument {
    name: String,
    description: String,
    required: bool,
    multiple: bool,
    values: Vec<String>,
}

impl ProcessedArgument {
    pub(crate) fn new(name: String, description: String, required: bool, multiple: bool) -> Self {
        Self {
            name,
            description,
            required,
            multiple,
            values: Vec::new(),
        }
    }

    /// Display name used in messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether a parse without a bound value is a violation.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether this slot accepts more than one value.
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    /// The first bound value, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// All bound values, in input order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn add_value(&mut self, value: String) {
        self.values.push(value);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }
}

/// One node of a command grammar.
#[derive(Debug, Clone)]
pub struct ProcessedCommand {
    name: String,
    aliases: Vec<String>,
    description: String,
    options: Vec<ProcessedOption>,
    argument: Option<ProcessedArgument>,
    accept_unknown_options: bool,
    required_check: Option<fn(&str) -> bool>,
    errors: Vec<ParserError>,
    complete_status: Option<CompleteStatus>,
    unknown_options: Vec<String>,
}

impl ProcessedCommand {
    pub(crate) fn new(
        name: String,
        aliases: Vec<String>,
        description: String,
        options: Vec<ProcessedOption>,
        argument: Option<ProcessedArgument>,
        accept_unknown_options: bool,
        required_check: Option<fn(&str) -> bool>,
    ) -> Self {
        Self {
            name,
            aliases,
            description,
            options,
            argument,
            accept_unknown_options,
            required_check,
            errors: Vec::new(),
            complete_status: None,
            unknown_options: Vec::new(),
        }
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names the command answers to.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True when `word` is the command name or one of its aliases.
    pub fn answers_to(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|alias| alias == word)
    }

    /// The declared options, in declaration order.
    pub fn options(&self) -> &[ProcessedOption] {
        &self.options
    }

    /// The option at `index` in declaration order.
    pub fn option(&self, index: usize) -> Option<&ProcessedOption> {
        self.options.get(index)
    }

    pub(crate) fn option_mut(&mut self, index: usize) -> Option<&mut ProcessedOption> {
        self.options.get_mut(index)
    }

    /// Looks an option up by its long name.
    pub fn find_long_option(&self, name: &str) -> Option<&ProcessedOption> {
        self.options.iter().find(|option| option.name() == name)
    }

    /// Resolves an option-addressing word to a declared option.
    ///
    /// `--rest` matches an exact long name, or (when `rest` contains a
    /// `=`) the option whose `name=` prefixes it. `-rest` matches the
    /// first option whose short name equals the first character, which
    /// is what lets `-fX`, `-Dk=v` and `-e=bar` resolve.
    pub fn search_all_options(&self, word: &str) -> Option<(usize, OptionForm)> {
        if let Some(rest) = word.strip_prefix("--") {
            let mut found = self.options.iter().position(|option| option.name() == rest);
            if found.is_none() && rest.contains('=') {
                found = self.options.iter().position(|option| {
                    rest.strip_prefix(option.name())
                        .is_some_and(|tail| tail.starts_with('='))
                });
            }
            found.map(|index| (index, OptionForm::Long))
        } else if let Some(rest) = word.strip_prefix('-')
            && let Some(first) = rest.chars().next()
        {
            self.options
                .iter()
                .position(|option| option.short_name() == Some(first))
                .map(|index| (index, OptionForm::Short))
        } else {
            None
        }
    }

    /// Long names starting with `prefix`, in declaration order.
    pub fn possible_long_names(&self, prefix: &str) -> Vec<&str> {
        self.options
            .iter()
            .filter(|option| option.name().starts_with(prefix))
            .map(ProcessedOption::name)
            .collect()
    }

    /// The positional argument slot, if one is declared.
    pub fn argument(&self) -> Option<&ProcessedArgument> {
        self.argument.as_ref()
    }

    /// True when a single-value argument slot is declared.
    pub fn has_argument(&self) -> bool {
        self.argument.as_ref().is_some_and(|a| !a.multiple())
    }

    /// True when a multi-value argument slot is declared.
    pub fn has_arguments(&self) -> bool {
        self.argument.as_ref().is_some_and(ProcessedArgument::multiple)
    }

    /// True when the single-value argument slot is still empty.
    pub fn has_argument_with_no_value(&self) -> bool {
        self.argument
            .as_ref()
            .is_some_and(|a| !a.multiple() && a.values().is_empty())
    }

    pub(crate) fn add_argument_value(&mut self, value: &str) {
        if let Some(argument) = self.argument.as_mut() {
            argument.add_value(value.to_string());
        }
    }

    /// Whether undeclared option tokens are buffered instead of rejected.
    pub fn accepts_unknown_options(&self) -> bool {
        self.accept_unknown_options
    }

    /// The custom required-option hook, if one was declared.
    pub fn required_check(&self) -> Option<fn(&str) -> bool> {
        self.required_check
    }

    /// Errors the current parse has recorded, in input order.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// True when the current parse recorded at least one error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn add_error(&mut self, error: ParserError) {
        log::debug!("recording parse error on '{}': {}", self.name, error);
        self.errors.push(error);
    }

    /// The completion verdict of the current parse, if one was resolved.
    pub fn complete_status(&self) -> Option<&CompleteStatus> {
        self.complete_status.as_ref()
    }

    pub(crate) fn set_complete_status(&mut self, status: CompleteStatus) {
        self.complete_status = Some(status);
    }

    /// Undeclared option tokens buffered by the current parse.
    pub fn unknown_options(&self) -> &[String] {
        &self.unknown_options
    }

    pub(crate) fn add_unknown_option(&mut self, token: String) {
        self.unknown_options.push(token);
    }

    /// Resets every piece of per-parse state on this node.
    pub fn clear(&mut self) {
        for option in &mut self.options {
            option.clear();
        }
        if let Some(argument) = self.argument.as_mut() {
            argument.clear();
        }
        self.errors.clear();
        self.complete_status = None;
        self.unknown_options.clear();
    }

    /// One-line usage summary.
    pub fn print_help(&self) -> String {
        if self.description.is_empty() {
            format!("Usage: {}", self.name)
        } else {
            format!("Usage: {} {}", self.name, self.description)
        }
    }

    /// One-line `name : description` summary.
    pub fn print_description(&self) -> String {
        format!("{} : {}", self.name, self.description)
    }
}

// MARK: --- UNIT TESTS ---
