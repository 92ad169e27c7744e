//! # Grammar Builders
//!
//! Fluent builders for command nodes and their option/argument
//! descriptors. A grammar is immutable once built; the builders are the
//! only construction path and reject declaration mistakes (unnamed
//! nodes, duplicate option names) before any parse can trip over them.

use thiserror::Error;

use super::option::{OptionKind, ProcessedOption};
use super::{ProcessedArgument, ProcessedCommand};

/// A mistake in a grammar declaration, caught at build time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A command was declared without a name.
    #[error("A command must have a name.")]
    MissingCommandName,

    /// An option was declared without a long name.
    #[error("An option on command '{command}' must have a name.")]
    MissingOptionName {
        /// The command carrying the unnamed option.
        command: String,
    },

    /// Two options on one command share a long name.
    #[error("The option name '{name}' is declared twice on command '{command}'.")]
    DuplicateOptionName {
        /// The command carrying both declarations.
        command: String,
        /// The contested long name.
        name: String,
    },

    /// Two options on one command share a short name.
    #[error("The short name '-{short}' is declared twice on command '{command}'.")]
    DuplicateShortName {
        /// The command carrying both declarations.
        command: String,
        /// The contested short name.
        short: char,
    },

    /// A command with sub-commands declared its own positional argument.
    #[error("The group command '{command}' cannot declare a positional argument.")]
    GroupWithArgument {
        /// The offending group command.
        command: String,
    },
}

/// Builder for one [`ProcessedOption`] descriptor.
#[derive(Debug, Clone)]
pub struct OptionBuilder {
    name: String,
    short_name: Option<char>,
    description: String,
    kind: OptionKind,
    required: bool,
    overrides_required: bool,
}

impl OptionBuilder {
    /// Starts an option with the given long name and scalar kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            description: String::new(),
            kind: OptionKind::Scalar,
            required: false,
            overrides_required: false,
        }
    }

    /// Sets the one-character short name.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short_name = Some(short);
        self
    }

    /// Sets the human readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the value shape.
    #[must_use]
    pub fn kind(mut self, kind: OptionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the option as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Lets a set value on this option excuse missing required options.
    #[must_use]
    pub fn overrides_required(mut self, overrides: bool) -> Self {
        self.overrides_required = overrides;
        self
    }

    fn build(self, command: &str) -> Result<ProcessedOption, BuilderError> {
        if self.name.is_empty() {
            return Err(BuilderError::MissingOptionName {
                command: command.to_string(),
            });
        }
        Ok(ProcessedOption::new(
            self.name,
            self.short_name,
            self.description,
            self.required,
            self.overrides_required,
            self.kind,
        ))
    }
}

/// Builder for the positional argument slot of a command.
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    name: String,
    description: String,
    required: bool,
    multiple: bool,
}

impl ArgumentBuilder {
    /// Starts a single-value argument slot with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: false,
            multiple: false,
        }
    }

    /// Sets the human readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the slot as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Lets the slot collect any number of values.
    #[must_use]
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
}

/// Builder for one [`ProcessedCommand`] grammar node.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    options: Vec<OptionBuilder>,
    argument: Option<ArgumentBuilder>,
    accept_unknown_options: bool,
    required_check: Option<fn(&str) -> bool>,
}

impl CommandBuilder {
    /// Starts a command with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            options: Vec::new(),
            argument: None,
            accept_unknown_options: false,
            required_check: None,
        }
    }

    /// Adds an alternative name the command answers to.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the human readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares an option.
    #[must_use]
    pub fn option(mut self, option: OptionBuilder) -> Self {
        self.options.push(option);
        self
    }

    /// Declares the positional argument slot.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentBuilder) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Buffers undeclared option tokens instead of rejecting them.
    #[must_use]
    pub fn accept_unknown_options(mut self, accept: bool) -> Self {
        self.accept_unknown_options = accept;
        self
    }

    /// Installs a custom required-option check run over the raw line.
    ///
    /// When the check returns `false` the parse skips the built-in
    /// missing-required scan and reports nothing.
    #[must_use]
    pub fn required_check(mut self, check: fn(&str) -> bool) -> Self {
        self.required_check = Some(check);
        self
    }

    /// Finalizes the node, rejecting declaration mistakes.
    pub fn build(self) -> Result<ProcessedCommand, BuilderError> {
        if self.name.is_empty() {
            return Err(BuilderError::MissingCommandName);
        }
        let mut options: Vec<ProcessedOption> = Vec::with_capacity(self.options.len());
        for builder in self.options {
            let option = builder.build(&self.name)?;
            if options.iter().any(|seen| seen.name() == option.name()) {
                return Err(BuilderError::DuplicateOptionName {
                    command: self.name.clone(),
                    name: option.name().to_string(),
                });
            }
            if let Some(short) = option.short_name()
                && options.iter().any(|seen| seen.short_name() == Some(short))
            {
                return Err(BuilderError::DuplicateShortName {
                    command: self.name.clone(),
                    short,
                });
            }
            options.push(option);
        }
        let argument = self.argument.map(|builder| {
            ProcessedArgument::new(
                builder.name,
                builder.description,
                builder.required,
                builder.multiple,
            )
        });
        Ok(ProcessedCommand::new(
            self.name,
            self.aliases,
            self.description,
            options,
            argument,
            self.accept_unknown_options,
            self.required_check,
        ))
    }
}

// MARK: --- UNIT TESTS ---
