//! # Completion Resolver
//!
//! A completion parse resolves exactly one [`CompleteStatus`] verdict
//! for the cursor position. This module holds that verdict type, the
//! [`CompleteOperation`] a caller hands in, and the translation from
//! verdict to concrete candidates. Grammar-level candidates (option
//! names, sub-command names) come straight from the command tree;
//! free-form value positions are delegated to a caller-supplied
//! [`CompletionProviders`].

use crate::command::{ProcessedCommand, ProcessedOption};
use crate::line::tokenize_line;

use super::{CommandLineParser, Mode};

/// The single verdict a completion parse resolves for the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteStatus {
    /// The command word itself is complete; append a space.
    AppendSpace,
    /// Complete an argument value from this partial text.
    Argument(String),
    /// The argument slot cannot take another value.
    ArgumentError,
    /// Offer the declared options that do not hold a value yet.
    CompleteOption,
    /// Complete a sub-command name from this partial text.
    GroupCommand(String),
    /// Complete a long option name from this partial text, given
    /// without its leading dashes.
    LongOption(String),
    /// Complete a short option name from this partial text.
    ShortOption(String),
    /// The option before the cursor still needs its value.
    OptionMissingValue,
    /// The line cannot lead anywhere from here.
    InvalidInput,
}

/// One completion request and its outcome.
///
/// `offset` is the byte position candidates replace from; it starts at
/// the cursor and is rewound over the partial word a verdict completes.
#[derive(Debug, Clone)]
pub struct CompleteOperation {
    buffer: String,
    cursor: usize,
    offset: usize,
    candidates: Vec<String>,
    append_space: bool,
}

impl CompleteOperation {
    /// Starts an operation over `buffer` with the cursor at the given
    /// byte offset.
    pub fn new(buffer: impl Into<String>, cursor: usize) -> Self {
        let buffer = buffer.into();
        let cursor = cursor.min(buffer.len());
        Self {
            buffer,
            cursor,
            offset: cursor,
            candidates: Vec::new(),
            append_space: false,
        }
    }

    /// The line being completed.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The cursor position within the buffer.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The byte position candidates replace from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rewinds the replacement start, usually over a partial word.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Adds one completion candidate.
    pub fn add_candidate(&mut self, candidate: impl Into<String>) {
        self.candidates.push(candidate.into());
    }

    /// The collected candidates, in insertion order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// True when the terminal should append a space instead of text.
    pub fn append_space(&self) -> bool {
        self.append_space
    }

    fn set_append_space(&mut self, append: bool) {
        self.append_space = append;
    }
}

/// Candidate sources for the value positions a grammar cannot
/// enumerate itself.
pub trait CompletionProviders {
    /// Offers candidates for an argument value starting with `partial`.
    fn complete_argument(
        &self,
        command: &ProcessedCommand,
        partial: &str,
        operation: &mut CompleteOperation,
    );

    /// Offers candidates for the pending value of `option`.
    fn complete_option_value(
        &self,
        command: &ProcessedCommand,
        option: &ProcessedOption,
        partial: &str,
        operation: &mut CompleteOperation,
    );
}

/// Providers that offer nothing; grammar-level completion still works.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProviders;

impl CompletionProviders for NoProviders {
    fn complete_argument(
        &self,
        _command: &ProcessedCommand,
        _partial: &str,
        _operation: &mut CompleteOperation,
    ) {
    }

    fn complete_option_value(
        &self,
        _command: &ProcessedCommand,
        _option: &ProcessedOption,
        _partial: &str,
        _operation: &mut CompleteOperation,
    ) {
    }
}

impl CommandLineParser {
    /// Runs a completion parse over the operation's buffer and cursor,
    /// then fills in the candidates the resolved verdict calls for.
    pub fn complete(
        &mut self,
        operation: &mut CompleteOperation,
        providers: &dyn CompletionProviders,
    ) {
        let line = tokenize_line(operation.buffer(), Some(operation.cursor()));
        self.parse_line(&line, Mode::Completion);
        let Some(parser) = self.matched_parser() else {
            return;
        };
        parser.inject_candidates(operation, providers);
    }

    fn inject_candidates(
        &self,
        operation: &mut CompleteOperation,
        providers: &dyn CompletionProviders,
    ) {
        let Some(status) = self.command().complete_status().cloned() else {
            return;
        };
        log::debug!(
            "completion verdict for '{}': {status:?}",
            self.command().name()
        );
        match status {
            CompleteStatus::AppendSpace => operation.set_append_space(true),
            CompleteStatus::Argument(partial) => {
                operation.set_offset(operation.cursor().saturating_sub(partial.len()));
                providers.complete_argument(self.command(), &partial, operation);
            }
            CompleteStatus::ArgumentError | CompleteStatus::InvalidInput => {}
            CompleteStatus::CompleteOption => {
                for option in self.command().options() {
                    if !option.has_any_value() {
                        operation.add_candidate(format!("--{}", option.name()));
                    }
                }
            }
            CompleteStatus::GroupCommand(partial) => {
                let mut found = false;
                for child in self.children() {
                    if child.command().name().starts_with(&partial) {
                        operation.add_candidate(child.command().name());
                        found = true;
                    }
                }
                if found {
                    operation.set_offset(operation.cursor().saturating_sub(partial.len()));
                }
            }
            CompleteStatus::LongOption(partial) => {
                let names = self.command().possible_long_names(&partial);
                if !names.is_empty() {
                    operation.set_offset(operation.cursor().saturating_sub(partial.len() + 2));
                }
                for name in names {
                    operation.add_candidate(format!("--{name}"));
                }
            }
            CompleteStatus::ShortOption(partial) => {
                // Grouped short runs are not completed further.
                if partial.is_empty() {
                    for option in self.command().options() {
                        if let Some(short) = option.short_name() {
                            operation.add_candidate(format!("-{short}"));
                        }
                    }
                    operation.set_offset(operation.cursor().saturating_sub(1));
                }
            }
            CompleteStatus::OptionMissingValue => {
                if let Some(option) = self.last_option() {
                    providers.complete_option_value(self.command(), option, "", operation);
                }
            }
        }
    }
}

// MARK: --- UNIT TESTS ---
