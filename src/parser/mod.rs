//! # Command Line Parser
//!
//! The walk that interprets a tokenized line against a command grammar.
//! A parser owns one [`ProcessedCommand`] node and the parsers of its
//! sub-commands; parsing consumes words through a [`LineIterator`] with
//! at most one word of lookahead, recording values and errors on the
//! node that matched. In completion mode the same walk resolves a single
//! [`CompleteStatus`] verdict for the cursor position instead.
//!
//! A parser tree is built once and reused: every parse starts by
//! resetting the per-parse state of the whole tree.

pub mod completion;
pub mod error;
mod value;

pub use error::{ParserError, ParserResult};

use crate::command::builder::BuilderError;
use crate::command::{ProcessedCommand, ProcessedOption};
use crate::line::{LineIterator, LineStatus, ParsedLine, tokenize_line};

use completion::CompleteStatus;

/// How strictly a parse treats the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Validate and extract values, including the required-option checks.
    Strict,
    /// Resolve a completion verdict for the cursor position.
    Completion,
    /// Record grammar violations without the required-option checks.
    Validate,
}

/// True for words that address an option: `--…`, or `-` plus exactly
/// one character.
pub(crate) fn is_option_like(word: &str) -> bool {
    word.starts_with('-') && (word.starts_with("--") || word.chars().count() == 2)
}

/// Recursive-descent interpreter for one command grammar.
#[derive(Debug, Clone)]
pub struct CommandLineParser {
    command: ProcessedCommand,
    children: Vec<CommandLineParser>,
    is_child: bool,
    matched: bool,
    last_option: Option<usize>,
}

impl CommandLineParser {
    /// Wraps a grammar node into a leaf parser.
    pub fn new(command: ProcessedCommand) -> Self {
        Self {
            command,
            children: Vec::new(),
            is_child: false,
            matched: false,
            last_option: None,
        }
    }

    /// Attaches a sub-command parser, turning this one into a group
    /// command. Group commands cannot declare their own positional
    /// argument.
    pub fn add_child(&mut self, mut child: CommandLineParser) -> Result<(), BuilderError> {
        if self.command.argument().is_some() {
            return Err(BuilderError::GroupWithArgument {
                command: self.command.name().to_string(),
            });
        }
        child.is_child = true;
        self.children.push(child);
        Ok(())
    }

    // --- TREE ACCESSORS ---

    /// The grammar node this parser interprets.
    pub fn command(&self) -> &ProcessedCommand {
        &self.command
    }

    /// The sub-command parsers, in attachment order.
    pub fn children(&self) -> &[CommandLineParser] {
        &self.children
    }

    /// True when at least one sub-command is attached.
    pub fn is_group_command(&self) -> bool {
        !self.children.is_empty()
    }

    /// True when this parser sits below another one.
    pub fn is_child(&self) -> bool {
        self.is_child
    }

    /// The sub-command parser with the given name. Aliases do not count.
    pub fn child_parser(&self, name: &str) -> Option<&CommandLineParser> {
        self.children
            .iter()
            .find(|child| child.command.name() == name)
    }

    /// The node the last parse matched, if any.
    pub fn parsed_command(&self) -> Option<&ProcessedCommand> {
        self.matched_parser().map(|parser| &parser.command)
    }

    /// Mutable access to the node the last parse matched.
    pub fn parsed_command_mut(&mut self) -> Option<&mut ProcessedCommand> {
        self.matched_parser_mut().map(|parser| &mut parser.command)
    }

    pub(crate) fn matched_parser(&self) -> Option<&CommandLineParser> {
        if self.matched {
            return Some(self);
        }
        self.children.iter().find_map(CommandLineParser::matched_parser)
    }

    pub(crate) fn matched_parser_mut(&mut self) -> Option<&mut CommandLineParser> {
        if self.matched {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(CommandLineParser::matched_parser_mut)
    }

    /// True when this parser or any descendant matched the last parse.
    pub(crate) fn contains_matched(&self) -> bool {
        self.matched || self.children.iter().any(CommandLineParser::contains_matched)
    }

    /// Errors recorded by the last parse, read from the node that
    /// matched (or this node when none did).
    pub fn errors(&self) -> &[ParserError] {
        match self.matched_parser() {
            Some(parser) => parser.command.errors(),
            None => self.command.errors(),
        }
    }

    /// The completion verdict of the last parse, if one was resolved.
    pub fn complete_status(&self) -> Option<&CompleteStatus> {
        self.matched_parser()
            .and_then(|parser| parser.command.complete_status())
    }

    pub(crate) fn last_option(&self) -> Option<&ProcessedOption> {
        self.last_option.and_then(|index| self.command.option(index))
    }

    /// Resets all per-parse state in the tree for reuse.
    pub fn clear(&mut self) {
        self.command.clear();
        self.matched = false;
        self.last_option = None;
        for child in &mut self.children {
            child.clear();
        }
    }

    // --- NAMES AND SUMMARIES ---

    /// Every invocation a user can type: one `name child` entry per
    /// sub-command on a group, the bare name otherwise.
    pub fn all_names(&self) -> Vec<String> {
        if self.is_group_command() {
            self.children
                .iter()
                .map(|child| format!("{} {}", self.command.name(), child.command.name()))
                .collect()
        } else {
            vec![self.command.name().to_string()]
        }
    }

    /// Usage summary, with one line per sub-command on group commands.
    pub fn print_help(&self) -> String {
        if self.is_group_command() {
            let mut out = format!(
                "{}\n{} commands:\n",
                self.command.print_help(),
                self.command.name()
            );
            for child in &self.children {
                out.push_str(&format!(
                    "    {}  {}\n",
                    child.command.name(),
                    child.command.description()
                ));
            }
            out
        } else {
            self.command.print_help()
        }
    }

    /// `name : description` summary, with one indented line per
    /// sub-command on group commands.
    pub fn print_description(&self) -> String {
        if self.is_group_command() {
            let children = self
                .children
                .iter()
                .map(|child| format!("    {} : {}", child.command.name(), child.command.description()))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}\n{}", self.command.print_description(), children)
        } else {
            self.command.print_description()
        }
    }

    // --- PARSE ENTRY POINTS ---

    /// Parses `line` in [`Mode::Strict`].
    pub fn parse(&mut self, line: &str) {
        self.parse_with_mode(line, Mode::Strict);
    }

    /// Tokenizes `line` with the cursor at its end and parses it.
    pub fn parse_with_mode(&mut self, line: &str, mode: Mode) {
        let parsed = tokenize_line(line, Some(line.len()));
        self.parse_line(&parsed, mode);
    }

    /// Parses an already tokenized line.
    pub fn parse_line(&mut self, line: &ParsedLine, mode: Mode) {
        let mut iterator = line.iterator();
        self.parse_iterator(&mut iterator, mode);
    }

    /// Parses from the current position of a word iterator.
    ///
    /// The first word must equal this command's name or one of its
    /// aliases, otherwise the call is a no-op. On a group command the
    /// following word routes to the sub-command of that name; a word
    /// that names no sub-command either falls through to this command's
    /// own option handling (when it is the cursor word or looks like an
    /// option) or is rejected as wrong group input.
    pub fn parse_iterator(&mut self, iterator: &mut LineIterator, mode: Mode) {
        self.clear();
        if iterator.has_next_word() {
            let Some(word) = iterator.poll_word() else {
                return;
            };
            if !self.command.answers_to(word) {
                log::debug!("'{}' does not answer to '{}'", self.command.name(), word);
                return;
            }
            if self.is_group_command()
                && let Some(next) = iterator.peek_word()
            {
                let child = self
                    .children
                    .iter()
                    .position(|child| child.command.name() == next);
                if let Some(index) = child {
                    log::debug!("routing to sub-command '{next}'");
                    if let Some(child) = self.children.get_mut(index) {
                        child.parse_iterator(iterator, mode);
                    }
                } else if iterator.next_is_cursor_word() || next.starts_with('-') {
                    self.do_parse(iterator, mode);
                } else {
                    self.command.add_error(ParserError::InvalidGroupInput);
                    if mode == Mode::Completion {
                        self.matched = true;
                        self.command.set_complete_status(CompleteStatus::InvalidInput);
                    }
                }
            } else {
                self.do_parse(iterator, mode);
            }
        } else if let Some(error) = iterator.error() {
            self.command
                .add_error(ParserError::Tokenizer(error.to_string()));
        }
    }

    // --- THE WALK ---

    fn do_parse(&mut self, iterator: &mut LineIterator, mode: Mode) {
        self.matched = true;
        log::debug!("parsing options of '{}' ({mode:?})", self.command.name());
        if mode == Mode::Completion {
            self.do_parse_completion(iterator);
            return;
        }
        let mut argument_marker = false;
        while let Some(word) = iterator.peek_word() {
            if argument_marker {
                self.bind_argument(word);
                iterator.poll_word();
            } else if let Some((index, form)) = self.command.search_all_options(word) {
                self.last_option = Some(index);
                iterator.poll_word();
                if let Err(error) =
                    value::consume_option_value(iterator, &mut self.command, index, form, word)
                {
                    // Keep draining the line; one bad value must not
                    // hide later errors or values.
                    self.command.add_error(error);
                }
            } else if word == "--" && !iterator.next_is_cursor_word() {
                argument_marker = true;
                iterator.poll_word();
            } else if is_option_like(word) {
                if self.command.accepts_unknown_options() {
                    self.command.add_unknown_option(word.to_string());
                } else {
                    self.command
                        .add_error(ParserError::UnknownOption(word.to_string()));
                }
                iterator.poll_word();
            } else {
                self.bind_argument(word);
                iterator.poll_word();
            }
        }
        if mode == Mode::Strict {
            if let Some(check) = self.command.required_check()
                && !check(iterator.base_line().line())
            {
                return;
            }
            if let Some(error) = self.check_required() {
                self.command.add_error(error);
            }
        }
    }

    fn bind_argument(&mut self, word: &str) {
        if self.command.has_arguments() || self.command.has_argument_with_no_value() {
            self.command.add_argument_value(word);
        } else {
            self.command
                .add_error(ParserError::UnexpectedArgument(word.to_string()));
        }
    }

    fn check_required(&self) -> Option<ParserError> {
        let overridden = self
            .command
            .options()
            .iter()
            .any(|option| option.has_any_value() && option.overrides_required());
        if overridden {
            return None;
        }
        for option in self.command.options() {
            if option.required() && !option.has_any_value() {
                return Some(ParserError::RequiredOption(option.display_name()));
            }
        }
        if let Some(argument) = self.command.argument()
            && argument.required()
            && argument.values().is_empty()
        {
            return Some(ParserError::RequiredArgument);
        }
        None
    }

    // --- COMPLETION WALK ---

    fn do_parse_completion(&mut self, iterator: &mut LineIterator) {
        if !iterator.has_next_word() {
            if self.is_group_command() {
                self.command
                    .set_complete_status(CompleteStatus::GroupCommand(String::new()));
            } else if iterator.base_line().word_count()
                == iterator.base_line().selected_index().map_or(0, |s| s + 1)
                && self.last_option.is_none()
            {
                // The line ends right after the command word itself.
                if iterator.base_line().status() == LineStatus::Ok {
                    self.command.set_complete_status(CompleteStatus::AppendSpace);
                } else {
                    self.command
                        .set_complete_status(CompleteStatus::Argument(String::new()));
                }
            } else {
                self.command.set_complete_status(CompleteStatus::CompleteOption);
            }
            return;
        }
        let mut argument_marker = false;
        while let Some(word) = iterator.peek_word() {
            // The first verdict wins once the cursor word is behind us.
            if iterator.base_line().selected_index().is_some()
                && iterator.past_cursor_word()
                && self.command.complete_status().is_some()
            {
                return;
            }
            if argument_marker {
                self.bind_completion_argument(Some(word));
                iterator.poll_word();
            } else if let Some((index, form)) = self.command.search_all_options(word) {
                self.last_option = Some(index);
                if iterator.next_is_cursor_word()
                    && !word.contains('=')
                    && let Some(partial) = word.strip_prefix("--")
                    && self.command.possible_long_names(partial).len() > 1
                {
                    // The matched name may still be a prefix of a longer
                    // option name.
                    self.command
                        .set_complete_status(CompleteStatus::LongOption(partial.to_string()));
                    iterator.poll_word();
                } else {
                    iterator.poll_word();
                    if value::consume_option_value(iterator, &mut self.command, index, form, word)
                        .is_err()
                    {
                        self.command
                            .set_complete_status(CompleteStatus::OptionMissingValue);
                        return;
                    }
                    if !iterator.has_next_word() {
                        let satisfied = self
                            .command
                            .option(index)
                            .is_some_and(ProcessedOption::has_any_value)
                            || iterator.base_line().space_at_end();
                        if satisfied {
                            self.command.set_complete_status(CompleteStatus::CompleteOption);
                        } else {
                            self.command
                                .set_complete_status(CompleteStatus::OptionMissingValue);
                        }
                    }
                }
            } else if word == "--" && !iterator.next_is_cursor_word() {
                argument_marker = true;
                iterator.poll_word();
            } else if let Some(partial) = word.strip_prefix("--") {
                self.command
                    .set_complete_status(CompleteStatus::LongOption(partial.to_string()));
                iterator.poll_word();
            } else if let Some(partial) = word.strip_prefix('-') {
                self.command
                    .set_complete_status(CompleteStatus::ShortOption(partial.to_string()));
                iterator.poll_word();
            } else {
                if self.is_group_command() {
                    if iterator.next_is_cursor_word() {
                        self.command
                            .set_complete_status(CompleteStatus::GroupCommand(word.to_string()));
                    } else if iterator.base_line().cursor_at_end()
                        && iterator.base_line().space_at_end()
                    {
                        self.command
                            .set_complete_status(CompleteStatus::GroupCommand(String::new()));
                    }
                } else if iterator.next_is_cursor_word() {
                    if self.command.has_arguments() || self.command.has_argument_with_no_value() {
                        self.command
                            .set_complete_status(CompleteStatus::Argument(word.to_string()));
                    } else {
                        self.command.set_complete_status(CompleteStatus::ArgumentError);
                    }
                } else {
                    self.bind_completion_argument(Some(word));
                }
                iterator.poll_word();
            }
        }
        if argument_marker && self.command.complete_status().is_none() {
            self.bind_completion_argument(None);
        }
    }

    /// Accumulates a word behind the argument marker and keeps the
    /// verdict on the argument slot. A second value into a single-value
    /// slot degrades the verdict to an argument error; a command without
    /// any argument slot resolves nothing.
    fn bind_completion_argument(&mut self, word: Option<&str>) {
        if self.command.has_arguments() {
            if let Some(word) = word {
                self.command.add_argument_value(word);
            }
            self.command
                .set_complete_status(CompleteStatus::Argument(String::new()));
        } else if self.command.has_argument() {
            if self.command.has_argument_with_no_value() {
                if let Some(word) = word {
                    self.command.add_argument_value(word);
                }
                self.command
                    .set_complete_status(CompleteStatus::Argument(String::new()));
            } else {
                self.command.set_complete_status(CompleteStatus::ArgumentError);
            }
        }
    }
}

// MARK: --- UNIT TESTS ---
