//! # Parse Error Taxonomy
//!
//! Every way an input line can violate a command grammar, as a closed
//! enum. Errors are recorded on the matched command node while the walk
//! keeps draining words; nothing in the parser panics on bad input.

use thiserror::Error;

/// A convenience alias for results that fail with a [`ParserError`].
pub type ParserResult<T> = Result<T, ParserError>;

/// Represents errors a parse can record against an input line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// An option-like word matched no declared option.
    #[error("The option {0} is unknown.")]
    UnknownOption(String),

    /// A bare word reached a command that declares no argument slot, or
    /// a second value reached a single-value slot.
    #[error("A value {0} was given as an argument, but the command does not support it.")]
    UnexpectedArgument(String),

    /// A group command was followed by a word that names no child.
    #[error("Wrong input for group command.")]
    InvalidGroupInput,

    /// An option that requires a value reached the end of the input
    /// without one.
    #[error("Option: {0} requires a value.")]
    MissingValue(String),

    /// A value handed to a key-value option contains no `=`.
    #[error("The value '{text}' given to option {option} is not a key=value pair.")]
    MalformedMapValue {
        /// Display name of the option the value was given to.
        option: String,
        /// The offending value text.
        text: String,
    },

    /// A character inside a grouped short-flag token names no flag
    /// option.
    #[error("The grouped short option '{0}' is unknown.")]
    UnknownGroupedFlag(char),

    /// A required option was never given a value.
    #[error("Option: {0} is required for this command.")]
    RequiredOption(String),

    /// The required argument slot was never given a value.
    #[error("Argument is required for this command.")]
    RequiredArgument,

    /// The line itself could not be tokenized.
    #[error("{0}")]
    Tokenizer(String),
}
