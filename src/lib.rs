//! # Halyard
//!
//! A grammar-driven command line interpreter. A command tree is built
//! once, from code or from a TOML grammar file, and then reused to
//! parse typed lines: strict parses bind option and argument values and
//! enforce the grammar, validation parses only collect violations, and
//! completion parses resolve what the cursor position asks for.
//!
//! ```
//! use halyard::{CommandBuilder, CommandLineParser, OptionBuilder};
//!
//! let mut parser = CommandLineParser::new(
//!     CommandBuilder::new("greet")
//!         .option(OptionBuilder::new("name").short('n'))
//!         .build()
//!         .unwrap(),
//! );
//! parser.parse("greet --name world");
//! let command = parser.parsed_command().unwrap();
//! assert_eq!(
//!     command.find_long_option("name").and_then(|o| o.value()),
//!     Some("world"),
//! );
//! ```

pub mod command;
pub mod grammar;
pub mod line;
pub mod parser;
pub mod populate;

pub use command::builder::{ArgumentBuilder, BuilderError, CommandBuilder, OptionBuilder};
pub use command::{OptionKind, ProcessedCommand, ProcessedOption};
pub use grammar::{load_grammar, parse_grammar};
pub use parser::completion::{
    CompleteOperation, CompleteStatus, CompletionProviders, NoProviders,
};
pub use parser::{CommandLineParser, Mode, ParserError, ParserResult};
pub use populate::{CommandPopulator, MapPopulator, UnknownOptionSink};
