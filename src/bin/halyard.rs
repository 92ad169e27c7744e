use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use halyard::{CommandLineParser, CompleteOperation, NoProviders, load_grammar};

/// Inspects a command grammar: parse lines against it, preview
/// completion candidates, or print the command tree.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML grammar file.
    #[arg(short, long, global = true, default_value = "grammar.toml")]
    grammar: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Parses a line strictly and prints what bound where.
    Parse {
        /// The command line to parse, as one shell-quoted string.
        line: String,
    },
    /// Resolves completion candidates for a cursor position.
    Complete {
        /// The partial command line.
        line: String,
        /// Byte position of the cursor; defaults to the end of the line.
        #[arg(short, long)]
        cursor: Option<usize>,
    },
    /// Prints the command tree of the grammar.
    Show,
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut parser = load_grammar(&cli.grammar)?;
    match cli.action {
        Action::Parse { line } => parse_line(&mut parser, &line),
        Action::Complete { line, cursor } => complete_line(&mut parser, &line, cursor),
        Action::Show => show_tree(&parser),
    }
    Ok(())
}

fn parse_line(parser: &mut CommandLineParser, line: &str) {
    parser.parse(line);
    for error in parser.errors() {
        println!("{} {error}", "error:".red().bold());
    }
    let Some(command) = parser.parsed_command() else {
        println!("{}", "no command matched".yellow());
        return;
    };
    println!("{} {}", "command:".green().bold(), command.name());
    for option in command.options() {
        if !option.values().is_empty() {
            println!("  --{} = {:?}", option.name().cyan(), option.values());
        }
        for (key, value) in option.properties() {
            println!("  --{} {key}={value}", option.name().cyan());
        }
    }
    if let Some(argument) = command.argument()
        && !argument.values().is_empty()
    {
        println!("  {} = {:?}", argument.name().cyan(), argument.values());
    }
    for token in command.unknown_options() {
        println!("  {} {token}", "passed through:".yellow());
    }
}

fn complete_line(parser: &mut CommandLineParser, line: &str, cursor: Option<usize>) {
    let cursor = cursor.unwrap_or(line.len());
    let mut operation = CompleteOperation::new(line, cursor);
    parser.complete(&mut operation, &NoProviders);
    if operation.append_space() {
        println!("{}", "append a space".green());
        return;
    }
    if operation.candidates().is_empty() {
        println!("{}", "no candidates".yellow());
        return;
    }
    println!("replacing from byte {}:", operation.offset());
    for candidate in operation.candidates() {
        println!("  {}", candidate.cyan());
    }
}

fn show_tree(parser: &CommandLineParser) {
    println!("{}", parser.print_help().trim_end());
    println!("\n{}", "invocations:".green().bold());
    for name in parser.all_names() {
        println!("  {name}");
    }
}
