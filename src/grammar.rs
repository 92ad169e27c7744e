//! # Grammar Files
//!
//! Loads a command grammar from a TOML description, so a tool can ship
//! its command tree as data instead of code. The file holds one
//! `[command]` table; sub-commands nest as `[[command.subcommands]]`
//! tables of the same shape.

use std::{fs, path::Path};

use anyhow::{Context, bail};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::command::OptionKind;
use crate::command::builder::{ArgumentBuilder, CommandBuilder, OptionBuilder};
use crate::parser::CommandLineParser;

lazy_static! {
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap();
}

#[derive(Debug, Deserialize)]
struct GrammarFile {
    command: CommandSpec,
}

#[derive(Debug, Deserialize)]
struct CommandSpec {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    accept_unknown_options: bool,
    #[serde(default)]
    options: Vec<OptionSpec>,
    argument: Option<ArgumentSpec>,
    #[serde(default)]
    subcommands: Vec<CommandSpec>,
}

#[derive(Debug, Deserialize)]
struct OptionSpec {
    name: String,
    short: Option<char>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    kind: KindSpec,
    #[serde(default = "default_separator")]
    separator: char,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    overrides_required: bool,
}

fn default_separator() -> char {
    ','
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindSpec {
    Flag,
    #[default]
    Scalar,
    List,
    Map,
}

impl KindSpec {
    fn into_kind(self, separator: char) -> OptionKind {
        match self {
            Self::Flag => OptionKind::Flag,
            Self::Scalar => OptionKind::Scalar,
            Self::List => OptionKind::List { separator },
            Self::Map => OptionKind::Map,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArgumentSpec {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    multiple: bool,
}

/// Loads a parser tree from a TOML grammar file.
pub fn load_grammar(path: &Path) -> anyhow::Result<CommandLineParser> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read grammar file at {}", path.display()))?;
    let parser = parse_grammar(&content)
        .with_context(|| format!("Failed to load grammar from {}", path.display()))?;
    log::debug!(
        "loaded grammar for '{}' from {}",
        parser.command().name(),
        path.display()
    );
    Ok(parser)
}

/// Builds a parser tree from TOML grammar text.
pub fn parse_grammar(text: &str) -> anyhow::Result<CommandLineParser> {
    let file: GrammarFile = toml::from_str(text).context("Failed to parse grammar as TOML.")?;
    build_parser(&file.command)
}

fn build_parser(spec: &CommandSpec) -> anyhow::Result<CommandLineParser> {
    check_name(&spec.name, "command")?;
    let mut builder = CommandBuilder::new(&spec.name)
        .description(&spec.description)
        .accept_unknown_options(spec.accept_unknown_options);
    for alias in &spec.aliases {
        check_name(alias, "alias")?;
        builder = builder.alias(alias);
    }
    for option in &spec.options {
        check_name(&option.name, "option")?;
        let mut option_builder = OptionBuilder::new(&option.name)
            .description(&option.description)
            .kind(option.kind.into_kind(option.separator))
            .required(option.required)
            .overrides_required(option.overrides_required);
        if let Some(short) = option.short {
            if !short.is_ascii_alphanumeric() {
                bail!(
                    "Invalid short name '{short}' for option '{}'.",
                    option.name
                );
            }
            option_builder = option_builder.short(short);
        }
        builder = builder.option(option_builder);
    }
    if let Some(argument) = &spec.argument {
        check_name(&argument.name, "argument")?;
        builder = builder.argument(
            ArgumentBuilder::new(&argument.name)
                .description(&argument.description)
                .required(argument.required)
                .multiple(argument.multiple),
        );
    }
    let mut parser = CommandLineParser::new(builder.build()?);
    for child in &spec.subcommands {
        parser.add_child(build_parser(child)?)?;
    }
    Ok(parser)
}

fn check_name(name: &str, what: &str) -> anyhow::Result<()> {
    if !NAME_RE.is_match(name) {
        bail!("Invalid {what} name '{name}'.");
    }
    Ok(())
}

// MARK: --- UNIT TESTS ---
