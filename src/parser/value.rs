//! # Option Value Consumption
//!
//! One consumption strategy per option shape. The matched option word is
//! already consumed by the caller; each strategy decides whether the
//! value lives inline in that word (after `=`, or attached to a short
//! name) or in the following word(s), and records it on the option.
//! Every strategy leaves the iterator past everything it used, even when
//! it fails, so the surrounding walk always makes progress.

use crate::command::{OptionForm, OptionKind, ProcessedCommand};
use crate::line::LineIterator;

use super::error::{ParserError, ParserResult};
use super::is_option_like;

/// Records the value(s) of the option at `index` on `command`.
///
/// `word` is the already-consumed word that matched the option, in the
/// addressing `form` reported by the lookup.
pub(crate) fn consume_option_value(
    iterator: &mut LineIterator,
    command: &mut ProcessedCommand,
    index: usize,
    form: OptionForm,
    word: &str,
) -> ParserResult<()> {
    let Some(option) = command.option(index) else {
        return Ok(());
    };
    let kind = option.kind();
    let display = option.display_name();
    let inline: Option<&str> = match form {
        OptionForm::Long => word
            .strip_prefix("--")
            .and_then(|rest| rest.strip_prefix(option.name()))
            .and_then(|tail| tail.strip_prefix('=')),
        OptionForm::Short => {
            let mut chars = word.chars();
            chars.next();
            chars.next();
            let tail = chars.as_str();
            (!tail.is_empty()).then_some(tail)
        }
    };
    log::trace!("consuming value for {display} from '{word}'");

    match kind {
        OptionKind::Flag => consume_flag(command, index, form, inline),
        OptionKind::Scalar => {
            let value = match inline {
                Some(tail) => Some(strip_leading_equals(tail, form).to_string()),
                None => iterator.poll_word().map(str::to_string),
            };
            match value {
                Some(value) => {
                    push_value(command, index, value);
                    Ok(())
                }
                None => Err(ParserError::MissingValue(display)),
            }
        }
        OptionKind::List { separator } => {
            consume_list(iterator, command, index, form, inline, separator, display)
        }
        OptionKind::Map => {
            let text = match inline {
                Some(tail) => strip_leading_equals(tail, form).to_string(),
                None => match iterator.poll_word() {
                    Some(next) => next.to_string(),
                    None => return Err(ParserError::MissingValue(display)),
                },
            };
            match text.split_once('=') {
                Some((key, value)) => {
                    push_property(command, index, key.to_string(), value.to_string());
                    Ok(())
                }
                None => Err(ParserError::MalformedMapValue {
                    option: display,
                    text,
                }),
            }
        }
    }
}

/// A flag records `"true"` when the word stands alone. An inline `=text`
/// overrides that verbatim. A short tail without `=` is a run of grouped
/// flags: every character must name a declared flag option.
fn consume_flag(
    command: &mut ProcessedCommand,
    index: usize,
    form: OptionForm,
    inline: Option<&str>,
) -> ParserResult<()> {
    let Some(tail) = inline else {
        push_value(command, index, "true".to_string());
        return Ok(());
    };
    if form == OptionForm::Long {
        push_value(command, index, tail.to_string());
        return Ok(());
    }
    if let Some(text) = tail.strip_prefix('=') {
        push_value(command, index, text.to_string());
        return Ok(());
    }
    push_value(command, index, "true".to_string());
    for grouped in tail.chars() {
        let found = command
            .options()
            .iter()
            .position(|option| option.short_name() == Some(grouped) && option.kind() == OptionKind::Flag);
        match found {
            Some(flag_index) => push_value(command, flag_index, "true".to_string()),
            None => return Err(ParserError::UnknownGroupedFlag(grouped)),
        }
    }
    Ok(())
}

fn consume_list(
    iterator: &mut LineIterator,
    command: &mut ProcessedCommand,
    index: usize,
    form: OptionForm,
    inline: Option<&str>,
    separator: char,
    display: String,
) -> ParserResult<()> {
    if separator == ' ' {
        // Space-separated lists swallow every following bare word. A quoted
        // word carrying spaces still splits into one element per run.
        let mut any = false;
        if let Some(tail) = inline {
            let text = strip_leading_equals(tail, form);
            if !text.is_empty() {
                push_split(command, index, text, separator);
                any = true;
            }
        }
        while let Some(next) = iterator.peek_word() {
            if is_option_like(next) {
                break;
            }
            iterator.poll_word();
            push_split(command, index, next, separator);
            any = true;
        }
        if any {
            Ok(())
        } else {
            Err(ParserError::MissingValue(display))
        }
    } else {
        let text = match inline {
            Some(tail) => strip_leading_equals(tail, form).to_string(),
            None => match iterator.poll_word() {
                Some(next) => next.to_string(),
                None => return Err(ParserError::MissingValue(display)),
            },
        };
        push_split(command, index, &text, separator);
        // A value ending in the separator keeps the list open.
        let mut last = text;
        while last.ends_with(separator)
            && let Some(next) = iterator.peek_word()
            && !is_option_like(next)
        {
            iterator.poll_word();
            push_split(command, index, next, separator);
            last = next.to_string();
        }
        Ok(())
    }
}

/// A short-form tail may carry a leading `=` between the short name and
/// the value. Long-form inline text already sits after its `=`.
fn strip_leading_equals(tail: &str, form: OptionForm) -> &str {
    match form {
        OptionForm::Short => tail.strip_prefix('=').unwrap_or(tail),
        OptionForm::Long => tail,
    }
}

fn push_split(command: &mut ProcessedCommand, index: usize, text: &str, separator: char) {
    for element in text.split(separator) {
        let element = element.trim();
        if !element.is_empty() {
            push_value(command, index, element.to_string());
        }
    }
}

fn push_value(command: &mut ProcessedCommand, index: usize, value: String) {
    if let Some(option) = command.option_mut(index) {
        option.add_value(value);
    }
}

fn push_property(command: &mut ProcessedCommand, index: usize, key: String, value: String) {
    if let Some(option) = command.option_mut(index) {
        option.add_property(key, value);
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::builder::{CommandBuilder, OptionBuilder};
    use crate::line::tokenize_line;

    fn command() -> ProcessedCommand {
        CommandBuilder::new("test")
            .option(OptionBuilder::new("verbose").short('v').kind(OptionKind::Flag))
            .option(OptionBuilder::new("all").short('a').kind(OptionKind::Flag))
            .option(OptionBuilder::new("bare").short('b').kind(OptionKind::Flag))
            .option(OptionBuilder::new("name").short('n'))
            .option(OptionBuilder::new("list").short('l').kind(OptionKind::List { separator: ',' }))
            .option(OptionBuilder::new("path").short('p').kind(OptionKind::List { separator: ' ' }))
            .option(OptionBuilder::new("define").short('D').kind(OptionKind::Map))
            .build()
            .unwrap()
    }

    /// Resolves the first word of `line` as an option and consumes its
    /// value the way the parser walk would.
    fn consume(command: &mut ProcessedCommand, line: &str) -> ParserResult<()> {
        let parsed = tokenize_line(line, None);
        let mut iterator = parsed.iterator();
        let word = iterator.peek_word().unwrap();
        let (index, form) = command.search_all_options(word).unwrap();
        iterator.poll_word();
        consume_option_value(&mut iterator, command, index, form, word)
    }

    fn values<'a>(command: &'a ProcessedCommand, name: &str) -> &'a [String] {
        command.find_long_option(name).unwrap().values()
    }

    // --- Flags ---

    #[test]
    fn test_flag_alone_records_true() {
        let mut cmd = command();
        consume(&mut cmd, "--verbose").unwrap();
        assert_eq!(values(&cmd, "verbose"), ["true"]);
    }

    #[test]
    fn test_flag_inline_text_is_recorded_verbatim() {
        let mut cmd = command();
        consume(&mut cmd, "--verbose=off").unwrap();
        assert_eq!(values(&cmd, "verbose"), ["off"]);
    }

    #[test]
    fn test_flag_never_consumes_the_next_word() {
        let mut cmd = command();
        let parsed = tokenize_line("--verbose next", None);
        let mut iterator = parsed.iterator();
        let word = iterator.peek_word().unwrap();
        let (index, form) = cmd.search_all_options(word).unwrap();
        iterator.poll_word();
        consume_option_value(&mut iterator, &mut cmd, index, form, word).unwrap();
        assert_eq!(iterator.peek_word(), Some("next"));
    }

    #[test]
    fn test_grouped_short_flags() {
        let mut cmd = command();
        consume(&mut cmd, "-vab").unwrap();
        assert_eq!(values(&cmd, "verbose"), ["true"]);
        assert_eq!(values(&cmd, "all"), ["true"]);
        assert_eq!(values(&cmd, "bare"), ["true"]);
    }

    #[test]
    fn test_grouped_flag_with_unknown_character() {
        let mut cmd = command();
        let err = consume(&mut cmd, "-vax").unwrap_err();
        assert_eq!(err, ParserError::UnknownGroupedFlag('x'));
        assert_eq!(values(&cmd, "verbose"), ["true"]);
        assert_eq!(values(&cmd, "all"), ["true"]);
        assert!(values(&cmd, "bare").is_empty());
    }

    // --- Scalars ---

    #[test]
    fn test_scalar_inline_long() {
        let mut cmd = command();
        consume(&mut cmd, "--name=foo").unwrap();
        assert_eq!(values(&cmd, "name"), ["foo"]);
    }

    #[test]
    fn test_scalar_next_word() {
        let mut cmd = command();
        consume(&mut cmd, "--name foo").unwrap();
        assert_eq!(values(&cmd, "name"), ["foo"]);
    }

    #[test]
    fn test_scalar_short_attached_and_equals_forms() {
        let mut cmd = command();
        consume(&mut cmd, "-nfoo").unwrap();
        assert_eq!(values(&cmd, "name"), ["foo"]);
        let mut cmd = command();
        consume(&mut cmd, "-n=foo").unwrap();
        assert_eq!(values(&cmd, "name"), ["foo"]);
    }

    #[test]
    fn test_scalar_without_value_is_an_error() {
        let mut cmd = command();
        let err = consume(&mut cmd, "--name").unwrap_err();
        assert_eq!(err, ParserError::MissingValue("--name".into()));
    }

    // --- Lists ---

    #[test]
    fn test_list_inline_split_and_trimmed() {
        let mut cmd = command();
        consume(&mut cmd, "--list=a1,b1, c1").unwrap();
        assert_eq!(values(&cmd, "list"), ["a1", "b1", "c1"]);
    }

    #[test]
    fn test_list_trailing_separator_keeps_consuming() {
        let mut cmd = command();
        consume(&mut cmd, "--list a1,b1, c1,d1").unwrap();
        assert_eq!(values(&cmd, "list"), ["a1", "b1", "c1", "d1"]);
    }

    #[test]
    fn test_list_closed_value_stops_at_next_word() {
        let mut cmd = command();
        let parsed = tokenize_line("--list a1,b1 stray", None);
        let mut iterator = parsed.iterator();
        let word = iterator.peek_word().unwrap();
        let (index, form) = cmd.search_all_options(word).unwrap();
        iterator.poll_word();
        consume_option_value(&mut iterator, &mut cmd, index, form, word).unwrap();
        assert_eq!(values(&cmd, "list"), ["a1", "b1"]);
        assert_eq!(iterator.peek_word(), Some("stray"));
    }

    #[test]
    fn test_space_separated_list_consumes_until_option_like() {
        let mut cmd = command();
        let parsed = tokenize_line("--path /tmp /opt --verbose", None);
        let mut iterator = parsed.iterator();
        let word = iterator.peek_word().unwrap();
        let (index, form) = cmd.search_all_options(word).unwrap();
        iterator.poll_word();
        consume_option_value(&mut iterator, &mut cmd, index, form, word).unwrap();
        assert_eq!(values(&cmd, "path"), ["/tmp", "/opt"]);
        assert_eq!(iterator.peek_word(), Some("--verbose"));
    }

    #[test]
    fn test_space_separated_list_splits_quoted_words() {
        let mut cmd = command();
        consume(&mut cmd, "--path \"-X1 X2 -X3\"").unwrap();
        assert_eq!(values(&cmd, "path"), ["-X1", "X2", "-X3"]);
        let mut cmd = command();
        consume(&mut cmd, "-p \"-X4 -X5\"").unwrap();
        assert_eq!(values(&cmd, "path"), ["-X4", "-X5"]);
        let mut cmd = command();
        consume(&mut cmd, "--path=\"a b\"").unwrap();
        assert_eq!(values(&cmd, "path"), ["a", "b"]);
    }

    #[test]
    fn test_space_separated_list_without_values_is_an_error() {
        let mut cmd = command();
        let err = consume(&mut cmd, "--path").unwrap_err();
        assert_eq!(err, ParserError::MissingValue("--path".into()));
    }

    // --- Maps ---

    #[test]
    fn test_map_attached_short_pair() {
        let mut cmd = command();
        consume(&mut cmd, "-Dkey1=value1").unwrap();
        let option = cmd.find_long_option("define").unwrap();
        assert_eq!(option.properties().get("key1").map(String::as_str), Some("value1"));
    }

    #[test]
    fn test_map_next_word_pair() {
        let mut cmd = command();
        consume(&mut cmd, "--define key1=value1").unwrap();
        let option = cmd.find_long_option("define").unwrap();
        assert_eq!(option.properties().get("key1").map(String::as_str), Some("value1"));
    }

    #[test]
    fn test_map_value_without_equals_is_an_error() {
        let mut cmd = command();
        let err = consume(&mut cmd, "-D keyvalue").unwrap_err();
        assert_eq!(
            err,
            ParserError::MalformedMapValue {
                option: "--define".into(),
                text: "keyvalue".into()
            }
        );
    }

    #[test]
    fn test_map_empty_key_is_kept() {
        let mut cmd = command();
        consume(&mut cmd, "--define==value1").unwrap();
        let option = cmd.find_long_option("define").unwrap();
        assert_eq!(option.properties().get("").map(String::as_str), Some("value1"));
    }
}
