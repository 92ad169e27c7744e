//! # Line Tokenizer
//!
//! Splits a raw input line into words while honoring quote and escape
//! rules, and maps an optional cursor position onto the word whose raw
//! span contains it.

use super::{LineStatus, ParsedLine, ParsedWord};

/// Splits `line` into words.
///
/// Words are separated by unquoted, unescaped spaces. Single and double
/// quotes keep their inner whitespace and are stripped from the word
/// text. A backslash escapes the character that follows it and is
/// removed. `cursor` is a byte offset into `line`; the first word whose
/// raw span contains it (both ends inclusive) becomes the selected word,
/// so a cursor in trailing whitespace selects nothing.
pub fn tokenize_line(line: &str, cursor: Option<usize>) -> ParsedLine {
    let mut words: Vec<ParsedWord> = Vec::new();
    let mut selected: Option<usize> = None;
    let mut text = String::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut quoted = false;
    let mut space_at_end = false;

    for (index, ch) in line.char_indices() {
        if escape {
            text.push(ch);
            escape = false;
            space_at_end = false;
        } else if let Some(open) = quote {
            if ch == open {
                quote = None;
                quoted = true;
            } else {
                text.push(ch);
            }
            space_at_end = false;
        } else {
            match ch {
                '\\' => {
                    if start.is_none() {
                        start = Some(index);
                    }
                    escape = true;
                    space_at_end = false;
                }
                '\'' | '"' => {
                    if start.is_none() {
                        start = Some(index);
                    }
                    quote = Some(ch);
                    space_at_end = false;
                }
                ' ' => {
                    if let Some(word_start) = start {
                        finish_word(
                            &mut words,
                            &mut selected,
                            cursor,
                            &mut text,
                            word_start,
                            index,
                            quoted,
                        );
                        start = None;
                        quoted = false;
                    }
                    space_at_end = true;
                }
                _ => {
                    if start.is_none() {
                        start = Some(index);
                    }
                    text.push(ch);
                    space_at_end = false;
                }
            }
        }
    }

    if escape {
        // a dangling escape at the end of the line is kept literally
        text.push('\\');
    }
    if let Some(word_start) = start {
        finish_word(
            &mut words,
            &mut selected,
            cursor,
            &mut text,
            word_start,
            line.len(),
            quoted,
        );
    }

    let (status, error) = if quote.is_some() {
        (
            LineStatus::UnclosedQuote,
            Some(String::from("The line contains an unclosed quote.")),
        )
    } else {
        (LineStatus::Ok, None)
    };

    log::trace!(
        "tokenized {:?} into {} word(s), selected: {:?}",
        line,
        words.len(),
        selected
    );

    ParsedLine::new(
        line.to_string(),
        words,
        selected,
        cursor,
        space_at_end,
        status,
        error,
    )
}

/// Closes the word accumulated in `text`, spanning `start..end` in the
/// raw line. Empty text is only kept when a quote pair produced it on
/// purpose.
fn finish_word(
    words: &mut Vec<ParsedWord>,
    selected: &mut Option<usize>,
    cursor: Option<usize>,
    text: &mut String,
    start: usize,
    end: usize,
    quoted: bool,
) {
    if text.is_empty() && !quoted {
        return;
    }
    if selected.is_none()
        && let Some(position) = cursor
        && position >= start
        && position <= end
    {
        *selected = Some(words.len());
    }
    words.push(ParsedWord::new(std::mem::take(text), start));
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    fn word_texts(line: &ParsedLine) -> Vec<&str> {
        line.words().iter().map(|w| w.word()).collect()
    }

    // --- Splitting ---

    #[test]
    fn test_splits_on_spaces() {
        let line = tokenize_line("foo bar baz", None);
        assert_eq!(word_texts(&line), vec!["foo", "bar", "baz"]);
        assert_eq!(line.status(), LineStatus::Ok);
        assert!(!line.space_at_end());
    }

    #[test]
    fn test_collapses_repeated_spaces() {
        let line = tokenize_line("foo   bar", None);
        assert_eq!(word_texts(&line), vec!["foo", "bar"]);
    }

    #[test]
    fn test_empty_line_has_no_words() {
        let line = tokenize_line("", None);
        assert!(line.words().is_empty());
        assert_eq!(line.status(), LineStatus::Ok);
    }

    #[test]
    fn test_records_word_start_indices() {
        let line = tokenize_line("foo bar", None);
        assert_eq!(line.words()[0].line_index(), 0);
        assert_eq!(line.words()[1].line_index(), 4);
    }

    // --- Quoting and escaping ---

    #[test]
    fn test_double_quotes_keep_inner_space() {
        let line = tokenize_line("cmd \"bar bar2\"", None);
        assert_eq!(word_texts(&line), vec!["cmd", "bar bar2"]);
    }

    #[test]
    fn test_single_quotes_keep_inner_space() {
        let line = tokenize_line("cmd 'a b c'", None);
        assert_eq!(word_texts(&line), vec!["cmd", "a b c"]);
    }

    #[test]
    fn test_quote_region_inside_word() {
        let line = tokenize_line("-DXms=\"128g \"", None);
        assert_eq!(word_texts(&line), vec!["-DXms=128g "]);
    }

    #[test]
    fn test_escaped_space_joins_words() {
        let line = tokenize_line("/tmp/file\\ foo.txt", None);
        assert_eq!(word_texts(&line), vec!["/tmp/file foo.txt"]);
    }

    #[test]
    fn test_escaped_space_in_attached_value() {
        let line = tokenize_line("-DXmx=512g\\ m", None);
        assert_eq!(word_texts(&line), vec!["-DXmx=512g m"]);
    }

    #[test]
    fn test_escaped_quote_is_literal() {
        let line = tokenize_line("say \\\"hi\\\"", None);
        assert_eq!(word_texts(&line), vec!["say", "\"hi\""]);
    }

    #[test]
    fn test_empty_quoted_word_is_kept() {
        let line = tokenize_line("cmd \"\"", None);
        assert_eq!(word_texts(&line), vec!["cmd", ""]);
    }

    #[test]
    fn test_dangling_escape_kept_literally() {
        let line = tokenize_line("foo\\", None);
        assert_eq!(word_texts(&line), vec!["foo\\"]);
    }

    // --- Unclosed quotes ---

    #[test]
    fn test_unclosed_quote_sets_status_and_error() {
        let line = tokenize_line("cmd \"bar", None);
        assert_eq!(line.status(), LineStatus::UnclosedQuote);
        assert!(line.error().is_some());
        assert_eq!(word_texts(&line), vec!["cmd", "bar"]);
    }

    #[test]
    fn test_lone_unclosed_quote_yields_no_word() {
        let line = tokenize_line("\"", None);
        assert!(line.words().is_empty());
        assert_eq!(line.status(), LineStatus::UnclosedQuote);
    }

    // --- Cursor mapping ---

    #[test]
    fn test_cursor_inside_word_selects_it() {
        let line = tokenize_line("foo bar", Some(5));
        assert_eq!(line.selected_index(), Some(1));
        assert_eq!(line.selected_word().map(|w| w.word()), Some("bar"));
    }

    #[test]
    fn test_cursor_at_word_end_selects_it() {
        let line = tokenize_line("foo bar", Some(3));
        assert_eq!(line.selected_index(), Some(0));
    }

    #[test]
    fn test_cursor_at_line_end_selects_last_word() {
        let line = tokenize_line("foo bar", Some(7));
        assert_eq!(line.selected_index(), Some(1));
        assert!(line.cursor_at_end());
    }

    #[test]
    fn test_cursor_in_trailing_space_selects_nothing() {
        let line = tokenize_line("foo bar ", Some(8));
        assert_eq!(line.selected_index(), None);
        assert!(line.space_at_end());
        assert!(line.cursor_at_end());
    }

    #[test]
    fn test_cursor_spans_include_quotes() {
        let line = tokenize_line("cmd \"bar baz\"", Some(12));
        assert_eq!(line.selected_index(), Some(1));
    }

    // --- Trailing space detection ---

    #[test]
    fn test_space_at_end() {
        assert!(tokenize_line("foo ", None).space_at_end());
        assert!(!tokenize_line("foo", None).space_at_end());
        assert!(!tokenize_line("foo\\ ", None).space_at_end());
        assert!(!tokenize_line("\"foo \"", None).space_at_end());
    }
}
