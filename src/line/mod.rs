//! # Parsed Line Model
//!
//! The word sequence the command line parser consumes: a tokenized line,
//! its words with their raw positions, the cursor mapping, and a
//! forward-only but peekable iterator over the words. Advancing the
//! iterator is the only state change; peeking is idempotent.

pub mod tokenizer;

pub use tokenizer::tokenize_line;

/// Well-formedness of a tokenized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// Every quote was closed.
    Ok,
    /// The line ended inside a quote region.
    UnclosedQuote,
}

/// One token of the line, with the byte index where its raw text starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWord {
    word: String,
    line_index: usize,
}

impl ParsedWord {
    /// Creates a word from its resolved text and raw start position.
    pub fn new(word: String, line_index: usize) -> Self {
        Self { word, line_index }
    }

    /// The word text after quote and escape resolution.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Byte index in the raw line where this word starts.
    pub fn line_index(&self) -> usize {
        self.line_index
    }
}

/// A tokenized input line together with its cursor facts.
#[derive(Debug, Clone)]
pub struct ParsedLine {
    line: String,
    words: Vec<ParsedWord>,
    selected_index: Option<usize>,
    cursor: Option<usize>,
    space_at_end: bool,
    status: LineStatus,
    error: Option<String>,
}

impl ParsedLine {
    pub(crate) fn new(
        line: String,
        words: Vec<ParsedWord>,
        selected_index: Option<usize>,
        cursor: Option<usize>,
        space_at_end: bool,
        status: LineStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            line,
            words,
            selected_index,
            cursor,
            space_at_end,
            status,
            error,
        }
    }

    /// The raw line text.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The words of the line, in order.
    pub fn words(&self) -> &[ParsedWord] {
        &self.words
    }

    /// Number of words on the line.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Index of the word the cursor touches, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// The word the cursor touches, if any.
    pub fn selected_word(&self) -> Option<&ParsedWord> {
        self.selected_index.and_then(|index| self.words.get(index))
    }

    /// The cursor position this line was tokenized with.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// True when the cursor sits at or past the end of the line.
    pub fn cursor_at_end(&self) -> bool {
        self.cursor.is_some_and(|c| c >= self.line.len())
    }

    /// True when the line ends with an unescaped, unquoted space.
    pub fn space_at_end(&self) -> bool {
        self.space_at_end
    }

    /// Whether the line tokenized cleanly.
    pub fn status(&self) -> LineStatus {
        self.status
    }

    /// Tokenizer failure text, when `status` is not [`LineStatus::Ok`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A fresh iterator positioned at the first word.
    pub fn iterator(&self) -> LineIterator<'_> {
        LineIterator {
            line: self,
            position: 0,
        }
    }
}

/// Forward-only, peekable walk over the words of a [`ParsedLine`].
#[derive(Debug)]
pub struct LineIterator<'a> {
    line: &'a ParsedLine,
    position: usize,
}

impl<'a> LineIterator<'a> {
    /// True while words remain.
    pub fn has_next_word(&self) -> bool {
        self.position < self.line.words.len()
    }

    /// The next word without consuming it.
    pub fn peek_word(&self) -> Option<&'a str> {
        self.peek_parsed_word().map(ParsedWord::word)
    }

    /// The next word, with position data, without consuming it.
    pub fn peek_parsed_word(&self) -> Option<&'a ParsedWord> {
        self.line.words.get(self.position)
    }

    /// Consumes and returns the next word.
    pub fn poll_word(&mut self) -> Option<&'a str> {
        self.poll_parsed_word().map(ParsedWord::word)
    }

    /// Consumes and returns the next word with its position data.
    pub fn poll_parsed_word(&mut self) -> Option<&'a ParsedWord> {
        let word = self.line.words.get(self.position);
        if word.is_some() {
            self.position += 1;
        }
        word
    }

    /// True when the next word is the one the cursor touches.
    pub fn next_is_cursor_word(&self) -> bool {
        self.line.selected_index == Some(self.position)
    }

    /// True once the cursor word has been consumed. Always false on a
    /// line with no selected word.
    pub fn past_cursor_word(&self) -> bool {
        self.line.selected_index.is_some_and(|s| self.position > s)
    }

    /// The line this iterator walks.
    pub fn base_line(&self) -> &'a ParsedLine {
        self.line
    }

    /// Tokenizer failure text carried by the line, if any.
    pub fn error(&self) -> Option<&'a str> {
        self.line.error.as_deref()
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterator_peek_is_idempotent() {
        let line = tokenize_line("one two", None);
        let iter = line.iterator();
        assert_eq!(iter.peek_word(), Some("one"));
        assert_eq!(iter.peek_word(), Some("one"));
        assert!(iter.has_next_word());
    }

    #[test]
    fn test_iterator_poll_advances() {
        let line = tokenize_line("one two", None);
        let mut iter = line.iterator();
        assert_eq!(iter.poll_word(), Some("one"));
        assert_eq!(iter.peek_word(), Some("two"));
        assert_eq!(iter.poll_word(), Some("two"));
        assert_eq!(iter.poll_word(), None);
        assert!(!iter.has_next_word());
    }

    #[test]
    fn test_iterator_parsed_word_positions() {
        let line = tokenize_line("one two", None);
        let mut iter = line.iterator();
        let first = iter.poll_parsed_word().unwrap();
        assert_eq!(first.word(), "one");
        assert_eq!(first.line_index(), 0);
        let second = iter.poll_parsed_word().unwrap();
        assert_eq!(second.line_index(), 4);
    }

    #[test]
    fn test_cursor_word_tracking() {
        let line = tokenize_line("one two three", Some(5));
        let mut iter = line.iterator();
        assert!(!iter.next_is_cursor_word());
        assert!(!iter.past_cursor_word());
        iter.poll_word();
        assert!(iter.next_is_cursor_word());
        iter.poll_word();
        assert!(iter.past_cursor_word());
    }

    #[test]
    fn test_no_cursor_means_never_past() {
        let line = tokenize_line("one two", None);
        let mut iter = line.iterator();
        iter.poll_word();
        iter.poll_word();
        assert!(!iter.past_cursor_word());
        assert!(!iter.next_is_cursor_word());
    }

    #[test]
    fn test_base_line_facts() {
        let line = tokenize_line("one \"two", Some(8));
        let iter = line.iterator();
        assert_eq!(iter.base_line().word_count(), 2);
        assert_eq!(iter.base_line().status(), LineStatus::UnclosedQuote);
        assert!(iter.error().is_some());
    }
}
