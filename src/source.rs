//! Character-level input for the scanner.
//!
//! [`CharStream`] hands the scanner one character at a time and tracks the
//! line/column of the character it most recently produced. A single put-back
//! slot lets the scanner undo exactly one read, which is all the lookahead
//! the lexical grammar ever needs.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

/// A byte stream with one character of pushback and position tracking.
///
/// Positions are 1-based and always describe the character most recently
/// returned by [`next_char`](CharStream::next_char). Serving the put-back
/// slot does not move the position: the slot holds the character the caller
/// just read, so its position is already current.
///
/// The stream closes itself on the first end-of-file and keeps returning
/// `None` afterwards.
pub struct CharStream {
    reader: Option<Box<dyn Read>>,
    path: String,
    pending: Option<char>,
    line: usize,
    column: usize,
    next_line: usize,
    next_column: usize,
}

impl CharStream {
    /// Open a source file. The file handle is held until EOF or drop.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::with_reader(
            Box::new(file),
            &path.as_ref().display().to_string(),
        ))
    }

    /// Build a stream over an in-memory string. Used by tests and by callers
    /// that already hold the source text.
    pub fn from_str(source: &str) -> Self {
        Self::with_reader(Box::new(Cursor::new(source.as_bytes().to_vec())), "<memory>")
    }

    fn with_reader(reader: Box<dyn Read>, path: &str) -> Self {
        Self {
            reader: Some(reader),
            path: path.to_string(),
            pending: None,
            line: 1,
            column: 0,
            next_line: 1,
            next_column: 1,
        }
    }

    /// Next character, or `None` at end of input.
    ///
    /// Input is treated as ASCII: each byte maps to one character.
    pub fn next_char(&mut self) -> Option<char> {
        if let Some(ch) = self.pending.take() {
            // Position already points at this character.
            return Some(ch);
        }

        let reader = self.reader.as_mut()?;
        let mut buf = [0u8; 1];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    self.close();
                    return None;
                }
                Ok(_) => {
                    let ch = buf[0] as char;
                    self.line = self.next_line;
                    self.column = self.next_column;
                    if ch == '\n' {
                        self.next_line += 1;
                        self.next_column = 1;
                    } else {
                        self.next_column += 1;
                    }
                    return Some(ch);
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => {
                    self.close();
                    return None;
                }
            }
        }
    }

    /// Store one character for the next [`next_char`](CharStream::next_char)
    /// call. The slot holds a single character; pushing while it is occupied
    /// is a caller bug.
    pub fn put_back(&mut self, ch: char) {
        assert!(
            self.pending.is_none(),
            "put_back: pushback slot already occupied"
        );
        self.pending = Some(ch);
    }

    /// Line of the most recently returned character (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the most recently returned character (1-based).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Whether the underlying reader is still held open.
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

impl fmt::Debug for CharStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharStream")
            .field("path", &self.path)
            .field("line", &self.line)
            .field("column", &self.column)
            .field("open", &self.is_open())
            .finish()
    }
}
