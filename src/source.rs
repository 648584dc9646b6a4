use std::collections::VecDeque;
use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::iter::Peekable;
use std::str::Chars;

use u8char::stream::U8CharStream;

/// Trait for character streams that a [`crate::CsvReader`] can decode.
///
/// An implementation hands out one character at a time and can look one
/// character ahead without consuming it. The decoder never needs more
/// lookahead than that.
pub trait CharSource {
    /// Consumes and returns the next character, or `None` at end of stream.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Returns the next character without consuming it, or `None` at end
    /// of stream.
    ///
    /// Calling this repeatedly without an intervening
    /// [`CharSource::read_char`] must keep returning the same result.
    fn peek_char(&mut self) -> io::Result<Option<char>>;

    /// Releases whatever the source holds open.
    ///
    /// Must be safe to call more than once. After closing, a source should
    /// report end of stream. The provided implementation does nothing.
    #[inline(always)]
    fn close(&mut self) {
        // Nothing to release by default.
    }
}

/// A [`CharSource`] over an in-memory string.
pub struct StrSource<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }
}

impl CharSource for StrSource<'_> {
    #[inline(always)]
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }

    #[inline(always)]
    fn peek_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.peek().copied())
    }

    fn close(&mut self) {
        self.chars = "".chars().peekable();
    }
}

/// A [`CharSource`] that decodes UTF-8 bytes from any [`Read`] implementation.
///
/// Bytes are pulled in small fixed-size chunks and decoded with
/// [`U8CharStream`], so memory use does not grow with the input. Byte
/// sequences that are not valid UTF-8 decode as U+FFFD instead of failing.
pub struct Utf8Source<R> {
    reader: Option<R>,
    decoder: Option<U8CharStream>,
    pending: VecDeque<char>,
    buf: Vec<u8>,
}

impl<R: Read> Utf8Source<R> {
    pub const DEFAULT_CHUNK_SIZE: usize = 64;

    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, Self::DEFAULT_CHUNK_SIZE)
    }

    /// Like [`Utf8Source::new`], but reads at most `chunk_size` bytes from
    /// `reader` at a time. A size of zero is treated as one.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader: Some(reader),
            decoder: Some(U8CharStream::new()),
            pending: VecDeque::new(),
            buf: vec![0_u8; chunk_size.max(1)],
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        while self.pending.is_empty() {
            let (Some(reader), Some(decoder)) = (self.reader.as_mut(), self.decoder.as_mut())
            else {
                return Ok(());
            };
            let len = match reader.read(&mut self.buf) {
                Ok(len) => len,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if len == 0 {
                // Flush anything the decoder was holding for an incomplete
                // sequence; it comes out as replacement characters.
                if let Some(mut decoder) = self.decoder.take() {
                    self.pending.extend(decoder.end().map(|c| c.to_char()));
                }
            } else {
                self.pending
                    .extend(decoder.more(&self.buf[..len]).map(|c| c.to_char()));
            }
        }
        Ok(())
    }
}

impl<R: Read> CharSource for Utf8Source<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.pending.pop_front())
    }

    fn peek_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.pending.front().copied())
    }

    fn close(&mut self) {
        self.reader = None;
        self.decoder = None;
        self.pending.clear();
    }
}

/// A location in the character stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number. `\r\n`, `\r` and `\n` each end one line.
    pub line: u64,
    /// 1-based column, counted in characters.
    pub column: u64,
    /// 0-based count of characters before this position.
    pub offset: u64,
}

impl Position {
    pub const fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Reads through a borrowed [`CharSource`] while keeping track of where
/// in the stream we are.
pub(crate) struct Cursor<'a, S> {
    source: &'a mut S,
    next: Position,
    last: Position,
    after_cr: bool,
}

impl<'a, S: CharSource> Cursor<'a, S> {
    pub(crate) fn new(source: &'a mut S) -> Self {
        Self {
            source,
            next: Position::start(),
            last: Position::start(),
            after_cr: false,
        }
    }

    pub(crate) fn read(&mut self) -> io::Result<Option<char>> {
        let c = self.source.read_char()?;
        if let Some(c) = c {
            self.consumed(c);
        }
        Ok(c)
    }

    #[inline(always)]
    pub(crate) fn peek(&mut self) -> io::Result<Option<char>> {
        self.source.peek_char()
    }

    /// Position of the next character to be read.
    #[inline(always)]
    pub(crate) const fn position(&self) -> Position {
        self.next
    }

    /// Position of the character most recently returned by [`Cursor::read`].
    #[inline(always)]
    pub(crate) const fn last_position(&self) -> Position {
        self.last
    }

    pub(crate) fn close(&mut self) {
        self.source.close();
    }

    fn consumed(&mut self, c: char) {
        self.last = self.next;
        self.next.offset += 1;
        match c {
            // The line already ended at the '\r'.
            '\n' if self.after_cr => {}
            '\r' | '\n' => {
                self.next.line += 1;
                self.next.column = 1;
            }
            _ => self.next.column += 1,
        }
        self.after_cr = c == '\r';
    }
}
