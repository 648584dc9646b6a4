use thiserror::Error;

use crate::Position;

/// Errors reported while reading CSV data.
///
/// Reaching the end of a row or of the whole input is never an error; the
/// `advance` methods report that by returning `false`.
#[derive(Debug, Error)]
pub enum CsvError {
    /// There is no input to read from, because the reader or traversal
    /// has already been closed.
    #[error("no input stream: the reader has already been closed")]
    MissingInput,

    /// A double quote appeared inside a field that does not begin with one.
    #[error(
        "malformed quoting at {position}: fields that are not enclosed in double quotes \
         may not contain double quotes"
    )]
    MalformedQuote { position: Position },

    /// `current` was called with no current row or field, either before the
    /// first successful `advance` or after the sequence was exhausted.
    #[error("there is no current {0}")]
    NoCurrent(&'static str),

    /// The operation is not supported by a single-pass reader.
    #[error("{0} is not supported: CSV input is read exactly once")]
    Unsupported(&'static str),

    /// The underlying byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;
