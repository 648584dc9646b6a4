use std::io::Read;

use log::debug;

use crate::rows::{Ownership, Rows};
use crate::source::{CharSource, StrSource, Utf8Source};
use crate::{CsvError, Result};

/// Owns a character source and reads CSV rows from it.
///
/// The source is closed when the reader is closed or dropped. Each call to
/// [`CsvReader::rows`] starts a traversal at wherever the previous one left
/// the source; nothing is ever rewound.
pub struct CsvReader<S: CharSource> {
    input: Option<S>,
}

impl<S: CharSource> CsvReader<S> {
    pub const fn new(input: S) -> Self {
        Self { input: Some(input) }
    }

    /// Starts a traversal over the remaining rows.
    ///
    /// The traversal borrows the source, so disposing it leaves the source
    /// open for the reader to close. Fails with [`CsvError::MissingInput`]
    /// once the reader has been closed.
    pub fn rows(&mut self) -> Result<Rows<'_, S>> {
        let input = self.input.as_mut().ok_or(CsvError::MissingInput)?;
        Ok(Rows::new(input, Ownership::Borrowed))
    }

    /// Closes the source. Calling this again has no effect.
    pub fn close(&mut self) {
        if let Some(mut input) = self.input.take() {
            debug!("closing CSV reader input");
            input.close();
        }
    }

    #[inline(always)]
    pub const fn is_closed(&self) -> bool {
        self.input.is_none()
    }
}

impl<'t> CsvReader<StrSource<'t>> {
    pub fn from_text(text: &'t str) -> Self {
        Self::new(StrSource::new(text))
    }
}

impl<R: Read> CsvReader<Utf8Source<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(Utf8Source::new(reader))
    }
}

impl<S: CharSource> Drop for CsvReader<S> {
    fn drop(&mut self) {
        self.close();
    }
}
