use log::{debug, trace, warn};

use crate::machine::FieldMachine;
use crate::source::{CharSource, Cursor, Position};
use crate::{CsvError, Result};

/// Whether a [`Rows`] traversal is responsible for closing its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Disposing the traversal closes the source.
    Owned,
    /// The source belongs to someone else and is left open.
    Borrowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    /// No row has been produced yet.
    Ready,
    /// The current row may still have unread fields.
    FieldActive,
    /// Every field of the current row has been read.
    RowExhausted,
    /// No more rows, either because the input ended, a read failed, or the
    /// traversal was disposed.
    StreamExhausted,
}

/// A single forward pass over the rows of a CSV stream.
///
/// Only one row is active at a time. Moving to the next row first reads and
/// discards any fields the caller left unread, so the stream is always
/// positioned at a row boundary before the next row begins.
///
/// Any error ends the traversal: later calls to [`Rows::advance`] return
/// `false`.
pub struct Rows<'a, S: CharSource> {
    input: Option<Cursor<'a, S>>,
    ownership: Ownership,
    machine: FieldMachine,
    state: RowState,
    field: Option<String>,
    row_number: u64,
}

impl<'a, S: CharSource> Rows<'a, S> {
    pub fn new(source: &'a mut S, ownership: Ownership) -> Self {
        Self {
            input: Some(Cursor::new(source)),
            ownership,
            machine: FieldMachine::new(),
            state: RowState::Ready,
            field: None,
            row_number: 0,
        }
    }

    /// Moves to the next row, returning `false` once the input is exhausted.
    ///
    /// Fails with [`CsvError::MissingInput`] if the traversal was disposed.
    pub fn advance(&mut self) -> Result<bool> {
        if self.input.is_none() {
            return Err(CsvError::MissingInput);
        }
        let result = self.advance_row();
        if let Err(err) = &result {
            self.abort(err);
        }
        result
    }

    /// Returns the current row.
    ///
    /// Fails with [`CsvError::NoCurrent`] before the first successful
    /// [`Rows::advance`] and after the last row.
    pub fn current(&mut self) -> Result<Row<'_, 'a, S>> {
        match self.state {
            RowState::FieldActive | RowState::RowExhausted => Ok(Row { rows: self }),
            RowState::Ready | RowState::StreamExhausted => Err(CsvError::NoCurrent("row")),
        }
    }

    /// Advances and returns the new current row, or `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Row<'_, 'a, S>>> {
        if self.advance()? {
            Ok(Some(Row { rows: self }))
        } else {
            Ok(None)
        }
    }

    /// Always fails: rows are read exactly once.
    pub fn reset(&mut self) -> Result<()> {
        Err(CsvError::Unsupported("resetting a row traversal"))
    }

    /// The 1-based number of the current row, or of the last row produced.
    /// Zero before the first row.
    #[inline(always)]
    pub const fn row_number(&self) -> u64 {
        self.row_number
    }

    /// Position of the next character to be read, unless disposed.
    pub fn position(&self) -> Option<Position> {
        self.input.as_ref().map(Cursor::position)
    }

    /// Ends the traversal, closing the source if it is [`Ownership::Owned`].
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&mut self) {
        self.state = RowState::StreamExhausted;
        self.field = None;
        if let Some(mut input) = self.input.take() {
            if self.ownership == Ownership::Owned {
                debug!("closing CSV input after {} rows", self.row_number);
                input.close();
            }
        }
    }

    fn advance_row(&mut self) -> Result<bool> {
        let Some(input) = self.input.as_mut() else {
            return Err(CsvError::MissingInput);
        };
        if self.state == RowState::StreamExhausted {
            return Ok(false);
        }

        // Drain what the caller skipped so the next row starts at its own
        // first character.
        self.field = None;
        while self.machine.next_field(input)?.is_some() {}

        if input.peek()?.is_none() {
            self.state = RowState::StreamExhausted;
            return Ok(false);
        }
        self.machine.begin_row();
        self.state = RowState::FieldActive;
        self.row_number += 1;
        debug!("row {} starts at {}", self.row_number, input.position());
        Ok(true)
    }

    fn read_field(&mut self) -> Result<Option<String>> {
        if self.state != RowState::FieldActive {
            return Ok(None);
        }
        let Some(input) = self.input.as_mut() else {
            return Ok(None);
        };
        match self.machine.next_field(input) {
            Ok(Some(field)) => {
                trace!(
                    "row {}: decoded field of {} bytes",
                    self.row_number,
                    field.len()
                );
                Ok(Some(field))
            }
            Ok(None) => {
                self.state = RowState::RowExhausted;
                Ok(None)
            }
            Err(err) => {
                self.abort(&err);
                Err(err)
            }
        }
    }

    fn abort(&mut self, err: &CsvError) {
        warn!("CSV traversal stopped in row {}: {}", self.row_number, err);
        self.state = RowState::StreamExhausted;
        self.field = None;
    }
}

impl<S: CharSource> Drop for Rows<'_, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// The fields of the current row of a [`Rows`] traversal.
///
/// Fields are decoded on demand as the row is advanced or iterated. A `Row`
/// borrows its traversal, so it cannot outlive the move to the next row.
pub struct Row<'r, 'a, S: CharSource> {
    rows: &'r mut Rows<'a, S>,
}

impl<S: CharSource> Row<'_, '_, S> {
    /// Decodes the next field, returning `false` when the row has no more.
    pub fn advance(&mut self) -> Result<bool> {
        self.rows.field = self.rows.read_field()?;
        Ok(self.rows.field.is_some())
    }

    /// The field decoded by the last successful [`Row::advance`].
    pub fn current(&self) -> Result<&str> {
        self.rows
            .field
            .as_deref()
            .ok_or(CsvError::NoCurrent("field"))
    }

    /// Decodes and returns the next field, or `None` when the row has no
    /// more. This hands the value to the caller, so [`Row::current`] is
    /// unset afterwards.
    pub fn next_field(&mut self) -> Result<Option<String>> {
        self.rows.field = None;
        self.rows.read_field()
    }

    /// The 1-based number of this row.
    #[inline(always)]
    pub fn number(&self) -> u64 {
        self.rows.row_number
    }

    /// Always fails: fields are read exactly once.
    pub fn reset(&mut self) -> Result<()> {
        Err(CsvError::Unsupported("resetting a row"))
    }
}

impl<S: CharSource> Iterator for Row<'_, '_, S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_field().transpose()
    }
}
