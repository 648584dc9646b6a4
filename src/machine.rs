use crate::source::{CharSource, Cursor};
use crate::{CsvError, Result};

/// Splits the characters of one row into fields.
///
/// The machine only remembers what it needs across fields of the same row:
/// whether the row terminator has been reached, and whether the field being
/// decoded was introduced by a comma. Everything else lives in
/// [`FieldMachine::next_field`] for the duration of one field.
pub(crate) struct FieldMachine {
    row_ended: bool,
    after_comma: bool,
}

impl FieldMachine {
    pub(crate) const fn new() -> Self {
        Self {
            row_ended: true,
            after_comma: false,
        }
    }

    pub(crate) fn begin_row(&mut self) {
        self.row_ended = false;
        self.after_comma = false;
    }

    /// Decodes the next field of the current row.
    ///
    /// Returns `Ok(None)` once the row has no more fields. After a row
    /// terminator has been consumed this doesn't touch `input` at all, so the
    /// cursor is left at the start of the next row.
    pub(crate) fn next_field<S: CharSource>(
        &mut self,
        input: &mut Cursor<'_, S>,
    ) -> Result<Option<String>> {
        if self.row_ended {
            return Ok(None);
        }

        let mut quoting = Quoting::Unquoted;
        let mut field = String::new();
        loop {
            let Some(c) = input.read()? else {
                self.row_ended = true;
                if field.is_empty() && quoting == Quoting::Unquoted && !self.after_comma {
                    return Ok(None);
                }
                return Ok(Some(field));
            };

            match c {
                ',' | '\r' | '\n' if quoting == Quoting::Open => field.push(c),
                ',' => {
                    self.after_comma = true;
                    return Ok(Some(field));
                }
                '\r' | '\n' => {
                    // "\r\n" is one terminator, not two.
                    if c == '\r' && input.peek()? == Some('\n') {
                        input.read()?;
                    }
                    self.row_ended = true;
                    return Ok(Some(field));
                }
                '"' => match quoting {
                    Quoting::Open => {
                        if input.peek()? == Some('"') {
                            input.read()?;
                            field.push('"');
                        } else {
                            quoting = Quoting::Closed;
                        }
                    }
                    _ if !field.is_empty() => {
                        return Err(CsvError::MalformedQuote {
                            position: input.last_position(),
                        });
                    }
                    Quoting::Unquoted => quoting = Quoting::Open,
                    Quoting::Closed => {}
                },
                // Includes anything trailing a closed quote, e.g. `"abc"def`.
                _ => field.push(c),
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Unquoted,
    Open,
    Closed,
}
