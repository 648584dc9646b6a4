//! Streaming CSV decoder.
//!
//! This library turns a stream of characters into rows of string fields
//! without ever holding more than the field currently being decoded. Rows
//! and fields are both produced lazily: the caller pulls rows from a
//! [`Rows`] traversal, and then pulls fields from each [`Row`].
//!
//! The format is fixed. Fields are separated by `,`, rows end at `\r\n`,
//! `\r` or `\n`, and a field that begins with `"` is quoted: inside it,
//! commas and line breaks are ordinary data and `""` stands for one `"`.
//! A `"` anywhere else in a field is a [`CsvError::MalformedQuote`]. There
//! is no special handling of a header row.
//!
//! Moving to the next row always discards whatever was left unread of the
//! current one, so callers are free to stop reading a row early.
//!
//! ```rust
//! # use csvstream::CsvReader;
//! # fn main() -> csvstream::Result<()> {
//! let mut reader = CsvReader::from_text("name,age\r\n\"Doe, John\",30\r\n");
//! let mut rows = reader.rows()?;
//! # let mut all = Vec::new();
//! while let Some(row) = rows.next_row()? {
//!     let fields = row.collect::<csvstream::Result<Vec<String>>>()?;
//!     println!("{fields:?}");
//! #   all.push(fields);
//! }
//! # assert_eq!(all, vec![vec!["name", "age"], vec!["Doe, John", "30"]]);
//! # Ok(())
//! # }
//! ```
//!
//! ```plaintext
//! ["name", "age"]
//! ["Doe, John", "30"]
//! ```
//!
//! Input can come from an in-memory string through [`StrSource`], from any
//! [`std::io::Read`] through [`Utf8Source`], or from a custom
//! [`CharSource`] implementation.

mod error;
mod machine;
mod reader;
mod rows;
mod source;

pub use error::{CsvError, Result};
pub use reader::CsvReader;
pub use rows::{Ownership, Row, Rows};
pub use source::{CharSource, Position, StrSource, Utf8Source};
