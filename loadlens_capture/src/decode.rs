//! Line-delimited JSON decoding
//!
//! Decoding is all-or-nothing. The first line that does not decode into a
//! [`Record`] aborts the whole batch and no partial result is handed back.

use std::io::BufRead;

use tracing::debug;

use crate::record::Record;

/// Errors produced by [`parse`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading from the underlying stream failed.
    #[error("Failed to read result stream: {0}")]
    Io(#[from] std::io::Error),
    /// A line is not a structurally valid [`Record`].
    #[error("Failed to decode line {line_number} ({line:?}): {source}")]
    Decode {
        /// 1-based position of the offending line
        line_number: usize,
        /// The offending line, verbatim
        line: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Read every record from `reader`.
///
/// Each line of the stream must hold exactly one JSON encoded [`Record`].
/// A trailing newline at the end of the stream is permitted, a blank line
/// anywhere else is not. Unknown fields are ignored but every [`Record`]
/// field must be present: a missing field is a decode error, it is never
/// filled with a zero value.
///
/// # Errors
///
/// Returns [`Error::Decode`] for the first malformed line, including a line
/// that is not valid UTF-8, and [`Error::Io`] if the stream cannot be read. In
/// both cases no records are returned.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Record>, Error> {
    let mut records = Vec::new();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        match serde_json::from_slice::<Record>(&line) {
            Ok(record) => records.push(record),
            Err(source) => {
                return Err(Error::Decode {
                    line_number: idx + 1,
                    line: String::from_utf8_lossy(&line).into_owned(),
                    source,
                });
            }
        }
    }
    debug!("decoded {count} result records", count = records.len());
    Ok(records)
}
