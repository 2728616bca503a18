//! Protocol codec
//!
//! Line framing over any `BufRead` / `Write`.

use std::io::{BufRead, Read, Write};

use super::Response;
use crate::error::{KvError, Result};

/// Read one line of at most `max_len` bytes (terminator excluded).
///
/// Returns `None` on a clean EOF. A final line without a terminator is
/// accepted. Longer lines are a protocol error.
pub fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<String>> {
    let mut line = String::new();
    let read = reader
        .by_ref()
        .take(max_len as u64 + 1)
        .read_line(&mut line)?;

    if read == 0 {
        return Ok(None);
    }
    if !line.ends_with('\n') && line.len() > max_len {
        return Err(KvError::Protocol(format!(
            "message too large: more than {} bytes",
            max_len
        )));
    }

    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Write one newline-terminated line and flush
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_line(writer, &response.to_line())
}

/// Read a complete response from a stream
pub fn read_response<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Response> {
    match read_line(reader, max_len)? {
        Some(line) => Ok(Response::parse_line(&line)),
        None => Err(KvError::Network("connection closed by server".to_string())),
    }
}
