//! File I/O — load raw lines, save CRLF-joined rows.
//!
//! Loading is byte-exact apart from line terminators: every `\r` and `\n`
//! at the end of a line is dropped, nothing else is touched. Saving joins
//! rows with `\r\n` and leaves the last row unterminated.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Row separator written on save.
pub const LINE_ENDING: &[u8] = b"\r\n";

// ---------------------------------------------------------------------------
// Decode / encode
// ---------------------------------------------------------------------------

/// Split file contents into lines.
///
/// A final `\n` does not start another line, so `"a\n"` is one line and
/// empty input is no lines at all.
#[must_use]
pub fn parse_lines(data: &[u8]) -> Vec<&[u8]> {
    if data.is_empty() {
        return Vec::new();
    }
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    data.split(|&b| b == b'\n').map(trim_line_end).collect()
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

/// Serialize a buffer for writing.
#[must_use]
pub fn encode(buf: &Buffer) -> Vec<u8> {
    buf.lines().collect::<Vec<_>>().join(LINE_ENDING)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Read `path` into a buffer.
///
/// A missing file is created empty and yields a single empty row.
///
/// # Errors
///
/// Any I/O error other than the file not existing, or failing to create it.
pub fn load(path: &Path, tab_width: usize) -> Result<Buffer> {
    match fs::read(path) {
        Ok(data) => {
            let buf = Buffer::from_lines(parse_lines(&data), tab_width);
            info!(path = %path.display(), rows = buf.row_count(), "opened");
            Ok(buf)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            File::create(path)?;
            info!(path = %path.display(), "created new file");
            Ok(Buffer::new(tab_width))
        }
        Err(err) => Err(err.into()),
    }
}

/// Overwrite an existing file with the buffer. Returns bytes written.
///
/// # Errors
///
/// [`Error::FileMissing`] if `path` no longer exists, [`Error::Io`] for any
/// other failure.
pub fn save(path: &Path, buf: &Buffer) -> Result<usize> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::FileMissing(path.to_path_buf()),
            _ => Error::Io(err),
        })?;
    write_to(file, path, buf)
}

/// Create or truncate `path` and write the buffer. Returns bytes written.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be created or written.
pub fn save_as(path: &Path, buf: &Buffer) -> Result<usize> {
    let file = File::create(path)?;
    write_to(file, path, buf)
}

fn write_to(mut file: File, path: &Path, buf: &Buffer) -> Result<usize> {
    let bytes = encode(buf);
    file.write_all(&bytes)?;
    file.flush()?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote buffer");
    Ok(bytes.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
