//! Log tail and follow support.
//!
//! Unlike a simple `read_to_string` + `.lines()` tail, this scans the file
//! backwards in fixed-size chunks so a single unit's log, however large,
//! never needs to be loaded wholesale into memory just to return its last
//! few lines.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use pm0_core::Pm0Error;

/// Read chunk size for the backwards scan.
const CHUNK_SIZE: usize = 64 * 1024;
/// Safety cap: a single line longer than this is split regardless of
/// whether a newline was found, so one pathological line can't exhaust
/// memory.
const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

pub const MIN_LINES: usize = 1;
pub const MAX_LINES: usize = 1000;
pub const DEFAULT_LINES: usize = 32;

/// Clamp a caller-supplied line count into `[MIN_LINES, MAX_LINES]`,
/// defaulting to [`DEFAULT_LINES`] when `requested` is zero.
pub fn clamp_lines(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_LINES
    } else {
        requested.clamp(MIN_LINES, MAX_LINES)
    }
}

/// Return the last `lines` lines of the file at `path`, oldest first.
/// A missing file is treated as empty, not an error.
pub fn tail(path: &Path, lines: usize) -> Result<Vec<String>, Pm0Error> {
    let mut file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Pm0Error::Io(e)),
    };
    let mut len = file.metadata()?.len();
    if len == 0 {
        return Ok(Vec::new());
    }

    // A trailing newline only terminates the file's last line; it isn't a
    // separator introducing a further, empty one. Drop it before scanning
    // so it doesn't finalize a spurious blank entry.
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last_byte = [0u8; 1];
    file.read_exact(&mut last_byte)?;
    if last_byte[0] == b'\n' {
        len -= 1;
    }
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut pos = len;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut current_line: Vec<u8> = Vec::new();
    let mut found: Vec<String> = Vec::new();

    'scan: while pos > 0 && found.len() < lines {
        let chunk_len = (buf.len() as u64).min(pos) as usize;
        pos -= chunk_len as u64;
        file.seek(SeekFrom::Start(pos))?;
        file.read_exact(&mut buf[..chunk_len])?;

        for &byte in buf[..chunk_len].iter().rev() {
            if byte == b'\n' {
                found.push(finish_line(&mut current_line));
                if found.len() >= lines {
                    break 'scan;
                }
            } else {
                current_line.push(byte);
                if current_line.len() >= MAX_LINE_BYTES {
                    found.push(finish_line(&mut current_line));
                    if found.len() >= lines {
                        break 'scan;
                    }
                }
            }
        }
    }

    if !current_line.is_empty() && found.len() < lines {
        found.push(finish_line(&mut current_line));
    }

    found.reverse();
    Ok(found)
}

fn finish_line(buf: &mut Vec<u8>) -> String {
    buf.reverse();
    let line = String::from_utf8_lossy(buf).into_owned();
    buf.clear();
    line
}

/// Cursor for follow mode: tracks a byte offset into a growing (and
/// possibly truncated) log file.
pub struct Follower {
    offset: u64,
}

impl Follower {
    /// Start following from the current end of the file.
    pub fn from_end(path: &Path) -> Result<Self, Pm0Error> {
        let offset = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        Ok(Self { offset })
    }

    /// Read any bytes appended since the last poll. If the file has
    /// shrunk (rotated or cleared), the offset is clamped to the new end
    /// so following continues rather than erroring.
    pub fn poll(&mut self, path: &Path) -> Result<Vec<String>, Pm0Error> {
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.offset = 0;
                return Ok(Vec::new());
            }
            Err(e) => return Err(Pm0Error::Io(e)),
        };
        let len = file.metadata()?.len();
        if len < self.offset {
            self.offset = len;
            return Ok(Vec::new());
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut bytes = Vec::with_capacity((len - self.offset) as usize);
        file.read_to_end(&mut bytes)?;
        self.offset = len;

        let text = String::from_utf8_lossy(&bytes);
        Ok(text.lines().map(str::to_owned).collect())
    }
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
