//! Vector file I/O.
//!
//! The canonical format is one 16-bit word per line as four lowercase hex
//! digits (`$readmemh`-compatible). Raw little-endian `u16` streams, as
//! produced by the video testbench, are accepted for reading.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use crate::{Error, Result};

/// File extensions treated as raw little-endian streams by [`read_stream`].
pub const RAW_EXTENSIONS: &[&str] = &["rgb", "raw", "bin"];

pub fn format_hex(words: &[u16]) -> String {
    let mut text = String::with_capacity(words.len() * 5);
    for word in words {
        let _ = writeln!(text, "{word:04x}");
    }
    text
}

/// Parse newline-delimited hex words. Blank lines and `//` comments are
/// skipped; anything else that is not a 16-bit hex value is an error.
pub fn parse_hex(text: &str, origin: &Path) -> Result<Vec<u16>> {
    let mut words = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let line = match raw_line.split_once("//") {
            Some((code, _)) => code.trim(),
            None => raw_line.trim(),
        };
        if line.is_empty() {
            continue;
        }
        let word = u16::from_str_radix(line, 16).map_err(|err| Error::Parse {
            path: origin.to_path_buf(),
            line: index + 1,
            reason: format!("'{line}' is not a 16-bit hex word ({err})"),
        })?;
        words.push(word);
    }
    Ok(words)
}

pub fn write_hex(path: &Path, words: &[u16]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = std::io::BufWriter::new(file);
    writer
        .write_all(format_hex(words).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|err| Error::io(path, err))
}

pub fn read_hex(path: &Path) -> Result<Vec<u16>> {
    let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    parse_hex(&text, path)
}

pub fn read_raw_le(path: &Path) -> Result<Vec<u16>> {
    let bytes = std::fs::read(path).map_err(|err| Error::io(path, err))?;
    if bytes.len() % 2 != 0 {
        return Err(Error::Parse {
            path: path.to_path_buf(),
            line: 0,
            reason: format!(
                "truncated stream: {} bytes is not a whole number of words",
                bytes.len()
            ),
        });
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

pub fn write_raw_le(path: &Path, words: &[u16]) -> Result<()> {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    std::fs::write(path, bytes).map_err(|err| Error::io(path, err))
}

/// Read a stream in whichever format its extension implies.
pub fn read_stream(path: &Path) -> Result<Vec<u16>> {
    let is_raw = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| RAW_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if is_raw {
        read_raw_le(path)
    } else {
        read_hex(path)
    }
}
