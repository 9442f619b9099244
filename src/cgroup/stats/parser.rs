//! Shared reader primitives for the kernel's cgroup stat file formats.
//!
//! Three text shapes cover every file this crate consumes:
//!
//! - single-line scalars (`memory.current`, `cpuacct.usage`) and single-line
//!   multi-token records (`cpu.max`), parsed through the [`SingleLineStat`]
//!   trait;
//! - multi-line `key value` tables (`memory.stat`), filtered down to a
//!   whitelist of keys via [`parse_filtered_kv`];
//! - free-form line blobs (`cpu.stat` on the unified hierarchy), passed
//!   through untouched via [`read_raw_lines`].
//!
//! The whitelist filter is implemented once and parameterized by the key set
//! of the active hierarchy; a line whose value fails to parse loses only that
//! line, never the whole read.

use std::io::BufRead;

use super::StatParseError;

/// A trait for parsing single-line statistics, such as `memory.current`,
/// `memory.max`, or `cpu.max` files.
///
/// Implementors provide a method to parse from a buffered reader, returning
/// the strongly typed structure.
pub trait SingleLineStat: Sized + Default {
    /// Parses a single-line statistic from the provided buffered reader.
    ///
    /// # Errors
    ///
    /// Returns `Err(std::io::Error)` if reading fails or the content is not
    /// in the expected format for the implementing type.
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self>;
}

/// Reads the first line of `buf` and parses it as an unsigned decimal.
pub(crate) fn read_u64<R: BufRead>(buf: &mut R) -> std::io::Result<u64> {
    let mut line = String::new();
    buf.read_line(&mut line)?;
    let line = line.trim();
    let value = line
        .parse::<u64>()
        .map_err(|source| StatParseError::InvalidValue {
            value: line.to_string(),
            line: 1,
            source,
        })?;
    Ok(value)
}

/// Reads the first line of `buf` and parses it as a signed decimal. The v1
/// CPU quota file needs the sign, `-1` being the kernel's "no quota" value.
pub(crate) fn read_i64<R: BufRead>(buf: &mut R) -> std::io::Result<i64> {
    let mut line = String::new();
    buf.read_line(&mut line)?;
    let line = line.trim();
    let value = line
        .parse::<i64>()
        .map_err(|source| StatParseError::InvalidValue {
            value: line.to_string(),
            line: 1,
            source,
        })?;
    Ok(value)
}

/// Parses a multi-line `key value` stat table, keeping only lines whose first
/// whitespace-delimited token appears in `keys`.
///
/// File order is preserved. Lines with an unknown key, fewer than two tokens,
/// or a value that does not parse as `u64` are skipped; a bad value costs
/// exactly one field.
pub(crate) fn parse_filtered_kv<R: BufRead>(
    buf: &mut R,
    keys: &'static [&'static str],
) -> std::io::Result<Vec<(&'static str, u64)>> {
    let mut fields = Vec::with_capacity(keys.len());
    let mut line = String::new();

    while buf.read_line(&mut line)? != 0 {
        let mut parts = line.split_whitespace();
        if let (Some(key), Some(val)) = (parts.next(), parts.next()) {
            if let Some(&known) = keys.iter().find(|&&k| k == key) {
                match val.parse::<u64>() {
                    Ok(value) => fields.push((known, value)),
                    Err(err) => {
                        log::debug!("skipping stat field `{known}`: bad value '{val}': {err}");
                    }
                }
            }
        }
        line.clear();
    }

    Ok(fields)
}

/// Collects every non-empty trimmed line of a free-form stat file.
pub(crate) fn read_raw_lines<R: BufRead>(buf: &mut R) -> std::io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut line = String::new();

    while buf.read_line(&mut line)? != 0 {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_owned());
        }
        line.clear();
    }

    Ok(lines)
}
