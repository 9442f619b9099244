//! This module provides parsing utilities for memory statistics as reported in Linux cgroup files.
//!
//! It covers the memory accounting files of both hierarchies:
//!
//! - **Limits** land in a [`MemoryLimit`]. The unified hierarchy's
//!   `memory.max` is either a decimal byte count or the literal `max`; the
//!   split hierarchy's `memory.limit_in_bytes` is always numeric but reports
//!   "no limit" as an enormous sentinel value, which
//!   [`MemoryLimit::from_v1_reader`] maps onto the same unlimited marker.
//!
//! - **Current usage** from `memory.current` (v2) or `memory.usage_in_bytes`
//!   (v1), a single byte count parsed into [`MemoryUsage`].
//!
//! - **Detailed counters** from `memory.stat`, filtered down to a curated
//!   whitelist in a [`MemoryStat`]. The full file carries dozens of fields;
//!   only the keys relevant to the active hierarchy are kept, in file order.
//!
//! # Error handling
//!
//! A scalar file with garbage content is a parse error, surfaced so the
//! caller can drop that one field. In particular, a `memory.max` value that
//! is neither `max` nor a number is an error, never "unlimited". Within
//! `memory.stat` a bad value costs only its own line.

use std::io::BufRead;

use super::parser::{self, SingleLineStat};
use super::StatParseError;

/// Values above this are the v1 kernel's way of saying "no limit set".
///
/// The split hierarchy reports an unconfigured limit as a huge byte count,
/// commonly `2^63 - 1` rounded down to the page size. The exact sentinel
/// varies by kernel version, so anything past `2^60` (an exbibyte, far
/// beyond real memory sizes) is treated as unlimited.
pub const V1_UNLIMITED_BYTES: u64 = 1 << 60;

/// Memory limit from `memory.max` (v2) or `memory.limit_in_bytes` (v1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryLimit {
    /// Limit in bytes.
    ///
    /// A value of `None` means no limit is configured.
    pub limit_bytes: Option<u64>,
}

impl MemoryLimit {
    /// Interprets a v1 `memory.limit_in_bytes` value.
    ///
    /// Values beyond [`V1_UNLIMITED_BYTES`] map onto the unlimited marker
    /// instead of surfacing as a literal enormous byte count.
    pub(crate) fn from_v1_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        let raw = parser::read_u64(buf)?;
        let limit_bytes = (raw <= V1_UNLIMITED_BYTES).then_some(raw);
        Ok(MemoryLimit { limit_bytes })
    }
}

impl SingleLineStat for MemoryLimit {
    /// Parses the v2 `memory.max` format: a decimal byte count, or the
    /// literal `max` for no limit.
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        let mut line = String::new();
        buf.read_line(&mut line)?;
        let limit_bytes = match line.trim() {
            "max" => None,
            value => Some(value.parse::<u64>().map_err(|source| {
                StatParseError::InvalidValue {
                    value: value.to_string(),
                    line: 1,
                    source,
                }
            })?),
        };

        Ok(MemoryLimit { limit_bytes })
    }
}

/// Current memory consumption from `memory.current` (v2) or
/// `memory.usage_in_bytes` (v1); both hold a single byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryUsage {
    /// Total memory usage in bytes.
    pub usage_bytes: u64,
}

impl SingleLineStat for MemoryUsage {
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        Ok(MemoryUsage {
            usage_bytes: parser::read_u64(buf)?,
        })
    }
}

/// Curated slice of a `memory.stat` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoryStat {
    /// Whitelisted fields in file order, each a byte value.
    pub fields: Vec<(&'static str, u64)>,
}

impl MemoryStat {
    /// Reads a `memory.stat` table, keeping only the fields named in `keys`.
    pub fn from_reader_filtered<R: BufRead>(
        buf: &mut R,
        keys: &'static [&'static str],
    ) -> std::io::Result<Self> {
        Ok(MemoryStat {
            fields: parser::parse_filtered_kv(buf, keys)?,
        })
    }
}
