//! This module provides parsing utilities for CPU statistics as reported in Linux cgroup files.
//!
//! It covers the CPU accounting files of both hierarchies:
//!
//! - **Bandwidth limits** land in a [`CpuLimit`]. On the unified hierarchy
//!   this is the two-token `cpu.max` line (`<quota> <period>`, with `max`
//!   standing in for an unset quota); on the split hierarchy the quota and
//!   period come from the separate `cpu.cfs_quota_us` and `cpu.cfs_period_us`
//!   files and are assembled with [`CpuLimit::from_parts`]. Either way the
//!   derived core count comes from [`CpuLimit::core_limit`].
//!
//! - **Cumulative usage** from the v1 `cpuacct.usage` counter, a single
//!   nanosecond value, parsed into [`CpuUsage`].
//!
//! - **Free-form counters** from the v2 `cpu.stat` file, captured line by
//!   line in [`CpuStat`].
//!
//! # Parsing assumptions
//!
//! - `cpu.max` holds one line of one or two whitespace-separated tokens. A
//!   token that fails to parse leaves only its own field empty, so a partial
//!   line still contributes whatever survived.
//! - `cpuacct.usage` holds exactly one decimal value.
//!
//! # Error handling
//!
//! A malformed `cpuacct.usage` is a parse error; `cpu.max` degrades per token
//! instead of failing, matching how limits are assembled from two independent
//! files on v1.

use std::io::BufRead;

use super::parser::{self, SingleLineStat};

/// CPU bandwidth limit, from `cpu.max` (v2) or the `cpu.cfs_quota_us` and
/// `cpu.cfs_period_us` file pair (v1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuLimit {
    /// Allowed CPU time per period in microseconds.
    ///
    /// `-1` is the kernel's "no quota" sentinel on the split hierarchy; the
    /// unified hierarchy's `max` token maps onto the same value.
    pub quota: Option<i64>,
    /// Enforcement period in microseconds.
    pub period: Option<u64>,
}

/// Core count allowed by a [`CpuLimit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoreLimit {
    /// No quota is configured; the group may use every CPU.
    Unlimited,
    /// Fraction of CPUs allowed, quota divided by period.
    Cores(f64),
}

impl std::fmt::Display for CoreLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreLimit::Unlimited => write!(f, "unlimited"),
            CoreLimit::Cores(cores) => write!(f, "{cores:.2} cores"),
        }
    }
}

impl CpuLimit {
    /// Assembles a limit from independently read quota and period values, as
    /// the split hierarchy reports them.
    pub(crate) fn from_parts(quota: Option<i64>, period: Option<u64>) -> Self {
        Self { quota, period }
    }

    /// Derives the allowed core count.
    ///
    /// A quota of `-1` always means unlimited, whatever the period says. A
    /// ratio is only produced when both values parsed and are strictly
    /// positive; any other combination (missing file, malformed token, zero
    /// or negative quota, zero period) yields `None` rather than a
    /// misleading zero.
    pub fn core_limit(&self) -> Option<CoreLimit> {
        match (self.quota, self.period) {
            (Some(-1), _) => Some(CoreLimit::Unlimited),
            (Some(quota), Some(period)) if quota > 0 && period > 0 => {
                Some(CoreLimit::Cores(quota as f64 / period as f64))
            }
            _ => None,
        }
    }
}

impl SingleLineStat for CpuLimit {
    /// Parses the `cpu.max` format: `<quota> <period>` on a single line,
    /// where quota is a decimal value or the literal `max`.
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        let mut line = String::new();
        buf.read_line(&mut line)?;
        let mut parts = line.split_whitespace();

        let quota = match parts.next() {
            Some("max") => Some(-1),
            Some(token) => token.parse::<i64>().ok(),
            None => None,
        };
        let period = parts.next().and_then(|p| p.parse::<u64>().ok());

        Ok(CpuLimit { quota, period })
    }
}

/// Cumulative CPU time consumed, from the v1 `cpuacct.usage` counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuUsage {
    /// Total CPU time in nanoseconds since the hierarchy was created.
    pub usage_ns: u64,
}

impl SingleLineStat for CpuUsage {
    fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        Ok(CpuUsage {
            usage_ns: parser::read_u64(buf)?,
        })
    }
}

/// Raw contents of the v2 `cpu.stat` file.
///
/// The unified hierarchy exposes a small fixed set of counters here, so the
/// lines are surfaced as-is instead of being filtered the way `memory.stat`
/// is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CpuStat {
    /// Non-empty lines in file order, trimmed.
    pub lines: Vec<String>,
}

impl CpuStat {
    /// Reads every non-empty line of a `cpu.stat` file.
    pub fn from_reader<R: BufRead>(buf: &mut R) -> std::io::Result<Self> {
        Ok(CpuStat {
            lines: parser::read_raw_lines(buf)?,
        })
    }
}
