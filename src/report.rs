//! Plain-text rendering of resource snapshots.
//!
//! Rendering is pure string building so it can be tested without touching
//! the filesystem or the clock; only the run loop writes to stdout. Fields
//! that are absent from a snapshot produce no output line at all, so a
//! non-container host simply prints a shorter report.

use std::num::NonZeroUsize;

use chrono::{DateTime, Local};

use crate::cgroup::CgroupVersion;
use crate::cgroup::stats::{CgroupSnapshot, CpuLimit, CpuSnapshot, MemorySnapshot};
use crate::fmtutil::{format_bytes, group_thousands};

const RULE_WIDTH: usize = 80;

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// Renders the startup banner with the detected cgroup version.
pub fn render_banner(version: CgroupVersion) -> String {
    let heavy = rule('=');
    format!("{heavy}\nResource Monitor Started\n{heavy}\nDetected cgroup version: {version}\n{heavy}\n\n")
}

/// Renders one tick's snapshot under a local-time header.
pub fn render_tick(
    snapshot: &CgroupSnapshot,
    version: CgroupVersion,
    cpus: Option<NonZeroUsize>,
    now: DateTime<Local>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("[{}]\n", now.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&rule('-'));
    out.push('\n');

    render_cpu(&mut out, &snapshot.cpu, version, cpus);
    out.push('\n');
    render_memory(&mut out, &snapshot.memory, version);
    out.push('\n');

    out.push_str(&rule('='));
    out.push_str("\n\n");
    out
}

fn render_cpu(
    out: &mut String,
    cpu: &CpuSnapshot,
    version: CgroupVersion,
    cpus: Option<NonZeroUsize>,
) {
    out.push_str("CPU Resources:\n");

    if let Some(cpus) = cpus {
        out.push_str(&format!("  Available CPUs: {cpus}\n"));
    }

    match version {
        CgroupVersion::V1 => {
            if let Some(quota) = cpu.limit.quota {
                out.push_str(&format!("  cgroup v1 cpu.cfs_quota_us: {quota}\n"));
            }
            if let Some(period) = cpu.limit.period {
                out.push_str(&format!("  cgroup v1 cpu.cfs_period_us: {period}\n"));
            }
        }
        CgroupVersion::V2 => {
            if let Some(line) = render_cpu_max(&cpu.limit) {
                out.push_str(&format!("  cgroup v2 cpu.max: {line}\n"));
            }
        }
    }

    if let Some(limit) = cpu.limit.core_limit() {
        out.push_str(&format!("  CPU Limit: {limit}\n"));
    }

    if let Some(usage) = &cpu.usage {
        let ns = i64::try_from(usage.usage_ns).unwrap_or(i64::MAX);
        out.push_str(&format!(
            "  Total CPU usage (nanoseconds): {}\n",
            group_thousands(ns)
        ));
    }

    if let Some(stat) = &cpu.stat {
        if !stat.lines.is_empty() {
            out.push_str("  cgroup v2 cpu.stat:\n");
            for line in &stat.lines {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
}

/// Reconstructs the displayable `cpu.max` content from the parsed limit.
fn render_cpu_max(limit: &CpuLimit) -> Option<String> {
    let quota = limit.quota?;
    let quota = if quota == -1 {
        "max".to_owned()
    } else {
        quota.to_string()
    };
    Some(match limit.period {
        Some(period) => format!("{quota} {period}"),
        None => quota,
    })
}

fn render_memory(out: &mut String, memory: &MemorySnapshot, version: CgroupVersion) {
    let (limit_label, usage_label, stat_label) = match version {
        CgroupVersion::V1 => (
            "cgroup v1 memory.limit_in_bytes",
            "cgroup v1 memory.usage_in_bytes",
            "cgroup v1 memory.stat (selected)",
        ),
        CgroupVersion::V2 => (
            "cgroup v2 memory.max",
            "cgroup v2 memory.current",
            "cgroup v2 memory.stat (selected)",
        ),
    };

    out.push_str("Memory Resources:\n");

    if let Some(limit) = &memory.limit {
        match limit.limit_bytes {
            Some(bytes) => out.push_str(&format!("  {limit_label}: {}\n", format_bytes(bytes))),
            None => out.push_str(&format!("  {limit_label}: unlimited\n")),
        }
    }

    if let Some(usage) = &memory.usage {
        out.push_str(&format!(
            "  {usage_label}: {}\n",
            format_bytes(usage.usage_bytes)
        ));
    }

    if let Some(stat) = &memory.stat {
        if !stat.fields.is_empty() {
            out.push_str(&format!("  {stat_label}:\n"));
            for (key, value) in &stat.fields {
                out.push_str(&format!("    {key}: {}\n", format_bytes(*value)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgroup::stats::{
        CpuStat, CpuUsage, MemoryLimit, MemoryStat, MemoryUsage,
    };

    fn v2_snapshot() -> CgroupSnapshot {
        CgroupSnapshot {
            cpu: CpuSnapshot {
                limit: CpuLimit {
                    quota: Some(50000),
                    period: Some(100000),
                },
                usage: None,
                stat: Some(CpuStat {
                    lines: vec!["usage_usec 100".to_owned(), "user_usec 60".to_owned()],
                }),
            },
            memory: MemorySnapshot {
                limit: Some(MemoryLimit { limit_bytes: None }),
                usage: Some(MemoryUsage { usage_bytes: 1536 }),
                stat: Some(MemoryStat {
                    fields: vec![("anon", 1024), ("file", 2048)],
                }),
            },
        }
    }

    #[test]
    fn test_render_banner_shows_version() {
        let banner = render_banner(CgroupVersion::V2);
        assert!(banner.contains("Detected cgroup version: v2"));
        assert!(banner.starts_with(&"=".repeat(80)));
    }

    #[test]
    fn test_render_tick_v2() {
        let out = render_tick(
            &v2_snapshot(),
            CgroupVersion::V2,
            NonZeroUsize::new(8),
            Local::now(),
        );

        assert!(out.contains("CPU Resources:\n"));
        assert!(out.contains("  Available CPUs: 8\n"));
        assert!(out.contains("  cgroup v2 cpu.max: 50000 100000\n"));
        assert!(out.contains("  CPU Limit: 0.50 cores\n"));
        assert!(out.contains("  cgroup v2 cpu.stat:\n    usage_usec 100\n    user_usec 60\n"));
        assert!(out.contains("Memory Resources:\n"));
        assert!(out.contains("  cgroup v2 memory.max: unlimited\n"));
        assert!(out.contains("  cgroup v2 memory.current: 1.50 KB\n"));
        assert!(out.contains("    anon: 1.00 KB\n"));
        assert!(out.contains("    file: 2.00 KB\n"));
    }

    #[test]
    fn test_render_tick_v1_unlimited_quota() {
        let snapshot = CgroupSnapshot {
            cpu: CpuSnapshot {
                limit: CpuLimit {
                    quota: Some(-1),
                    period: Some(100000),
                },
                usage: Some(CpuUsage {
                    usage_ns: 623932088000,
                }),
                stat: None,
            },
            memory: MemorySnapshot {
                limit: Some(MemoryLimit {
                    limit_bytes: Some(104857600),
                }),
                usage: None,
                stat: None,
            },
        };

        let out = render_tick(&snapshot, CgroupVersion::V1, None, Local::now());

        assert!(out.contains("  cgroup v1 cpu.cfs_quota_us: -1\n"));
        assert!(out.contains("  cgroup v1 cpu.cfs_period_us: 100000\n"));
        assert!(out.contains("  CPU Limit: unlimited\n"));
        assert!(out.contains("  Total CPU usage (nanoseconds): 623,932,088,000\n"));
        assert!(out.contains("  cgroup v1 memory.limit_in_bytes: 100.00 MB\n"));
        assert!(!out.contains("Available CPUs"));
        assert!(!out.contains("cpu.stat"));
    }

    #[test]
    fn test_render_tick_empty_snapshot_has_no_metric_lines() {
        let out = render_tick(
            &CgroupSnapshot::default(),
            CgroupVersion::V2,
            None,
            Local::now(),
        );

        assert!(out.contains("CPU Resources:\n"));
        assert!(out.contains("Memory Resources:\n"));
        assert!(!out.contains("cpu.max"));
        assert!(!out.contains("CPU Limit"));
        assert!(!out.contains("memory.max"));
        assert!(!out.contains("memory.current"));
    }

    #[test]
    fn test_render_cpu_max_partial_parse() {
        assert_eq!(
            render_cpu_max(&CpuLimit {
                quota: Some(50000),
                period: None,
            })
            .as_deref(),
            Some("50000")
        );
        assert_eq!(
            render_cpu_max(&CpuLimit {
                quota: None,
                period: Some(100000),
            }),
            None
        );
        assert_eq!(
            render_cpu_max(&CpuLimit {
                quota: Some(-1),
                period: Some(100000),
            })
            .as_deref(),
            Some("max 100000")
        );
    }
}
