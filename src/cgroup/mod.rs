//! Cgroup version detection and resource metrics extraction.
//!
//! This module decides which cgroup API the kernel exposes and reads CPU and
//! memory accounting from the matching file layout, producing an ephemeral
//! snapshot per tick for the reporter to render.
//!
//! # Key Components
//!
//! - [`CgroupVersion`] — The detected hierarchy flavor, fixed at startup;
//!   carries each version's stat file layout and memory whitelist as data.
//! - [`Collector`] — Holds the stat file handles and assembles a
//!   [`stats::CgroupSnapshot`] on every call, re-reading each handle from
//!   offset zero.
//!
//! # Monitored files
//!
//! Relative to the cgroup root, by version:
//!
//! - v1: `cpu/cpu.cfs_quota_us`, `cpu/cpu.cfs_period_us`,
//!   `cpu,cpuacct/cpuacct.usage`, `memory/memory.limit_in_bytes`,
//!   `memory/memory.usage_in_bytes`, `memory/memory.stat`
//! - v2: `cpu.max`, `cpu.stat`, `memory.max`, `memory.current`,
//!   `memory.stat` (plus `cgroup.controllers` as the detection marker)
//!
//! # Platform Requirements
//!
//! - Linux with cgroup v1 or v2 support.
//! - Read access to `/sys/fs/cgroup`.

mod collector;
pub mod stats;
mod utils;
mod version;

pub use collector::Collector;
pub use version::{CGROUP_ROOT, CgroupVersion};
