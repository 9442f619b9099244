use std::path::Path;

/// Root of the cgroup filesystem on a standard Linux host.
///
/// Every stat file the collector reads lives below this point; there is no
/// configuration surface to relocate it.
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Controller list that only exists at the root of a v2 unified hierarchy.
const V2_MARKER: &str = "cgroup.controllers";

/// The cgroup API version exposed by the kernel.
///
/// Detected once at startup and fixed for the lifetime of the process; the
/// kernel cannot switch hierarchies while the system is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgroupVersion {
    /// Split per-controller hierarchy (`cpu/`, `memory/`, ...).
    V1,
    /// Unified hierarchy with a single directory of accounting files.
    V2,
}

impl std::fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CgroupVersion::V1 => write!(f, "v1"),
            CgroupVersion::V2 => write!(f, "v2"),
        }
    }
}

impl CgroupVersion {
    /// Detects the cgroup version exposed under `root`.
    ///
    /// The presence of the unified-hierarchy controller list is the v2
    /// signal, regardless of whether any v1 directories also exist. Absence,
    /// or any error while checking (permissions, not a cgroup mount at all),
    /// means the split v1 layout is assumed. This never fails and is checked
    /// exactly once per process.
    pub fn detect(root: impl AsRef<Path>) -> Self {
        let marker = root.as_ref().join(V2_MARKER);
        match marker.try_exists() {
            Ok(true) => CgroupVersion::V2,
            Ok(false) => CgroupVersion::V1,
            Err(err) => {
                log::debug!(
                    "could not check `{}`: {err}; assuming cgroup v1",
                    marker.display()
                );
                CgroupVersion::V1
            }
        }
    }

    /// Returns this version's stat file layout.
    pub(crate) fn paths(self) -> &'static PathTable {
        match self {
            CgroupVersion::V1 => &V1_PATHS,
            CgroupVersion::V2 => &V2_PATHS,
        }
    }
}

/// Stat file locations for one cgroup version, relative to the cgroup root.
///
/// Entries a version does not provide are `None`. The memory stat whitelist
/// differs between the versions because the unified hierarchy renamed most
/// of the accounting fields.
#[derive(Debug)]
pub(crate) struct PathTable {
    pub cpu_quota: Option<&'static str>,
    pub cpu_period: Option<&'static str>,
    pub cpu_usage: Option<&'static str>,
    pub cpu_max: Option<&'static str>,
    pub cpu_stat: Option<&'static str>,
    pub memory_limit: &'static str,
    pub memory_current: &'static str,
    pub memory_stat: &'static str,
    pub memory_stat_keys: &'static [&'static str],
}

static V1_PATHS: PathTable = PathTable {
    cpu_quota: Some("cpu/cpu.cfs_quota_us"),
    cpu_period: Some("cpu/cpu.cfs_period_us"),
    cpu_usage: Some("cpu,cpuacct/cpuacct.usage"),
    cpu_max: None,
    cpu_stat: None,
    memory_limit: "memory/memory.limit_in_bytes",
    memory_current: "memory/memory.usage_in_bytes",
    memory_stat: "memory/memory.stat",
    memory_stat_keys: &["cache", "rss", "mapped_file", "inactive_anon"],
};

static V2_PATHS: PathTable = PathTable {
    cpu_quota: None,
    cpu_period: None,
    cpu_usage: None,
    cpu_max: Some("cpu.max"),
    cpu_stat: Some("cpu.stat"),
    memory_limit: "memory.max",
    memory_current: "memory.current",
    memory_stat: "memory.stat",
    memory_stat_keys: &["anon", "file", "kernel_stack", "slab"],
};
