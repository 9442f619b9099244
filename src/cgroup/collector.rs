use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::stats::{
    self, CgroupSnapshot, CpuLimit, CpuSnapshot, CpuStat, CpuUsage, MemoryLimit, MemorySnapshot,
    MemoryStat, MemoryUsage, SingleLineStat,
};
use super::utils;
use super::version::CgroupVersion;

/// Samples the CPU and memory accounting files of the detected cgroup
/// version.
///
/// Handles are opened once, from the per-version path table; every call to
/// [`Collector::sample`] re-reads each handle from the start, so the kernel
/// regenerates the content on each tick and no value is cached. A file that
/// could not be opened stays `None` and its metric is simply absent from
/// every snapshot, while the remaining fields keep populating normally.
#[derive(Debug)]
pub struct Collector {
    version: CgroupVersion,
    cpu_quota: Option<BufReader<File>>,
    cpu_period: Option<BufReader<File>>,
    cpu_usage: Option<BufReader<File>>,
    cpu_max: Option<BufReader<File>>,
    cpu_stat: Option<BufReader<File>>,
    memory_limit: Option<BufReader<File>>,
    memory_usage: Option<BufReader<File>>,
    memory_stat: Option<BufReader<File>>,
}

impl Collector {
    /// Opens the stat files of `version` relative to `root`.
    pub fn open(version: CgroupVersion, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let paths = version.paths();
        let open = |rel: &str| utils::open_stat_file(root.join(rel));

        Self {
            version,
            cpu_quota: paths.cpu_quota.and_then(open),
            cpu_period: paths.cpu_period.and_then(open),
            cpu_usage: paths.cpu_usage.and_then(open),
            cpu_max: paths.cpu_max.and_then(open),
            cpu_stat: paths.cpu_stat.and_then(open),
            memory_limit: open(paths.memory_limit),
            memory_usage: open(paths.memory_current),
            memory_stat: open(paths.memory_stat),
        }
    }

    /// The cgroup version this collector was opened for.
    pub fn version(&self) -> CgroupVersion {
        self.version
    }

    /// Reads every available stat file and assembles a fresh snapshot.
    ///
    /// Individual read or parse failures leave their field empty; the tick
    /// itself never fails.
    pub fn sample(&mut self) -> CgroupSnapshot {
        CgroupSnapshot {
            cpu: self.sample_cpu(),
            memory: self.sample_memory(),
        }
    }

    fn sample_cpu(&mut self) -> CpuSnapshot {
        let limit = match self.version {
            CgroupVersion::V1 => CpuLimit::from_parts(
                utils::sample_and_rewind(self.cpu_quota.as_mut(), stats::read_i64),
                utils::sample_and_rewind(self.cpu_period.as_mut(), stats::read_u64),
            ),
            CgroupVersion::V2 => {
                utils::sample_and_rewind(self.cpu_max.as_mut(), CpuLimit::from_reader)
                    .unwrap_or_default()
            }
        };

        CpuSnapshot {
            limit,
            usage: utils::sample_and_rewind(self.cpu_usage.as_mut(), CpuUsage::from_reader),
            stat: utils::sample_and_rewind(self.cpu_stat.as_mut(), CpuStat::from_reader),
        }
    }

    fn sample_memory(&mut self) -> MemorySnapshot {
        let limit = match self.version {
            CgroupVersion::V1 => {
                utils::sample_and_rewind(self.memory_limit.as_mut(), MemoryLimit::from_v1_reader)
            }
            CgroupVersion::V2 => {
                utils::sample_and_rewind(self.memory_limit.as_mut(), MemoryLimit::from_reader)
            }
        };
        let keys = self.version.paths().memory_stat_keys;

        MemorySnapshot {
            limit,
            usage: utils::sample_and_rewind(self.memory_usage.as_mut(), MemoryUsage::from_reader),
            stat: utils::sample_and_rewind(self.memory_stat.as_mut(), |buf| {
                MemoryStat::from_reader_filtered(buf, keys)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgroup::stats::CoreLimit;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_sample_v2_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "cpu.max", "50000 100000\n");
        write(root, "cpu.stat", "usage_usec 100\nuser_usec 60\n");
        write(root, "memory.max", "max\n");
        write(root, "memory.current", "8192\n");
        write(root, "memory.stat", "anon 1000\nfile 2000\nsock 5\n");

        let mut collector = Collector::open(CgroupVersion::V2, root);
        let snapshot = collector.sample();

        assert_eq!(snapshot.cpu.limit.quota, Some(50000));
        assert_eq!(snapshot.cpu.limit.period, Some(100000));
        assert_eq!(snapshot.cpu.limit.core_limit(), Some(CoreLimit::Cores(0.5)));
        assert_eq!(snapshot.cpu.usage, None);
        assert_eq!(
            snapshot.cpu.stat.unwrap().lines,
            vec!["usage_usec 100", "user_usec 60"]
        );

        let memory = snapshot.memory;
        assert_eq!(memory.limit.unwrap().limit_bytes, None);
        assert_eq!(memory.usage.unwrap().usage_bytes, 8192);
        assert_eq!(
            memory.stat.unwrap().fields,
            vec![("anon", 1000), ("file", 2000)]
        );
    }

    #[test]
    fn test_sample_v1_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "cpu/cpu.cfs_quota_us", "-1\n");
        write(root, "cpu/cpu.cfs_period_us", "100000\n");
        write(root, "cpu,cpuacct/cpuacct.usage", "123456789\n");
        write(root, "memory/memory.limit_in_bytes", "9223372036854771712\n");
        write(root, "memory/memory.usage_in_bytes", "4096\n");
        write(
            root,
            "memory/memory.stat",
            "cache 100\nrss 200\nunrelated 999\n",
        );

        let mut collector = Collector::open(CgroupVersion::V1, root);
        let snapshot = collector.sample();

        assert_eq!(snapshot.cpu.limit.quota, Some(-1));
        assert_eq!(snapshot.cpu.limit.period, Some(100000));
        assert_eq!(
            snapshot.cpu.limit.core_limit(),
            Some(CoreLimit::Unlimited)
        );
        assert_eq!(snapshot.cpu.usage.unwrap().usage_ns, 123_456_789);
        assert_eq!(snapshot.cpu.stat, None);

        let memory = snapshot.memory;
        assert_eq!(memory.limit.unwrap().limit_bytes, None);
        assert_eq!(memory.usage.unwrap().usage_bytes, 4096);
        assert_eq!(
            memory.stat.unwrap().fields,
            vec![("cache", 100), ("rss", 200)]
        );
    }

    #[test]
    fn test_sample_missing_files_leave_other_fields_populated() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "memory.current", "4096\n");

        let mut collector = Collector::open(CgroupVersion::V2, root);
        let snapshot = collector.sample();

        assert_eq!(snapshot.cpu.limit, CpuLimit::default());
        assert_eq!(snapshot.cpu.usage, None);
        assert_eq!(snapshot.cpu.stat, None);
        assert_eq!(snapshot.memory.limit, None);
        assert_eq!(snapshot.memory.stat, None);
        assert_eq!(snapshot.memory.usage.unwrap().usage_bytes, 4096);
    }

    #[test]
    fn test_sample_sees_fresh_content_each_tick() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "memory.current", "100\n");

        let mut collector = Collector::open(CgroupVersion::V2, root);
        assert_eq!(
            collector.sample().memory.usage.unwrap().usage_bytes,
            100
        );

        // same inode, new content; the rewound handle must observe it
        write(root, "memory.current", "200\n");
        assert_eq!(
            collector.sample().memory.usage.unwrap().usage_bytes,
            200
        );
    }

    #[test]
    fn test_sample_malformed_scalar_degrades_to_absent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "memory.current", "not-a-number\n");
        write(root, "memory.max", "104857600\n");

        let mut collector = Collector::open(CgroupVersion::V2, root);
        let snapshot = collector.sample();

        assert_eq!(snapshot.memory.usage, None);
        assert_eq!(snapshot.memory.limit.unwrap().limit_bytes, Some(104857600));
    }
}
