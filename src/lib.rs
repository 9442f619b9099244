//! cgwatch: a periodic resource-usage reporter for cgroup-managed hosts.
//!
//! This library detects which cgroup API version the kernel exposes (the
//! split v1 controller hierarchy or the v2 unified hierarchy), reads CPU and
//! memory accounting files from the matching layout, and prints a
//! human-readable snapshot on a fixed interval until the process is
//! terminated.
//!
//! Reads are failure tolerant by design: a missing or malformed stat file is
//! an expected steady state (no limits configured, wrong hierarchy, not a
//! container at all) and only drops the one affected line from the report.

use std::time::Duration;

pub mod cgroup;
pub mod error;
pub mod fmtutil;
pub mod fsutil;
pub mod report;

use cgroup::{CGROUP_ROOT, CgroupVersion, Collector};

/// Seconds between snapshots. The reporter has no configuration surface, on
/// purpose; this is a diagnostic tool, not a metrics pipeline.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Runs the reporter: detect the cgroup version once, then sample and print
/// forever.
///
/// Never returns on its own; the process ends by external signal. The
/// version is not re-checked during the run because the kernel cannot switch
/// hierarchies while the system is up.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let version = CgroupVersion::detect(CGROUP_ROOT);
    log::debug!("cgroup root `{CGROUP_ROOT}` exposes cgroup {version}");

    print!("{}", report::render_banner(version));

    let cpus = std::thread::available_parallelism().ok();
    let mut collector = Collector::open(version, CGROUP_ROOT);

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        interval.tick().await;
        let snapshot = collector.sample();
        print!(
            "{}",
            report::render_tick(&snapshot, version, cpus, chrono::Local::now())
        );
    }
}
