//! Raw OS reads.
//!
//! Everything platform-specific lives behind this seam; the rest of the
//! crate consumes plain values. Each function constructs its own query
//! context and drops it before returning, so calls stay one-shot and
//! stateless. Failed reads degrade to empty/zero results instead of
//! surfacing errors — callers are promised a result even on constrained
//! hosts.

use std::collections::BTreeMap;

use sysinfo::System;

use crate::system::topology::{CpuPlatform, CpuVendor, TopologyNode};

/// One CPU query: count, clock speed and the flattened topology tree.
pub(crate) struct CpuQuery {
    pub logical: usize,
    pub speed_mhz: u64,
    pub nodes: Vec<TopologyNode>,
}

/// Snapshot the CPU facts needed for descriptor construction.
pub(crate) fn query_cpus() -> CpuQuery {
    let mut sys = System::new();
    sys.refresh_cpu_all();

    let cpus = sys.cpus();
    let logical = if cpus.is_empty() {
        fallback_parallelism()
    } else {
        cpus.len()
    };
    let speed_mhz = cpus.first().map(|c| c.frequency()).unwrap_or(0);

    CpuQuery {
        logical,
        speed_mhz,
        nodes: build_nodes(&sys),
    }
}

pub(crate) fn logical_cpu_count() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    let n = sys.cpus().len();
    if n != 0 { n } else { fallback_parallelism() }
}

pub(crate) fn physical_cpu_count() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.physical_core_count()
        .unwrap_or_else(|| sys.cpus().len())
        .max(1)
}

fn fallback_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Build the flattened topology tree: one root, one package node per
/// physical package, one core node per physical core, one thread node per
/// logical CPU. An empty CPU list yields an empty sequence.
fn build_nodes(sys: &System) -> Vec<TopologyNode> {
    let cpus = sys.cpus();
    if cpus.is_empty() {
        return Vec::new();
    }

    let vendor = CpuVendor::from_vendor_id(cpus[0].vendor_id());
    let model = cpus[0].brand().trim().to_string();
    let physical = sys.physical_core_count().unwrap_or(cpus.len()).max(1);

    let mut nodes = Vec::with_capacity(2 + cpus.len() * 2);
    nodes.push(TopologyNode::Root {
        platform: CpuPlatform::current(),
    });
    for cores in core_map(cpus.len(), physical).into_values() {
        nodes.push(TopologyNode::Package { vendor });
        for threads in cores.into_values() {
            nodes.push(TopologyNode::Core {
                model: model.clone(),
            });
            for id in threads {
                nodes.push(TopologyNode::Thread { id });
            }
        }
    }
    nodes
}

/// package id → core id → logical CPU ids.
fn core_map(logical: usize, physical: usize) -> BTreeMap<u32, BTreeMap<u32, Vec<usize>>> {
    #[cfg(target_os = "linux")]
    if let Some(map) = sysfs_core_map(logical) {
        return map;
    }

    // No per-CPU topology available: synthesize a single package and spread
    // logical CPUs over the physical cores round-robin.
    let mut cores: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for cpu in 0..logical {
        cores.entry((cpu % physical) as u32).or_default().push(cpu);
    }
    BTreeMap::from([(0, cores)])
}

/// Read package/core ids for every logical CPU from sysfs. Returns None as
/// soon as any CPU is missing its topology entries, so partial data never
/// produces a lopsided tree.
#[cfg(target_os = "linux")]
fn sysfs_core_map(logical: usize) -> Option<BTreeMap<u32, BTreeMap<u32, Vec<usize>>>> {
    let mut map: BTreeMap<u32, BTreeMap<u32, Vec<usize>>> = BTreeMap::new();
    for cpu in 0..logical {
        let package = read_topology_id(cpu, "physical_package_id")?;
        let core = read_topology_id(cpu, "core_id")?;
        map.entry(package)
            .or_default()
            .entry(core)
            .or_default()
            .push(cpu);
    }
    Some(map)
}

#[cfg(target_os = "linux")]
fn read_topology_id(cpu: usize, leaf: &str) -> Option<u32> {
    let path = format!("/sys/devices/system/cpu/cpu{cpu}/topology/{leaf}");
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// (free, total) physical memory in bytes. Zero means the counter could
/// not be read, not an empty machine.
pub(crate) fn memory_counters() -> (u64, u64) {
    let mut sys = System::new();
    sys.refresh_memory();
    (sys.free_memory(), sys.total_memory())
}

/// Resident size of the calling process, summed over its mapped areas.
pub(crate) fn resident_bytes() -> u64 {
    #[cfg(target_os = "linux")]
    if let Some(bytes) = smaps_resident() {
        return bytes;
    }

    rusage_resident()
}

/// Walk `/proc/self/smaps` and sum the `Rss:` line of every mapped area.
#[cfg(target_os = "linux")]
fn smaps_resident() -> Option<u64> {
    use std::io::BufRead;

    let file = std::fs::File::open("/proc/self/smaps").ok()?;
    let mut total_kb: u64 = 0;
    for line in std::io::BufReader::new(file).lines() {
        let line = line.ok()?;
        if let Some(rest) = line.strip_prefix("Rss:") {
            total_kb += rest.split_whitespace().next()?.parse::<u64>().ok()?;
        }
    }
    Some(total_kb * 1024)
}

#[cfg(unix)]
fn rusage_resident() -> u64 {
    // SAFETY: getrusage only writes into the zeroed struct handed to it.
    unsafe {
        let mut usage: libc::rusage = std::mem::zeroed();
        if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
            return 0;
        }
        // ru_maxrss is kilobytes on Linux and the BSDs, bytes on macOS.
        let raw = usage.ru_maxrss.max(0) as u64;
        if cfg!(target_os = "macos") { raw } else { raw * 1024 }
    }
}

#[cfg(not(unix))]
fn rusage_resident() -> u64 {
    use sysinfo::ProcessesToUpdate;

    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).map(|p| p.memory()).unwrap_or(0)
}

/// Seconds since boot, with sub-second precision where the OS keeps it.
pub(crate) fn uptime_seconds() -> f64 {
    #[cfg(target_os = "linux")]
    {
        // First field of /proc/uptime is seconds since boot as a decimal.
        let parsed = std::fs::read_to_string("/proc/uptime")
            .ok()
            .and_then(|s| s.split_whitespace().next().and_then(|f| f.parse::<f64>().ok()));
        if let Some(secs) = parsed {
            return secs;
        }
    }

    System::uptime() as f64
}

/// Boot instant as seconds since the Unix epoch; 0 when unknown.
pub(crate) fn boot_epoch() -> u64 {
    System::boot_time()
}
