use crate::error::{Error, Result};
use crate::system::platform;
use crate::system::topology::TopologySummary;

/// Per-CPU time accounting in clock ticks.
///
/// This layer cannot observe per-state tick counters, so every field is
/// always zero. The fields stay populated rather than optional so the
/// record shape matches platforms that do report them — callers must not
/// read zero as "idle".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub sys: u64,
    pub idle: u64,
    pub irq: u64,
}

/// One logical CPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuInfo {
    /// Vendor + model display string. Each descriptor owns its own copy so
    /// dropping one never invalidates another.
    pub model: String,
    /// Rounded clock speed in MHz; 0 when the OS does not report one.
    pub speed_mhz: u64,
    /// Tick counters, always zero here.
    pub times: CpuTimes,
}

/// Enumerate logical CPUs.
///
/// Returns one descriptor per logical CPU known to the system at call
/// time. The hierarchical topology description is folded into a single
/// vendor/model aggregate and broadcast to every descriptor. Topology
/// lookups degrade rather than fail: with no topology data the model
/// string falls back to its Unknown sentinel and the call still succeeds
/// with a count-accurate array.
///
/// The returned vector owns every descriptor and every model string;
/// dropping it releases everything exactly once.
///
/// # Errors
///
/// `Error::OutOfMemory` when the descriptor array cannot be reserved —
/// the only failure this query reports.
pub fn cpu_info() -> Result<Vec<CpuInfo>> {
    let platform::CpuQuery {
        logical,
        speed_mhz,
        nodes,
    } = platform::query_cpus();

    let summary = TopologySummary::from_nodes(&nodes);
    drop(nodes); // ephemeral; not retained past the fold

    build_descriptors(logical, speed_mhz, &summary)
}

fn build_descriptors(
    logical: usize,
    speed_mhz: u64,
    summary: &TopologySummary,
) -> Result<Vec<CpuInfo>> {
    let mut infos = Vec::new();
    infos
        .try_reserve_exact(logical)
        .map_err(|_| Error::OutOfMemory)?;

    let model = summary.display_string();
    for _ in 0..logical {
        infos.push(CpuInfo {
            model: model.clone(),
            speed_mhz,
            times: CpuTimes::default(),
        });
    }
    Ok(infos)
}

/// Number of schedulable logical CPUs.
pub fn logical_cpu_count() -> usize {
    platform::logical_cpu_count()
}

/// Number of physical cores, excluding hardware threads.
pub fn physical_cpu_count() -> usize {
    platform::physical_cpu_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::topology::{CpuPlatform, CpuVendor, TopologyNode};

    #[test]
    fn four_cpus_share_identity_but_not_storage() {
        let nodes = vec![
            TopologyNode::Root {
                platform: CpuPlatform::X86_64,
            },
            TopologyNode::Package {
                vendor: CpuVendor::Intel,
            },
            TopologyNode::Core {
                model: "Xeon E3-1230".to_string(),
            },
        ];
        let summary = TopologySummary::from_nodes(&nodes);

        let infos = build_descriptors(4, 3200, &summary).unwrap();
        assert_eq!(infos.len(), 4);
        for info in &infos {
            assert_eq!(info.model, "Intel Xeon E3-1230");
            assert_eq!(info.speed_mhz, 3200);
            assert_eq!(info.times, CpuTimes::default());
        }
        // Equal content, independent allocations.
        assert_ne!(infos[0].model.as_ptr(), infos[1].model.as_ptr());
    }

    #[test]
    fn zero_topology_nodes_still_yields_descriptors() {
        let summary = TopologySummary::from_nodes(&[]);
        let infos = build_descriptors(2, 0, &summary).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].model, "Unknown CPU");
        assert_eq!(infos[0].speed_mhz, 0);
    }

    #[test]
    fn live_query_matches_logical_count() {
        let infos = cpu_info().unwrap();
        assert_eq!(infos.len(), logical_cpu_count());
        assert!(!infos.is_empty());
        for info in &infos {
            assert_eq!(info.times, CpuTimes::default());
            assert!(!info.model.is_empty());
        }
    }

    #[test]
    fn counts_are_consistent() {
        let logical = logical_cpu_count();
        let physical = physical_cpu_count();
        assert!(logical >= 1);
        assert!(physical >= 1);
        assert!(physical <= logical);
    }
}
