//! Physical memory counters and process resident size.

use std::fmt;

use crate::error::Result;
use crate::system::platform;

/// Point-in-time physical memory counters, in bytes. Not persisted; every
/// capture is a fresh OS read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub free: u64,
    pub total: u64,
}

impl MemorySnapshot {
    /// Read both counters from a single OS query.
    pub fn capture() -> Self {
        let (free, total) = platform::memory_counters();
        MemorySnapshot { free, total }
    }

    /// Bytes currently in use.
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    /// Memory usage as percentage.
    pub fn usage_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.used() as f64 / self.total as f64) * 100.0
        }
    }
}

impl fmt::Display for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} free / {} total",
            format_bytes(self.free),
            format_bytes(self.total)
        )
    }
}

/// Free physical memory in bytes.
///
/// No failure path: a failed OS query reports 0, and callers must treat 0
/// as "unknown", not "no memory".
pub fn free_memory() -> u64 {
    platform::memory_counters().0
}

/// Total installed physical memory in bytes.
///
/// Counts addressable memory including pages the OS has set aside, so the
/// figure represents installed capacity rather than what is currently
/// usable.
pub fn total_memory() -> u64 {
    platform::memory_counters().1
}

/// Accumulate the calling process's resident memory into `*rss`.
///
/// Sums the resident size of every memory area mapped into the process and
/// **adds** the total to the existing value — the accumulator is not reset
/// by this call. Callers must zero it first.
///
/// Enumeration failures are not surfaced; an unreadable area list simply
/// contributes nothing.
pub fn resident_memory(rss: &mut u64) -> Result<()> {
    *rss += platform::resident_bytes();
    Ok(())
}

/// Format bytes to human-readable string (KiB, MiB, GiB)
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    if bytes >= TIB {
        format!("{:.1}T", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1}G", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.0}M", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.0}K", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_never_exceeds_total() {
        let snapshot = MemorySnapshot::capture();
        if snapshot.free != 0 && snapshot.total != 0 {
            assert!(snapshot.free <= snapshot.total);
        }
        assert_eq!(snapshot.used() + snapshot.free, snapshot.total);
    }

    #[test]
    fn standalone_queries_agree_on_scale() {
        let total = total_memory();
        let free = free_memory();
        if total != 0 && free != 0 {
            assert!(free <= total);
        }
    }

    #[test]
    fn resident_accumulates_without_reset() {
        let mut rss = 0u64;
        resident_memory(&mut rss).unwrap();
        assert!(rss > 0);

        // A pre-seeded accumulator keeps its seed.
        let seed = rss;
        resident_memory(&mut rss).unwrap();
        assert!(rss > seed);
    }

    #[test]
    fn usage_percent_bounds() {
        let snapshot = MemorySnapshot {
            free: 25,
            total: 100,
        };
        assert_eq!(snapshot.usage_percent(), 75.0);
        assert_eq!(MemorySnapshot::default().usage_percent(), 0.0);
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2 * 1024), "2K");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3M");
        assert_eq!(format_bytes(1024 * 1024 * 1024 * 3 / 2), "1.5G");
    }
}
