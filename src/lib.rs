//! hostprobe — stateless host introspection for runtime schedulers.
//!
//! Queries:
//!   - Per-CPU descriptors (vendor + model string, clock speed, tick counters)
//!   - Physical memory counters & process resident size
//!   - System uptime, boot time, load average
//!   - Executable directory discovery
//!
//! Every query is a one-shot synchronous read of current OS state: no
//! caching, no background threads, no shared mutable state between calls.
//! Errors are returned to the immediate caller as-is; nothing is retried
//! or logged internally.

mod error;
pub mod system;

pub use error::{Error, Result};
pub use system::cpu::{cpu_info, logical_cpu_count, physical_cpu_count, CpuInfo, CpuTimes};
pub use system::exepath::{exe_dir, exe_dir_into};
pub use system::host::{boot_time, load_average, uptime};
pub use system::memory::{
    format_bytes, free_memory, resident_memory, total_memory, MemorySnapshot,
};
pub use system::topology::{CpuPlatform, CpuVendor, TopologyNode, TopologySummary};
