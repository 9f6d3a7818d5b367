//! Hierarchical CPU topology reconciliation.
//!
//! The OS describes CPU hardware as a tree (root → package → core → thread)
//! flattened into a sequence of typed nodes. Callers want flat per-CPU
//! records, so [`TopologySummary::from_nodes`] folds the sequence in one
//! linear pass — last write wins per level — and the aggregate is broadcast
//! to every descriptor.

/// Hardware platform reported at the root of the topology tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuPlatform {
    /// Platform could not be determined.
    #[default]
    Unknown,
    /// 32-bit x86.
    X86,
    /// 64-bit x86 (AMD64 / Intel 64).
    X86_64,
    /// 32-bit ARM.
    Arm,
    /// 64-bit ARM (AArch64).
    Arm64,
    /// 64-bit RISC-V.
    RiscV64,
}

impl CpuPlatform {
    /// Platform of the running build.
    pub fn current() -> Self {
        if cfg!(target_arch = "x86_64") {
            CpuPlatform::X86_64
        } else if cfg!(target_arch = "x86") {
            CpuPlatform::X86
        } else if cfg!(target_arch = "aarch64") {
            CpuPlatform::Arm64
        } else if cfg!(target_arch = "arm") {
            CpuPlatform::Arm
        } else if cfg!(target_arch = "riscv64") {
            CpuPlatform::RiscV64
        } else {
            CpuPlatform::Unknown
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            CpuPlatform::Unknown => "unknown",
            CpuPlatform::X86 => "x86",
            CpuPlatform::X86_64 => "x86_64",
            CpuPlatform::Arm => "arm",
            CpuPlatform::Arm64 => "arm64",
            CpuPlatform::RiscV64 => "riscv64",
        }
    }
}

/// CPU manufacturer, parsed from the OS vendor identification string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuVendor {
    /// Vendor could not be determined.
    #[default]
    Unknown,
    Intel,
    Amd,
    Arm,
    Apple,
    Ibm,
    Via,
    Hygon,
}

impl CpuVendor {
    /// Map a vendor identification string to a vendor.
    ///
    /// The exact x86 CPUID strings are matched first; anything else falls
    /// back to a case-insensitive substring scan, which covers the looser
    /// identifiers ARM SoCs and virtual machines report.
    pub fn from_vendor_id(id: &str) -> Self {
        match id.trim() {
            "GenuineIntel" => return CpuVendor::Intel,
            "AuthenticAMD" => return CpuVendor::Amd,
            "HygonGenuine" => return CpuVendor::Hygon,
            "CentaurHauls" => return CpuVendor::Via,
            _ => {}
        }

        let lower = id.to_ascii_lowercase();
        if lower.contains("intel") {
            CpuVendor::Intel
        } else if lower.contains("amd") {
            CpuVendor::Amd
        } else if lower.contains("apple") {
            CpuVendor::Apple
        } else if lower.contains("arm") {
            CpuVendor::Arm
        } else if lower.contains("ibm") {
            CpuVendor::Ibm
        } else if lower.contains("via") {
            CpuVendor::Via
        } else {
            CpuVendor::Unknown
        }
    }

    /// Display name used in the per-CPU model string.
    pub fn name(self) -> &'static str {
        match self {
            CpuVendor::Unknown => "Unknown",
            CpuVendor::Intel => "Intel",
            CpuVendor::Amd => "AMD",
            CpuVendor::Arm => "ARM",
            CpuVendor::Apple => "Apple",
            CpuVendor::Ibm => "IBM",
            CpuVendor::Via => "VIA",
            CpuVendor::Hygon => "Hygon",
        }
    }
}

/// One entry of the flattened topology tree.
///
/// Ephemeral: a node sequence is built for one query and discarded before
/// the query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyNode {
    /// Tree root; identifies the hardware platform.
    Root { platform: CpuPlatform },
    /// Physical package (socket); identifies the manufacturer.
    Package { vendor: CpuVendor },
    /// Physical core; carries the model/brand string.
    Core { model: String },
    /// Logical CPU (hardware thread).
    Thread { id: usize },
}

/// Aggregate of one pass over a topology node sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologySummary {
    pub platform: CpuPlatform,
    pub vendor: CpuVendor,
    pub model: Option<String>,
}

impl TopologySummary {
    /// Fold a node sequence into the three identifying scalars.
    ///
    /// Single linear pass, no backtracking; when a level appears more than
    /// once the last node wins. Thread nodes carry no identity and are
    /// skipped. An empty sequence leaves every field at its Unknown
    /// sentinel.
    pub fn from_nodes(nodes: &[TopologyNode]) -> Self {
        let mut summary = TopologySummary::default();
        for node in nodes {
            match node {
                TopologyNode::Root { platform } => summary.platform = *platform,
                TopologyNode::Package { vendor } => summary.vendor = *vendor,
                TopologyNode::Core { model } => summary.model = Some(model.clone()),
                TopologyNode::Thread { .. } => {}
            }
        }
        summary
    }

    /// Human-readable `"<vendor> <model>"` string shared by every
    /// descriptor.
    ///
    /// Brand strings from the OS usually embed the manufacturer already;
    /// the vendor prefix is only prepended when the model doesn't start
    /// with it. With no topology data at all this yields `"Unknown CPU"`.
    pub fn display_string(&self) -> String {
        let vendor = self.vendor.name();
        match self.model.as_deref() {
            Some(model) if starts_with_ignore_case(model, vendor) => model.to_string(),
            Some(model) => format!("{vendor} {model}"),
            None => format!("{vendor} CPU"),
        }
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
