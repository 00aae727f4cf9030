pub mod platform;
pub mod system_source;

pub use system_source::SystemSource;

/// Raw CPU tick counters for one logical core, monotonically increasing
/// since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreTicks {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub nice: u64,
}

impl CoreTicks {
    pub fn total(&self) -> u64 {
        self.user + self.system + self.idle + self.nice
    }
}

/// One row of the process table as reported by the OS. `total_cpu_time_ms`
/// is monotonic for the lifetime of the process.
#[derive(Clone, Debug, Default)]
pub struct ProcessUsage {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub command: String,
    pub owner: Option<String>,
    pub group_id: Option<String>,
    pub status: String,
    pub priority: Option<i32>,
    pub total_cpu_time_ms: u64,
    pub resident_memory: u64,
    pub virtual_memory: u64,
    pub disk_read_bytes: u64,
    pub disk_written_bytes: u64,
}

/// Cheap, rarely-changing hardware description.
#[derive(Clone, Debug, Default)]
pub struct HardwareFacts {
    pub logical_cpus: usize,
    pub physical_cpus: usize,
    pub total_memory_bytes: u64,
    pub cpu_model: String,
}

#[derive(Clone, Debug, Default)]
pub struct KernelFacts {
    pub os_version: String,
    pub hostname: String,
    pub boot_time_secs: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DiskCounters {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NetworkCounters {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

/// Pull-style accessor over the OS counters. Stateless from the caller's
/// point of view: every call re-reads the kernel's current values, and all
/// diffing happens in the sampling engine.
///
/// A `None` return is the hard-failure sentinel; the Sampler retries once
/// and then degrades the affected snapshot fields to their previous values.
pub trait MetricsSource {
    fn hardware_facts(&mut self) -> Option<HardwareFacts>;
    fn kernel_facts(&mut self) -> Option<KernelFacts>;
    fn core_ticks(&mut self) -> Option<Vec<CoreTicks>>;
    fn process_table(&mut self) -> Option<Vec<ProcessUsage>>;
    fn disk_counters(&mut self) -> Option<DiskCounters>;
    fn network_counters(&mut self) -> Option<NetworkCounters>;
    fn memory_usage(&mut self) -> Option<MemoryUsage>;
}
