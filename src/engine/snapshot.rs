use std::time::Instant;

use crate::engine::cache::ProcessRecord;
use crate::engine::rates::CounterPair;
use crate::metrics::{CoreTicks, HardwareFacts, KernelFacts, MemoryUsage};

/// Derived percentages for one logical core over the last interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CorePercents {
    pub user: f32,
    pub system: f32,
    pub nice: f32,
    pub idle: f32,
}

impl CorePercents {
    pub fn busy(&self) -> f32 {
        self.user + self.system + self.nice
    }
}

/// Current and previous raw ticks plus derived percentages for one core.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoreState {
    pub current: CoreTicks,
    pub previous: CoreTicks,
    pub percents: CorePercents,
}

impl CoreState {
    /// Seed so the first interval starts from a zero delta.
    pub fn primed(ticks: CoreTicks) -> Self {
        CoreState {
            current: ticks,
            previous: ticks,
            percents: CorePercents::default(),
        }
    }
}

/// One process row of a snapshot, already carrying its apportioned share.
#[derive(Clone, Debug)]
pub struct ProcessSample {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub command: String,
    pub owner: Option<String>,
    pub status: String,
    pub priority: Option<i32>,
    pub resident_memory: u64,
    pub virtual_memory: u64,
    pub cpu_share: f32,
    pub disk_read_bytes: u64,
    pub disk_written_bytes: u64,
}

impl ProcessSample {
    pub fn from_record(record: &ProcessRecord) -> Self {
        let usage = &record.usage;
        ProcessSample {
            pid: usage.pid,
            ppid: usage.ppid,
            name: usage.name.clone(),
            command: usage.command.clone(),
            owner: usage.owner.clone(),
            status: usage.status.clone(),
            priority: usage.priority,
            resident_memory: usage.resident_memory,
            virtual_memory: usage.virtual_memory,
            cpu_share: record.cpu_share,
            disk_read_bytes: usage.disk_read_bytes,
            disk_written_bytes: usage.disk_written_bytes,
        }
    }
}

/// One fully computed sampling cycle. Immutable once published; the next
/// snapshot is built from this one's counters plus fresh raw reads.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub taken_at: Instant,
    pub elapsed_secs: f64,
    pub cores: Vec<CoreState>,
    pub aggregate_cpu_percent: f32,
    pub memory: MemoryUsage,
    pub hardware: HardwareFacts,
    pub kernel: KernelFacts,
    pub disk_read: CounterPair,
    pub disk_written: CounterPair,
    pub net_in: CounterPair,
    pub net_out: CounterPair,
    pub disk_read_rate: f64,
    pub disk_write_rate: f64,
    pub net_in_rate: f64,
    pub net_out_rate: f64,
    pub processes: Vec<ProcessSample>,
}

impl Snapshot {
    /// Empty baseline with every rate at zero, used to seed the sampler.
    pub fn baseline(taken_at: Instant) -> Self {
        Snapshot {
            taken_at,
            elapsed_secs: 0.0,
            cores: Vec::new(),
            aggregate_cpu_percent: 0.0,
            memory: MemoryUsage::default(),
            hardware: HardwareFacts::default(),
            kernel: KernelFacts::default(),
            disk_read: CounterPair::default(),
            disk_written: CounterPair::default(),
            net_in: CounterPair::default(),
            net_out: CounterPair::default(),
            disk_read_rate: 0.0,
            disk_write_rate: 0.0,
            net_in_rate: 0.0,
            net_out_rate: 0.0,
            processes: Vec::new(),
        }
    }
}
