use std::collections::VecDeque;

use pulsetop::engine::cache::ProcessCache;
use pulsetop::engine::sampler::Sampler;
use pulsetop::engine::snapshot::Snapshot;
use pulsetop::metrics::{
    CoreTicks, DiskCounters, HardwareFacts, KernelFacts, MemoryUsage, MetricsSource,
    NetworkCounters, ProcessUsage,
};

/// Scripted readings for one source method. `None` steps simulate a hard
/// failure; an exhausted script repeats the last successful reading.
struct Script<T: Clone> {
    queue: VecDeque<Option<T>>,
    last: Option<T>,
}

impl<T: Clone> Script<T> {
    fn new(steps: Vec<Option<T>>) -> Self {
        Script {
            queue: steps.into(),
            last: None,
        }
    }

    fn next(&mut self) -> Option<T> {
        match self.queue.pop_front() {
            Some(Some(value)) => {
                self.last = Some(value.clone());
                Some(value)
            }
            Some(None) => None,
            None => self.last.clone(),
        }
    }
}

struct FakeSource {
    hardware: HardwareFacts,
    kernel: KernelFacts,
    memory: MemoryUsage,
    ticks: Script<Vec<CoreTicks>>,
    tables: Script<Vec<ProcessUsage>>,
    disks: Script<DiskCounters>,
    nets: Script<NetworkCounters>,
}

impl FakeSource {
    fn new(
        ticks: Vec<Option<Vec<CoreTicks>>>,
        tables: Vec<Option<Vec<ProcessUsage>>>,
        disks: Vec<Option<DiskCounters>>,
        nets: Vec<Option<NetworkCounters>>,
    ) -> Self {
        FakeSource {
            hardware: HardwareFacts {
                logical_cpus: 1,
                physical_cpus: 1,
                total_memory_bytes: 8 << 30,
                cpu_model: "fake".to_string(),
            },
            kernel: KernelFacts::default(),
            memory: MemoryUsage {
                total: 8 << 30,
                used: 4 << 30,
                ..MemoryUsage::default()
            },
            ticks: Script::new(ticks),
            tables: Script::new(tables),
            disks: Script::new(disks),
            nets: Script::new(nets),
        }
    }
}

impl MetricsSource for FakeSource {
    fn hardware_facts(&mut self) -> Option<HardwareFacts> {
        Some(self.hardware.clone())
    }
    fn kernel_facts(&mut self) -> Option<KernelFacts> {
        Some(self.kernel.clone())
    }
    fn core_ticks(&mut self) -> Option<Vec<CoreTicks>> {
        self.ticks.next()
    }
    fn process_table(&mut self) -> Option<Vec<ProcessUsage>> {
        self.tables.next()
    }
    fn disk_counters(&mut self) -> Option<DiskCounters> {
        self.disks.next()
    }
    fn network_counters(&mut self) -> Option<NetworkCounters> {
        self.nets.next()
    }
    fn memory_usage(&mut self) -> Option<MemoryUsage> {
        Some(self.memory)
    }
}

fn ticks(user: u64, system: u64, idle: u64, nice: u64) -> CoreTicks {
    CoreTicks {
        user,
        system,
        idle,
        nice,
    }
}

fn process(pid: u32, cpu_time_ms: u64) -> ProcessUsage {
    ProcessUsage {
        pid,
        name: format!("proc{pid}"),
        total_cpu_time_ms: cpu_time_ms,
        resident_memory: 1024 * u64::from(pid),
        ..ProcessUsage::default()
    }
}

fn share_of(snapshot: &Snapshot, pid: u32) -> f32 {
    snapshot
        .processes
        .iter()
        .find(|p| p.pid == pid)
        .map(|p| p.cpu_share)
        .unwrap_or_else(|| panic!("pid {pid} missing from snapshot"))
}

#[test]
fn shares_apportion_measured_aggregate_busy_time() {
    // One core measuring 40% busy over the second interval; process deltas
    // of 300 and 100 must split that 40% into 30% and 10%.
    let mut source = FakeSource::new(
        vec![
            Some(vec![ticks(0, 0, 0, 0)]),
            Some(vec![ticks(0, 0, 100, 0)]),
            Some(vec![ticks(40, 0, 160, 0)]),
        ],
        vec![
            Some(vec![process(1, 1_000), process(2, 500)]),
            Some(vec![process(1, 1_300), process(2, 600)]),
        ],
        vec![Some(DiskCounters::default())],
        vec![Some(NetworkCounters::default())],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    // First sighting: the whole pre-monitor CPU time of both processes
    // must not be credited to one interval.
    let first = sampler.sample(&mut source, &mut cache);
    assert_eq!(share_of(&first, 1), 0.0);
    assert_eq!(share_of(&first, 2), 0.0);

    let second = sampler.sample(&mut source, &mut cache);
    assert!((second.aggregate_cpu_percent - 40.0).abs() < 0.01);
    assert!((share_of(&second, 1) - 30.0).abs() < 0.05);
    assert!((share_of(&second, 2) - 10.0).abs() < 0.05);

    // Conservation: shares never exceed the measured aggregate.
    let total: f32 = second.processes.iter().map(|p| p.cpu_share).sum();
    assert!(total <= second.aggregate_cpu_percent + 0.01);
}

#[test]
fn disk_counter_regression_reports_zero_rate() {
    let mut source = FakeSource::new(
        vec![Some(vec![ticks(0, 0, 0, 0)])],
        vec![Some(vec![process(1, 100)])],
        vec![
            Some(DiskCounters {
                read_bytes: 10_000,
                written_bytes: 10_000,
            }),
            Some(DiskCounters {
                read_bytes: 4_000,
                written_bytes: 12_000,
            }),
        ],
        vec![Some(NetworkCounters::default())],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    let snapshot = sampler.sample(&mut source, &mut cache);
    // Reads regressed: collapsed pair, zero delta, zero rate.
    assert_eq!(snapshot.disk_read.delta(), 0);
    assert_eq!(snapshot.disk_read_rate, 0.0);
    // Writes advanced normally.
    assert_eq!(snapshot.disk_written.delta(), 2_000);
    assert!(snapshot.disk_write_rate >= 0.0);
}

#[test]
fn transient_table_failure_is_retried_within_the_cycle() {
    let mut source = FakeSource::new(
        vec![Some(vec![ticks(0, 0, 0, 0)])],
        // First fetch fails, the in-cycle retry succeeds.
        vec![None, Some(vec![process(1, 100), process(2, 200)])],
        vec![Some(DiskCounters::default())],
        vec![Some(NetworkCounters::default())],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    let snapshot = sampler.sample(&mut source, &mut cache);
    assert_eq!(snapshot.processes.len(), 2);
}

#[test]
fn persistent_failures_degrade_to_previous_values() {
    let mut source = FakeSource::new(
        vec![
            Some(vec![ticks(0, 0, 0, 0)]),
            Some(vec![ticks(50, 0, 50, 0)]),
            // Both the fetch and its retry fail on the second cycle.
            None,
            None,
        ],
        vec![
            Some(vec![process(1, 100)]),
            None,
            None,
        ],
        vec![Some(DiskCounters::default())],
        vec![Some(NetworkCounters::default())],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    let first = sampler.sample(&mut source, &mut cache);
    assert!((first.aggregate_cpu_percent - 50.0).abs() < 0.01);
    assert_eq!(first.processes.len(), 1);

    let second = sampler.sample(&mut source, &mut cache);
    // Core percentages and the process list carry over unchanged.
    assert!((second.aggregate_cpu_percent - 50.0).abs() < 0.01);
    assert_eq!(second.processes.len(), 1);
    assert_eq!(second.processes[0].pid, 1);
}

#[test]
fn colliding_pids_survive_a_cycle_independently() {
    // 42 and 1042 hash to the same cache bucket (TABLE_SIZE apart).
    let mut source = FakeSource::new(
        vec![Some(vec![ticks(0, 0, 0, 0)])],
        vec![
            Some(vec![process(42, 10), process(1042, 20)]),
            Some(vec![process(42, 15), process(1042, 30)]),
        ],
        vec![Some(DiskCounters::default())],
        vec![Some(NetworkCounters::default())],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    sampler.sample(&mut source, &mut cache);
    sampler.sample(&mut source, &mut cache);

    assert_eq!(cache.get(42).unwrap().cpu_time_delta_ms(), 5);
    assert_eq!(cache.get(1042).unwrap().cpu_time_delta_ms(), 10);
}

#[test]
fn exited_pids_are_swept_from_the_cache() {
    let mut source = FakeSource::new(
        vec![Some(vec![ticks(0, 0, 0, 0)])],
        vec![
            Some(vec![process(1, 10), process(2, 10)]),
            Some(vec![process(1, 20)]),
        ],
        vec![Some(DiskCounters::default())],
        vec![Some(NetworkCounters::default())],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    sampler.sample(&mut source, &mut cache);
    assert_eq!(cache.len(), 2);

    let snapshot = sampler.sample(&mut source, &mut cache);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(2).is_none());
    assert_eq!(snapshot.processes.len(), 1);
}

#[test]
fn every_rate_in_a_snapshot_is_finite_and_non_negative() {
    let mut source = FakeSource::new(
        vec![
            Some(vec![ticks(0, 0, 0, 0), ticks(0, 0, 0, 0)]),
            Some(vec![ticks(10, 5, 85, 0), ticks(0, 0, 100, 0)]),
        ],
        vec![Some(vec![process(1, 100)]), Some(vec![process(1, 150)])],
        vec![
            Some(DiskCounters::default()),
            Some(DiskCounters {
                read_bytes: 1_000,
                written_bytes: 2_000,
            }),
        ],
        vec![
            Some(NetworkCounters::default()),
            Some(NetworkCounters {
                bytes_in: 500,
                bytes_out: 700,
            }),
        ],
    );
    let mut cache = ProcessCache::new();
    let mut sampler = Sampler::new(&mut source, true);

    for _ in 0..2 {
        let snapshot = sampler.sample(&mut source, &mut cache);
        for rate in [
            snapshot.disk_read_rate,
            snapshot.disk_write_rate,
            snapshot.net_in_rate,
            snapshot.net_out_rate,
        ] {
            assert!(rate.is_finite());
            assert!(rate >= 0.0);
        }
        for core in &snapshot.cores {
            for pct in [
                core.percents.user,
                core.percents.system,
                core.percents.nice,
                core.percents.idle,
            ] {
                assert!(pct.is_finite());
                assert!(pct >= 0.0);
            }
        }
        for process in &snapshot.processes {
            assert!(process.cpu_share.is_finite());
            assert!(process.cpu_share >= 0.0);
        }
    }
}
