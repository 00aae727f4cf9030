use std::time::Instant;

use crate::engine::cache::ProcessCache;
use crate::engine::rates::{aggregate_busy_fraction, core_percents, process_shares, smt_stride};
use crate::engine::snapshot::{CoreState, ProcessSample, Snapshot};
use crate::metrics::{CoreTicks, MetricsSource};

/// How many sampling cycles between hardware/kernel fact re-queries.
/// Facts are cheap and rarely change, so they are not re-read every tick.
pub const FACTS_REFRESH_CYCLES: u32 = 30;

/// Orchestrates one sampling cycle: pull raw counters, merge the process
/// table into the cache, and derive a fresh [`Snapshot`] against the
/// previous one. Owns the previous snapshot explicitly (a typed two-slot
/// buffer, the oldest discarded each cycle).
pub struct Sampler {
    previous: Snapshot,
    count_smt_siblings: bool,
    cycles_since_facts: u32,
}

/// Transient-failure policy: one immediate re-query before the caller
/// degrades to previous values.
fn retry<T>(mut query: impl FnMut() -> Option<T>) -> Option<T> {
    match query() {
        Some(value) => Some(value),
        None => query(),
    }
}

impl Sampler {
    /// Prime the sampler against the source so the first real cycle
    /// computes deltas over the startup interval rather than since boot.
    pub fn new(source: &mut dyn MetricsSource, count_smt_siblings: bool) -> Self {
        let mut baseline = Snapshot::baseline(Instant::now());
        baseline.hardware = retry(|| source.hardware_facts()).unwrap_or_default();
        baseline.kernel = retry(|| source.kernel_facts()).unwrap_or_default();
        baseline.memory = retry(|| source.memory_usage()).unwrap_or_default();
        if let Some(ticks) = retry(|| source.core_ticks()) {
            baseline.cores = ticks.into_iter().map(CoreState::primed).collect();
        }
        if let Some(disk) = retry(|| source.disk_counters()) {
            baseline.disk_read = baseline.disk_read.advance(disk.read_bytes);
            baseline.disk_written = baseline.disk_written.advance(disk.written_bytes);
        }
        if let Some(net) = retry(|| source.network_counters()) {
            baseline.net_in = baseline.net_in.advance(net.bytes_in);
            baseline.net_out = baseline.net_out.advance(net.bytes_out);
        }
        Sampler {
            previous: baseline,
            count_smt_siblings,
            cycles_since_facts: 0,
        }
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    /// Run one cycle. Never fails: a source method that stays `None` after
    /// a retry leaves the corresponding fields at their previous values.
    pub fn sample(&mut self, source: &mut dyn MetricsSource, cache: &mut ProcessCache) -> Snapshot {
        let taken_at = Instant::now();
        let elapsed_secs = taken_at
            .duration_since(self.previous.taken_at)
            .as_secs_f64();

        let (hardware, kernel) = self.refresh_facts(source);

        let cores = match retry(|| source.core_ticks()) {
            Some(ticks) => advance_cores(&self.previous.cores, ticks),
            None => self.previous.cores.clone(),
        };
        let stride = if self.count_smt_siblings {
            1
        } else {
            smt_stride(hardware.logical_cpus, hardware.physical_cpus)
        };
        let busy_fraction = aggregate_busy_fraction(&cores, stride);

        let processes = match retry(|| source.process_table()) {
            Some(rows) => merge_process_table(cache, rows, busy_fraction),
            None => self.previous.processes.clone(),
        };

        let (disk_read, disk_written, disk_read_rate, disk_write_rate) =
            match retry(|| source.disk_counters()) {
                Some(disk) => {
                    let read = self.previous.disk_read.advance(disk.read_bytes);
                    let written = self.previous.disk_written.advance(disk.written_bytes);
                    (read, written, read.rate(elapsed_secs), written.rate(elapsed_secs))
                }
                None => (
                    self.previous.disk_read,
                    self.previous.disk_written,
                    self.previous.disk_read_rate,
                    self.previous.disk_write_rate,
                ),
            };

        let (net_in, net_out, net_in_rate, net_out_rate) =
            match retry(|| source.network_counters()) {
                Some(net) => {
                    let bytes_in = self.previous.net_in.advance(net.bytes_in);
                    let bytes_out = self.previous.net_out.advance(net.bytes_out);
                    (
                        bytes_in,
                        bytes_out,
                        bytes_in.rate(elapsed_secs),
                        bytes_out.rate(elapsed_secs),
                    )
                }
                None => (
                    self.previous.net_in,
                    self.previous.net_out,
                    self.previous.net_in_rate,
                    self.previous.net_out_rate,
                ),
            };

        let memory = retry(|| source.memory_usage()).unwrap_or(self.previous.memory);

        let snapshot = Snapshot {
            taken_at,
            elapsed_secs,
            cores,
            aggregate_cpu_percent: (busy_fraction * 100.0) as f32,
            memory,
            hardware,
            kernel,
            disk_read,
            disk_written,
            net_in,
            net_out,
            disk_read_rate,
            disk_write_rate,
            net_in_rate,
            net_out_rate,
            processes,
        };

        self.previous = snapshot.clone();
        snapshot
    }

    fn refresh_facts(
        &mut self,
        source: &mut dyn MetricsSource,
    ) -> (crate::metrics::HardwareFacts, crate::metrics::KernelFacts) {
        self.cycles_since_facts += 1;
        if self.cycles_since_facts < FACTS_REFRESH_CYCLES {
            return (
                self.previous.hardware.clone(),
                self.previous.kernel.clone(),
            );
        }
        self.cycles_since_facts = 0;
        let hardware =
            retry(|| source.hardware_facts()).unwrap_or_else(|| self.previous.hardware.clone());
        let kernel =
            retry(|| source.kernel_facts()).unwrap_or_else(|| self.previous.kernel.clone());
        (hardware, kernel)
    }
}

fn advance_cores(previous: &[CoreState], ticks: Vec<CoreTicks>) -> Vec<CoreState> {
    ticks
        .into_iter()
        .enumerate()
        .map(|(i, current)| {
            // A core with no prior reading (startup, hotplug) starts from a
            // zero delta, same rule as a first-seen process.
            let before = previous.get(i).map(|c| c.current).unwrap_or(current);
            CoreState {
                current,
                previous: before,
                percents: core_percents(current, before),
            }
        })
        .collect()
}

fn merge_process_table(
    cache: &mut ProcessCache,
    rows: Vec<crate::metrics::ProcessUsage>,
    busy_fraction: f64,
) -> Vec<ProcessSample> {
    cache.begin_cycle();

    let mut pids = Vec::with_capacity(rows.len());
    let mut deltas = Vec::with_capacity(rows.len());
    for usage in rows {
        let pid = usage.pid;
        let record = cache.upsert(usage);
        deltas.push(record.cpu_time_delta_ms());
        pids.push(pid);
    }

    let shares = process_shares(&deltas, busy_fraction);
    let mut samples = Vec::with_capacity(pids.len());
    for (pid, share) in pids.into_iter().zip(shares) {
        if let Some(record) = cache.get_mut(pid) {
            record.cpu_share = share;
            samples.push(ProcessSample::from_record(record));
        }
    }

    cache.sweep();
    samples
}
