use crate::metrics::ProcessUsage;

/// Bucket count for the pid-indexed table. Pids that differ by a multiple
/// of this land in the same bucket and chain.
pub const TABLE_SIZE: usize = 1000;

/// Per-process state carried across sampling cycles.
#[derive(Clone, Debug)]
pub struct ProcessRecord {
    pub usage: ProcessUsage,
    /// `total_cpu_time_ms` as of the previous cycle. Equal to the current
    /// value when the process was first seen this cycle, so a new process
    /// never gets its whole pre-monitor lifetime credited to one interval.
    pub last_total_time_ms: u64,
    /// Apportioned CPU share, written back by the sampler.
    pub cpu_share: f32,
    seen: u64,
}

impl ProcessRecord {
    pub fn cpu_time_delta_ms(&self) -> u64 {
        self.usage
            .total_cpu_time_ms
            .saturating_sub(self.last_total_time_ms)
    }
}

/// Pid-keyed table of [`ProcessRecord`]s surviving across cycles.
pub struct ProcessCache {
    buckets: Vec<Vec<ProcessRecord>>,
    len: usize,
    generation: u64,
}

impl Default for ProcessCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCache {
    pub fn new() -> Self {
        ProcessCache {
            buckets: (0..TABLE_SIZE).map(|_| Vec::new()).collect(),
            len: 0,
            generation: 0,
        }
    }

    fn bucket_index(pid: u32) -> usize {
        pid as usize % TABLE_SIZE
    }

    /// Start a sampling cycle; records upserted afterwards are marked live
    /// for the following [`sweep`](Self::sweep).
    pub fn begin_cycle(&mut self) {
        self.generation += 1;
    }

    /// Insert or update the record for `usage.pid`, capturing the prior
    /// `total_cpu_time_ms` into `last_total_time_ms` before overwriting.
    pub fn upsert(&mut self, usage: ProcessUsage) -> &mut ProcessRecord {
        let generation = self.generation;
        let index = Self::bucket_index(usage.pid);
        let bucket = &mut self.buckets[index];

        let position = match bucket.iter().position(|r| r.usage.pid == usage.pid) {
            Some(position) => {
                let record = &mut bucket[position];
                record.last_total_time_ms = record.usage.total_cpu_time_ms;
                record.usage = usage;
                record.seen = generation;
                position
            }
            None => {
                bucket.push(ProcessRecord {
                    last_total_time_ms: usage.total_cpu_time_ms,
                    usage,
                    cpu_share: 0.0,
                    seen: generation,
                });
                self.len += 1;
                bucket.len() - 1
            }
        };

        &mut self.buckets[index][position]
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.buckets[Self::bucket_index(pid)]
            .iter()
            .find(|r| r.usage.pid == pid)
    }

    pub fn get_mut(&mut self, pid: u32) -> Option<&mut ProcessRecord> {
        self.buckets[Self::bucket_index(pid)]
            .iter_mut()
            .find(|r| r.usage.pid == pid)
    }

    /// Drop records not upserted since the last [`begin_cycle`]
    /// (mark-and-sweep of exited pids, so a long run does not accumulate
    /// every pid ever seen).
    pub fn sweep(&mut self) {
        let generation = self.generation;
        for bucket in &mut self.buckets {
            bucket.retain(|r| r.seen == generation);
        }
        self.len = self.buckets.iter().map(Vec::len).sum();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
