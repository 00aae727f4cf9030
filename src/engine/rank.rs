use std::cmp::Ordering;

use crate::engine::snapshot::ProcessSample;

/// Metric the top-process table is ordered by, always descending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankMetric {
    CpuShare,
    ResidentMemory,
}

/// Order `samples` by `metric` descending and truncate to the display's
/// row budget. `limit >= samples.len()` returns everything, sorted.
pub fn rank(samples: &[ProcessSample], metric: RankMetric, limit: usize) -> Vec<ProcessSample> {
    let mut ranked = samples.to_vec();
    match metric {
        RankMetric::CpuShare => ranked.sort_unstable_by(|a, b| {
            b.cpu_share
                .partial_cmp(&a.cpu_share)
                .unwrap_or(Ordering::Equal)
        }),
        RankMetric::ResidentMemory => {
            ranked.sort_unstable_by(|a, b| b.resident_memory.cmp(&a.resident_memory));
        }
    }
    ranked.truncate(limit);
    ranked
}
