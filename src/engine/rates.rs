//! Counter-pair math: turning monotonic kernel counters into percentages
//! and rates, with explicit edge-case policy. No division result may ever
//! surface as NaN or a negative value.

use crate::engine::snapshot::{CorePercents, CoreState};
use crate::metrics::CoreTicks;

/// Current/previous observation of a monotonic byte counter.
///
/// A regression (reset or wraparound) collapses the pair to
/// `{current, current}` so the interval reports a zero delta instead of a
/// negative one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterPair {
    pub current: u64,
    pub previous: u64,
}

impl CounterPair {
    /// Seed a pair so the first interval starts from a zero delta.
    pub fn primed(value: u64) -> Self {
        CounterPair {
            current: value,
            previous: value,
        }
    }

    /// Shift `current` into `previous` and take a fresh reading.
    pub fn advance(self, current: u64) -> Self {
        if current < self.current {
            CounterPair::primed(current)
        } else {
            CounterPair {
                current,
                previous: self.current,
            }
        }
    }

    pub fn delta(&self) -> u64 {
        self.current.saturating_sub(self.previous)
    }

    /// Bytes per second over the interval; 0 when no time has elapsed.
    pub fn rate(&self, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.delta() as f64 / elapsed_secs
    }
}

/// Per-core percentages from a tick-counter pair. A zero total delta
/// short-circuits every field to 0; otherwise idle is derived as the
/// remainder so the four fields sum to 100.
pub fn core_percents(current: CoreTicks, previous: CoreTicks) -> CorePercents {
    let total = current.total().saturating_sub(previous.total());
    if total == 0 {
        return CorePercents::default();
    }
    let pct = |now: u64, before: u64| now.saturating_sub(before) as f32 / total as f32 * 100.0;
    let user = pct(current.user, previous.user);
    let system = pct(current.system, previous.system);
    let nice = pct(current.nice, previous.nice);
    CorePercents {
        user,
        system,
        nice,
        idle: (100.0 - user - system - nice).max(0.0),
    }
}

/// Stride for the hyperthread policy: 1 counts every logical core,
/// `logical / physical` visits one sibling per physical core.
pub fn smt_stride(logical: usize, physical: usize) -> usize {
    if physical == 0 {
        return 1;
    }
    (logical / physical).max(1)
}

/// Fraction of the counted cores currently busy, in `0.0..=1.0`.
pub fn aggregate_busy_fraction(cores: &[CoreState], stride: usize) -> f64 {
    let counted: Vec<&CoreState> = cores.iter().step_by(stride.max(1)).collect();
    if counted.is_empty() {
        return 0.0;
    }
    let busy_sum: f64 = counted
        .iter()
        .map(|core| f64::from(core.percents.user + core.percents.system + core.percents.nice))
        .sum();
    busy_sum / counted.len() as f64 / 100.0
}

/// Apportion the measured aggregate busy time across processes in
/// proportion to their CPU-time deltas. The shares therefore sum to at
/// most the aggregate CPU percentage; a process's share is not an
/// independent measurement.
pub fn process_shares(deltas: &[u64], busy_fraction: f64) -> Vec<f32> {
    let total: u64 = deltas.iter().sum();
    if total == 0 {
        return vec![0.0; deltas.len()];
    }
    deltas
        .iter()
        .map(|&delta| (delta as f64 / total as f64 * busy_fraction * 100.0) as f32)
        .collect()
}
