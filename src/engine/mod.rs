//! The telemetry sampling and ranking engine: the process cache, the
//! per-cycle sampler, counter-pair rate math, and the top-process ranker.

pub mod cache;
pub mod rank;
pub mod rates;
pub mod sampler;
pub mod snapshot;
