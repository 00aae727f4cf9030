use super::PlatformCounters;
use crate::metrics::{CoreTicks, DiskCounters};

pub struct Platform;

impl PlatformCounters for Platform {
    fn core_ticks() -> Option<Vec<CoreTicks>> {
        None
    }

    fn disk_counters() -> Option<DiskCounters> {
        None
    }

    fn process_priority(_pid: u32) -> Option<i32> {
        None
    }
}
