use crate::metrics::{CoreTicks, DiskCounters};

/// Raw counters sysinfo does not expose, read straight from the kernel.
pub trait PlatformCounters {
    fn core_ticks() -> Option<Vec<CoreTicks>>;
    fn disk_counters() -> Option<DiskCounters>;
    fn process_priority(pid: u32) -> Option<i32>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod fallback;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use fallback as platform_impl;

pub fn core_ticks() -> Option<Vec<CoreTicks>> {
    platform_impl::Platform::core_ticks()
}

pub fn disk_counters() -> Option<DiskCounters> {
    platform_impl::Platform::disk_counters()
}

pub fn process_priority(pid: u32) -> Option<i32> {
    platform_impl::Platform::process_priority(pid)
}
