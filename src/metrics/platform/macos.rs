use super::PlatformCounters;
use crate::metrics::{CoreTicks, DiskCounters};

pub struct Platform;

const PROCESSOR_CPU_LOAD_INFO: i32 = 2;
const CPU_STATE_USER: usize = 0;
const CPU_STATE_SYSTEM: usize = 1;
const CPU_STATE_IDLE: usize = 2;
const CPU_STATE_NICE: usize = 3;
const CPU_STATE_MAX: usize = 4;
const KERN_SUCCESS: i32 = 0;

unsafe extern "C" {
    fn host_processor_info(
        host: u32,
        flavor: i32,
        out_processor_count: *mut u32,
        out_processor_info: *mut *mut i32,
        out_processor_info_count: *mut u32,
    ) -> i32;
    fn mach_host_self() -> u32;
    fn mach_task_self() -> u32;
    fn vm_deallocate(target: u32, address: usize, size: usize) -> i32;
}

impl PlatformCounters for Platform {
    fn core_ticks() -> Option<Vec<CoreTicks>> {
        // Mach hands back a kernel-allocated array sized by the call itself;
        // the caller copies it out and deallocates.
        let mut processor_count: u32 = 0;
        let mut info: *mut i32 = std::ptr::null_mut();
        let mut info_count: u32 = 0;

        let result = unsafe {
            host_processor_info(
                mach_host_self(),
                PROCESSOR_CPU_LOAD_INFO,
                &mut processor_count,
                &mut info,
                &mut info_count,
            )
        };
        if result != KERN_SUCCESS || info.is_null() || processor_count == 0 {
            return None;
        }

        let mut cores = Vec::with_capacity(processor_count as usize);
        for i in 0..processor_count as usize {
            let base = i * CPU_STATE_MAX;
            let tick = |state: usize| unsafe { *info.add(base + state) as u32 as u64 };
            cores.push(CoreTicks {
                user: tick(CPU_STATE_USER),
                system: tick(CPU_STATE_SYSTEM),
                idle: tick(CPU_STATE_IDLE),
                nice: tick(CPU_STATE_NICE),
            });
        }

        unsafe {
            vm_deallocate(
                mach_task_self(),
                info as usize,
                info_count as usize * std::mem::size_of::<i32>(),
            );
        }

        Some(cores)
    }

    fn disk_counters() -> Option<DiskCounters> {
        // No cheap machine-wide byte counters without IOKit; the source
        // falls back to summing the process table's cumulative I/O.
        None
    }

    fn process_priority(pid: u32) -> Option<i32> {
        // getpriority returns -1 both on error and as a valid priority;
        // clear errno first to tell them apart.
        unsafe { *libc::__error() = 0 };
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        let errno = unsafe { *libc::__error() };
        if prio == -1 && errno != 0 {
            None
        } else {
            Some(prio)
        }
    }
}
