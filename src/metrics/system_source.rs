use sysinfo::{
    Networks, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users,
};

use super::platform;
use super::{
    CoreTicks, DiskCounters, HardwareFacts, KernelFacts, MemoryUsage, MetricsSource,
    NetworkCounters, ProcessUsage,
};

/// Production [`MetricsSource`] backed by sysinfo, with a platform layer
/// for the raw counters sysinfo does not expose (per-core ticks, whole-disk
/// byte totals).
pub struct SystemSource {
    sys: System,
    networks: Networks,
    users: Users,
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        SystemSource {
            sys,
            networks: Networks::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
        }
    }

    fn owner_for(&self, process: &sysinfo::Process) -> Option<String> {
        let uid = process.user_id()?;
        match self.users.get_user_by_id(uid) {
            Some(user) => Some(user.name().to_string()),
            // No user-database entry for this uid; show the raw id.
            None => Some(format!("{uid:?}")),
        }
    }
}

impl MetricsSource for SystemSource {
    fn hardware_facts(&mut self) -> Option<HardwareFacts> {
        self.sys.refresh_cpu_all();
        let logical = self.sys.cpus().len();
        if logical == 0 {
            return None;
        }
        Some(HardwareFacts {
            logical_cpus: logical,
            physical_cpus: System::physical_core_count().unwrap_or(logical),
            total_memory_bytes: self.sys.total_memory(),
            cpu_model: self
                .sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .unwrap_or_default(),
        })
    }

    fn kernel_facts(&mut self) -> Option<KernelFacts> {
        Some(KernelFacts {
            os_version: System::long_os_version().unwrap_or_default(),
            hostname: System::host_name().unwrap_or_default(),
            boot_time_secs: System::boot_time(),
        })
    }

    fn core_ticks(&mut self) -> Option<Vec<CoreTicks>> {
        platform::core_ticks()
    }

    fn process_table(&mut self) -> Option<Vec<ProcessUsage>> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_disk_usage()
                .with_cmd(UpdateKind::OnlyIfNotSet)
                .with_user(UpdateKind::OnlyIfNotSet),
        );

        let mut rows = Vec::with_capacity(self.sys.processes().len());
        for (pid, process) in self.sys.processes() {
            let pid_u32 = pid.as_u32();
            let name = process.name().to_string_lossy().to_string();
            let command = process
                .cmd()
                .iter()
                .map(|s| s.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            let disk = process.disk_usage();

            rows.push(ProcessUsage {
                pid: pid_u32,
                ppid: process.parent().map(|p| p.as_u32()).unwrap_or(0),
                command: if command.is_empty() {
                    name.clone()
                } else {
                    command
                },
                name,
                owner: self.owner_for(process),
                group_id: process.group_id().map(|gid| format!("{gid:?}")),
                status: process.status().to_string(),
                priority: platform::process_priority(pid_u32),
                total_cpu_time_ms: process.accumulated_cpu_time(),
                resident_memory: process.memory(),
                virtual_memory: process.virtual_memory(),
                disk_read_bytes: disk.total_read_bytes,
                disk_written_bytes: disk.total_written_bytes,
            });
        }

        if rows.is_empty() { None } else { Some(rows) }
    }

    fn disk_counters(&mut self) -> Option<DiskCounters> {
        if let Some(counters) = platform::disk_counters() {
            return Some(counters);
        }
        // Fallback: cumulative per-process I/O totals. Undercounts exited
        // processes but stays monotonic enough for the regression-collapse
        // rule to absorb.
        let mut counters = DiskCounters::default();
        for process in self.sys.processes().values() {
            let disk = process.disk_usage();
            counters.read_bytes += disk.total_read_bytes;
            counters.written_bytes += disk.total_written_bytes;
        }
        Some(counters)
    }

    fn network_counters(&mut self) -> Option<NetworkCounters> {
        self.networks.refresh(true);
        let mut counters = NetworkCounters::default();
        for (_name, data) in &self.networks {
            counters.bytes_in += data.total_received();
            counters.bytes_out += data.total_transmitted();
        }
        Some(counters)
    }

    fn memory_usage(&mut self) -> Option<MemoryUsage> {
        self.sys.refresh_memory();
        Some(MemoryUsage {
            total: self.sys.total_memory(),
            used: self.sys.used_memory(),
            swap_total: self.sys.total_swap(),
            swap_used: self.sys.used_swap(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_table_includes_this_process() {
        let mut source = SystemSource::new();
        let table = source.process_table().expect("process table");
        let me = std::process::id();
        assert!(table.iter().any(|p| p.pid == me));
    }

    #[test]
    fn memory_usage_is_consistent() {
        let mut source = SystemSource::new();
        let memory = source.memory_usage().expect("memory usage");
        assert!(memory.total > 0);
        assert!(memory.used <= memory.total);
    }
}
