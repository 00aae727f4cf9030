use super::PlatformCounters;
use crate::metrics::{CoreTicks, DiskCounters};

const SECTOR_SIZE: u64 = 512;

pub struct Platform;

impl PlatformCounters for Platform {
    fn core_ticks() -> Option<Vec<CoreTicks>> {
        let contents = std::fs::read_to_string("/proc/stat").ok()?;
        let mut cores = Vec::new();
        for line in contents.lines() {
            // Per-core lines are "cpuN ..."; skip the aggregate "cpu " line.
            if line.starts_with("cpu") && !line.starts_with("cpu ") {
                cores.push(parse_cpu_line(line)?);
            }
        }
        if cores.is_empty() { None } else { Some(cores) }
    }

    fn disk_counters() -> Option<DiskCounters> {
        let contents = std::fs::read_to_string("/proc/diskstats").ok()?;
        let mut read_bytes = 0u64;
        let mut written_bytes = 0u64;
        for line in contents.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            // major minor name reads merged sectors_read ms writes merged sectors_written ...
            if fields.len() < 10 {
                continue;
            }
            let name = fields[2];
            if !is_whole_physical_disk(name) {
                continue;
            }
            let sectors_read: u64 = fields[5].parse().ok()?;
            let sectors_written: u64 = fields[9].parse().ok()?;
            read_bytes += sectors_read * SECTOR_SIZE;
            written_bytes += sectors_written * SECTOR_SIZE;
        }
        Some(DiskCounters {
            read_bytes,
            written_bytes,
        })
    }

    fn process_priority(pid: u32) -> Option<i32> {
        // /proc/{pid}/stat: comm may contain spaces and parens, so index
        // fields from the closing paren. priority is field 15 after comm.
        let contents = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
        let after_comm = contents.rfind(')')? + 1;
        contents[after_comm..]
            .split_whitespace()
            .nth(15)?
            .parse()
            .ok()
    }
}

fn parse_cpu_line(line: &str) -> Option<CoreTicks> {
    let mut fields = line.split_whitespace().skip(1);
    let user: u64 = fields.next()?.parse().ok()?;
    let nice: u64 = fields.next()?.parse().ok()?;
    let system: u64 = fields.next()?.parse().ok()?;
    let idle: u64 = fields.next()?.parse().ok()?;
    let iowait: u64 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    let irq: u64 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    let softirq: u64 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    let steal: u64 = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    Some(CoreTicks {
        user,
        nice,
        system: system + irq + softirq + steal,
        idle: idle + iowait,
    })
}

/// Keep whole physical devices; drop partitions and virtual devices so
/// bytes are not counted twice.
fn is_whole_physical_disk(name: &str) -> bool {
    if name.starts_with("loop")
        || name.starts_with("ram")
        || name.starts_with("zram")
        || name.starts_with("dm-")
        || name.starts_with("sr")
        || name.starts_with("md")
    {
        return false;
    }
    if let Some(rest) = name.strip_prefix("nvme") {
        // nvme0n1 is a disk, nvme0n1p1 a partition
        return !rest.contains('p');
    }
    if let Some(rest) = name.strip_prefix("mmcblk") {
        return !rest.contains('p');
    }
    // sda/vda/hda style: trailing digit means partition
    !name.ends_with(|c: char| c.is_ascii_digit())
}
