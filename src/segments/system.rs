use crate::utils::run_command;
use std::env;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

pub const SYSTEM_COMMAND_TIMEOUT: Duration = Duration::from_secs(1);
pub const WINDOWS_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);
const PROC_STAT: &str = "/proc/stat";
const PROC_MEMINFO: &str = "/proc/meminfo";
const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

fn platform() -> Platform {
    match env::consts::OS {
        "linux" => Platform::Linux,
        "macos" => Platform::MacOs,
        "windows" => Platform::Windows,
        _ => Platform::Other,
    }
}

/// CPU utilization in percent.
pub async fn cpu_usage() -> Option<u8> {
    let usage = match platform() {
        Platform::Linux => linux_cpu().await,
        Platform::MacOs => run_command("top", &["-l", "1", "-n", "0"], None, SYSTEM_COMMAND_TIMEOUT)
            .await
            .and_then(|out| parse_top_cpu(&out)),
        Platform::Windows => run_command("wmic", &["cpu", "get", "loadpercentage"], None, WINDOWS_COMMAND_TIMEOUT)
            .await
            .and_then(|out| parse_wmic_value(&out))
            .and_then(|v| to_percent(v as f64)),
        Platform::Other => None,
    };
    debug!("CPU usage: {:?}", usage);
    usage
}

/// Memory in use, as a percentage of physical memory.
pub async fn memory_usage() -> Option<u8> {
    let usage = match platform() {
        Platform::Linux => fs::read_to_string(PROC_MEMINFO)
            .await
            .ok()
            .and_then(|content| parse_meminfo(&content)),
        Platform::MacOs => macos_memory().await,
        Platform::Windows => windows_memory().await,
        Platform::Other => None,
    };
    debug!("Memory usage: {:?}", usage);
    usage
}

/// Battery charge in percent; `None` on machines without a battery.
pub async fn battery() -> Option<u8> {
    let charge = match platform() {
        Platform::Linux => linux_battery().await,
        Platform::MacOs => run_command("pmset", &["-g", "batt"], None, SYSTEM_COMMAND_TIMEOUT)
            .await
            .and_then(|out| parse_pmset_battery(&out)),
        Platform::Windows => run_command(
            "wmic",
            &["path", "win32_battery", "get", "estimatedchargeremaining"],
            None,
            WINDOWS_COMMAND_TIMEOUT,
        )
        .await
        .and_then(|out| parse_wmic_value(&out))
        .and_then(|v| to_percent(v as f64)),
        Platform::Other => None,
    };
    debug!("Battery: {:?}", charge);
    charge
}

async fn linux_cpu() -> Option<u8> {
    let first = parse_proc_stat(&fs::read_to_string(PROC_STAT).await.ok()?)?;
    tokio::time::sleep(CPU_SAMPLE_INTERVAL).await;
    let second = parse_proc_stat(&fs::read_to_string(PROC_STAT).await.ok()?)?;
    cpu_percent_between(first, second)
}

async fn linux_battery() -> Option<u8> {
    let mut entries = fs::read_dir(POWER_SUPPLY_DIR).await.ok()?;
    let mut batteries = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        if entry.file_name().to_string_lossy().starts_with("BAT") {
            batteries.push(entry.path());
        }
    }
    batteries.sort();

    for battery in batteries {
        if let Ok(capacity) = fs::read_to_string(battery.join("capacity")).await {
            if let Some(percent) = capacity.trim().parse::<f64>().ok().and_then(to_percent) {
                return Some(percent);
            }
        }
    }
    None
}

async fn macos_memory() -> Option<u8> {
    let total: u64 = run_command("sysctl", &["-n", "hw.memsize"], None, SYSTEM_COMMAND_TIMEOUT)
        .await?
        .parse()
        .ok()?;
    let vm_stat = run_command("vm_stat", &[], None, SYSTEM_COMMAND_TIMEOUT).await?;
    let used = parse_vm_stat_used_bytes(&vm_stat)?;
    ratio_percent(used, total)
}

async fn windows_memory() -> Option<u8> {
    let total_bytes = run_command(
        "wmic",
        &["ComputerSystem", "get", "TotalPhysicalMemory"],
        None,
        WINDOWS_COMMAND_TIMEOUT,
    )
    .await
    .and_then(|out| parse_wmic_value(&out))?;
    let free_kb = run_command("wmic", &["OS", "get", "FreePhysicalMemory"], None, WINDOWS_COMMAND_TIMEOUT)
        .await
        .and_then(|out| parse_wmic_value(&out))?;
    let used = total_bytes.checked_sub(free_kb.saturating_mul(1024))?;
    ratio_percent(used, total_bytes)
}

/// Aggregate CPU counters from the first line of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTimes {
    pub total: u64,
    pub idle: u64,
}

pub fn parse_proc_stat(content: &str) -> Option<CpuTimes> {
    let line = content.lines().next()?;
    let mut fields = line.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }
    let values: Vec<u64> = fields.map(|f| f.parse().ok()).collect::<Option<_>>()?;
    let idle = *values.get(3)?;
    Some(CpuTimes {
        total: values.iter().sum(),
        idle,
    })
}

/// Busy share between two samples; `None` when no time elapsed.
pub fn cpu_percent_between(first: CpuTimes, second: CpuTimes) -> Option<u8> {
    let total = second.total.checked_sub(first.total)?;
    let idle = second.idle.checked_sub(first.idle)?;
    if total == 0 {
        return None;
    }
    to_percent(100.0 * (1.0 - idle as f64 / total as f64))
}

/// `(MemTotal - MemAvailable) / MemTotal` from `/proc/meminfo`.
pub fn parse_meminfo(content: &str) -> Option<u8> {
    let mut total = None;
    let mut available = None;
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("MemTotal:") => total = parts.next().and_then(|v| v.parse::<u64>().ok()),
            Some("MemAvailable:") => available = parts.next().and_then(|v| v.parse::<u64>().ok()),
            _ => {}
        }
    }
    let total = total?;
    let used = total.checked_sub(available?)?;
    ratio_percent(used, total)
}

/// Busy share from `top -l 1` ("CPU usage: 12.3% user, 5.6% sys, 82.1% idle").
pub fn parse_top_cpu(output: &str) -> Option<u8> {
    let line = output.lines().find(|line| line.contains("CPU usage"))?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    let idle_at = parts.iter().position(|part| part.trim_end_matches(',') == "idle")?;
    let idle: f64 = parts
        .get(idle_at.checked_sub(1)?)?
        .trim_end_matches([',', '%'])
        .parse()
        .ok()?;
    to_percent(100.0 - idle)
}

/// Active plus wired pages from `vm_stat`, in bytes.
pub fn parse_vm_stat_used_bytes(output: &str) -> Option<u64> {
    let mut page_size = 4096u64;
    let mut used_pages = 0u64;
    let mut seen = false;

    for line in output.lines() {
        if let Some(rest) = line.split("page size of ").nth(1) {
            if let Some(size) = rest.split_whitespace().next().and_then(|s| s.parse().ok()) {
                page_size = size;
            }
        } else if line.starts_with("Pages active") || line.starts_with("Pages wired") {
            let pages: u64 = line.split_whitespace().last()?.trim_end_matches('.').parse().ok()?;
            used_pages += pages;
            seen = true;
        }
    }

    seen.then(|| used_pages * page_size)
}

/// First percentage in `pmset -g batt` output ("... 85%; discharging; ...").
pub fn parse_pmset_battery(output: &str) -> Option<u8> {
    output
        .split_whitespace()
        .filter_map(|token| token.trim_end_matches(';').strip_suffix('%'))
        .find_map(|value| value.parse::<f64>().ok())
        .and_then(to_percent)
}

/// The value row of single-column `wmic ... get X` output.
pub fn parse_wmic_value(output: &str) -> Option<u64> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .nth(1)?
        .parse()
        .ok()
}

fn ratio_percent(part: u64, whole: u64) -> Option<u8> {
    if whole == 0 {
        return None;
    }
    to_percent(part as f64 / whole as f64 * 100.0)
}

fn to_percent(value: f64) -> Option<u8> {
    value
        .is_finite()
        .then(|| value.round().clamp(0.0, 100.0) as u8)
}
