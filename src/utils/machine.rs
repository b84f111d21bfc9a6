//! Attributes of the machine and build a run was collected on.
//!
//! These end up in the report next to the results; numbers from an
//! unoptimized build or a different CPU are not comparable.

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use super::timer::CodeTimer;

const UNKNOWN: &str = "unknown";

/// Collect run attributes in display order.
///
/// With `skip_machine_stats` only the computer name and build profile are
/// recorded, which keeps startup fast.
pub fn capture(skip_machine_stats: bool) -> Vec<(String, String)> {
    let mut attributes = vec![(
        "Computer Name".to_string(),
        System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
    )];

    if !skip_machine_stats {
        let sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        if let Some(cpu) = sys.cpus().first() {
            attributes.push(("Processor Name".to_string(), cpu.brand().trim().to_string()));
            attributes.push(("Processor Clock MHz".to_string(), cpu.frequency().to_string()));
        }
        attributes.push(("Number of Processors".to_string(), sys.cpus().len().to_string()));
        attributes.push((
            "Memory MBytes".to_string(),
            (sys.total_memory() / (1024 * 1024)).to_string(),
        ));
        attributes.push((
            "Operating System".to_string(),
            System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
        ));
        attributes.push((
            "Operating System Version".to_string(),
            System::os_version().unwrap_or_else(|| UNKNOWN.to_string()),
        ));
        attributes.push((
            "Architecture".to_string(),
            std::env::consts::ARCH.to_string(),
        ));
        attributes.push((
            "Timer resolution (nsec)".to_string(),
            format!("{:.3}", CodeTimer::resolution_usec() * 1000.0),
        ));
    }

    attributes.push(("CodeOptimization".to_string(), code_optimization().to_string()));
    attributes
}

/// `"Optimized"` for release builds, `"Unoptimized"` otherwise.
pub fn code_optimization() -> &'static str {
    if cfg!(debug_assertions) {
        "Unoptimized"
    } else {
        "Optimized"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_keeps_name_and_profile() {
        let attributes = capture(true);
        let keys: Vec<_> = attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Computer Name", "CodeOptimization"]);
        assert!(!attributes[0].1.is_empty());
    }

    #[test]
    fn test_full_capture() {
        let attributes = capture(false);
        let get = |key: &str| attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

        let cpus: usize = get("Number of Processors").unwrap().parse().unwrap();
        assert!(cpus >= 1);
        let mbytes: u64 = get("Memory MBytes").unwrap().parse().unwrap();
        assert!(mbytes > 0);
        assert!(get("Processor Name").is_some());
        assert!(!get("Operating System").unwrap().is_empty());
        assert!(get("Operating System Version").is_some());
        assert!(get("Timer resolution (nsec)").is_some());
        assert_eq!(get("CodeOptimization").as_deref(), Some(code_optimization()));
        assert_eq!(attributes.last().map(|(k, _)| k.as_str()), Some("CodeOptimization"));
    }
}
