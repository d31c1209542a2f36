// src/stats/hardware.rs
//! Hardware and OS queries
//!
//! Every query degrades instead of failing: a model string falls back to
//! "Unknown CPU"/"Unknown GPU" and a load reading to `None`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Command;
use sysinfo::System;

/// Source of hardware descriptions and live utilization readings
pub trait HardwareQuery: Send {
    /// CPU brand string
    fn cpu_model(&mut self) -> String;

    /// Number of physical cores
    fn physical_cores(&self) -> usize;

    /// Number of logical cores (hardware threads)
    fn logical_cores(&self) -> usize;

    /// GPU model(s), comma separated
    fn gpu_model(&mut self) -> String;

    /// Current overall CPU load in percent, if it can be read
    fn current_cpu_load(&mut self) -> Option<f32>;

    /// Current GPU load as reported by the driver tool, if it can be read
    fn current_gpu_load(&mut self) -> Option<String>;

    /// Operating system name and version
    fn os_summary(&self) -> String {
        std::env::consts::OS.to_string()
    }
}

/// Static hardware description included in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareSummary {
    /// Operating system name and version
    pub os: String,
    /// CPU brand string
    pub cpu: String,
    /// Physical core count
    pub physical_cores: usize,
    /// Logical core count
    pub logical_cores: usize,
    /// GPU model(s)
    pub gpu: String,
}

impl HardwareSummary {
    /// Collects a summary from any hardware query implementation
    pub fn collect(probe: &mut dyn HardwareQuery) -> Self {
        HardwareSummary {
            os: probe.os_summary(),
            cpu: probe.cpu_model(),
            physical_cores: probe.physical_cores(),
            logical_cores: probe.logical_cores(),
            gpu: probe.gpu_model(),
        }
    }
}

impl fmt::Display for HardwareSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        table_row(f, "Component", "Details")?;
        writeln!(f, "{}", "-".repeat(TABLE_WIDTH))?;
        table_row(f, "OS", &self.os)?;
        table_row(f, "CPU", &self.cpu)?;
        table_row(f, "Physical Cores", &self.physical_cores.to_string())?;
        table_row(f, "Logical Cores", &self.logical_cores.to_string())?;
        table_row(f, "GPU", &self.gpu)
    }
}

const TABLE_WIDTH: usize = 60;

fn table_row(f: &mut fmt::Formatter<'_>, left: &str, right: &str) -> fmt::Result {
    let col = TABLE_WIDTH / 2;
    writeln!(f, "{:<w$}{:>r$}", left, right, w = col, r = col - 1)
}

/// [`HardwareQuery`] backed by `sysinfo`, `num_cpus` and the GPU vendor tools
pub struct SystemProbe {
    system: System,
}

impl SystemProbe {
    /// Creates a probe with an initial CPU refresh
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        SystemProbe { system }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareQuery for SystemProbe {
    fn cpu_model(&mut self) -> String {
        self.system.refresh_cpu_all();
        self.system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| {
                log::debug!("CPU brand unavailable, falling back to architecture");
                match std::env::consts::ARCH {
                    "" => "Unknown CPU".to_string(),
                    arch => arch.to_string(),
                }
            })
    }

    fn physical_cores(&self) -> usize {
        num_cpus::get_physical()
    }

    fn logical_cores(&self) -> usize {
        num_cpus::get()
    }

    fn gpu_model(&mut self) -> String {
        if let Some(names) = command_output(
            "nvidia-smi",
            &["--query-gpu=name", "--format=csv,noheader"],
        ) {
            let gpus: Vec<&str> = names
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            if !gpus.is_empty() {
                return gpus.join(", ");
            }
        }

        if let Some(devices) = command_output("lspci", &[]) {
            let vga: Vec<&str> = devices
                .lines()
                .filter(|l| l.to_lowercase().contains("vga"))
                .map(str::trim)
                .collect();
            if !vga.is_empty() {
                return vga.join(", ");
            }
        }

        "Unknown GPU".to_string()
    }

    fn current_cpu_load(&mut self) -> Option<f32> {
        self.system.refresh_cpu_usage();
        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return None;
        }
        let load = cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32;
        load.is_finite().then_some(load)
    }

    fn current_gpu_load(&mut self) -> Option<String> {
        command_output(
            "nvidia-smi",
            &["--query-gpu=utilization.gpu", "--format=csv,noheader,nounits"],
        )
        .and_then(|out| out.lines().next().map(|l| l.trim().to_string()))
        .filter(|l| !l.is_empty())
    }

    fn os_summary(&self) -> String {
        System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| std::env::consts::OS.to_string())
    }
}

/// Parses a driver-reported load such as `"37"` or `"37 %"` into a percentage
pub fn parse_percent(raw: &str) -> Option<f32> {
    raw.lines()
        .next()?
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Runs an external tool and returns its stdout, or `None` on any failure
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(out) if out.status.success() => String::from_utf8(out.stdout).ok(),
        Ok(out) => {
            log::trace!("{} exited with {}", program, out.status);
            None
        }
        Err(e) => {
            log::trace!("{} unavailable: {}", program, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Probe with fixed readings that counts how often it was sampled
    pub(crate) struct FixedProbe {
        pub cpu_load: Option<f32>,
        pub gpu_load: Option<String>,
        pub samples: Arc<AtomicUsize>,
    }

    impl FixedProbe {
        pub(crate) fn unavailable() -> Self {
            FixedProbe {
                cpu_load: None,
                gpu_load: None,
                samples: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl HardwareQuery for FixedProbe {
        fn cpu_model(&mut self) -> String {
            "Test CPU".into()
        }

        fn physical_cores(&self) -> usize {
            2
        }

        fn logical_cores(&self) -> usize {
            4
        }

        fn gpu_model(&mut self) -> String {
            "Unknown GPU".into()
        }

        fn current_cpu_load(&mut self) -> Option<f32> {
            self.samples.fetch_add(1, Ordering::SeqCst);
            self.cpu_load
        }

        fn current_gpu_load(&mut self) -> Option<String> {
            self.gpu_load.clone()
        }

        fn os_summary(&self) -> String {
            "TestOS 1.0".into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedProbe;
    use super::*;

    #[test]
    fn parse_percent_accepts_driver_formats() {
        assert_eq!(parse_percent("37"), Some(37.0));
        assert_eq!(parse_percent(" 12 %\n40\n"), Some(12.0));
        assert_eq!(parse_percent("N/A"), None);
        assert_eq!(parse_percent(""), None);
    }

    #[test]
    fn summary_collects_every_field() {
        let mut probe = FixedProbe::unavailable();
        let summary = HardwareSummary::collect(&mut probe);
        assert_eq!(summary.os, "TestOS 1.0");
        assert_eq!(summary.cpu, "Test CPU");
        assert_eq!((summary.physical_cores, summary.logical_cores), (2, 4));

        let table = summary.to_string();
        assert!(table.starts_with("Component"));
        assert!(table.contains("Test CPU"));
    }

    #[test]
    fn system_probe_never_fails() {
        let mut probe = SystemProbe::new();
        assert!(!probe.cpu_model().is_empty());
        assert!(probe.logical_cores() >= 1);
        assert!(!probe.gpu_model().is_empty());
        if let Some(load) = probe.current_cpu_load() {
            assert!(load >= 0.0);
        }
        assert!(!probe.os_summary().is_empty());
    }
}
