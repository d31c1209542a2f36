// src/stats/report.rs
//! Mining and benchmark reports
//!
//! Reports are plain data: they render as text through `Display` and as
//! JSON through `serde`. Writing to disk is a single call.

use crate::miner::benchmark::{BenchmarkSample, BenchmarkSummary};
use crate::miner::scheduler::MiningResult;
use crate::stats::hardware::HardwareSummary;
use crate::stats::sampler::UtilizationSnapshot;
use crate::types::ReportFormat;
use crate::utils::error::MinerError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Common rendering for all reports
pub trait Report: fmt::Display + Serialize {
    /// Renders the report in the requested format
    fn render(&self, format: ReportFormat) -> Result<String, MinerError> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Result of one mining simulation
#[derive(Debug, Clone, Serialize)]
pub struct MiningReport {
    /// Block payload as entered
    pub block_data: String,
    /// Required leading hex zeros
    pub difficulty: u32,
    /// Worker threads used
    pub workers: usize,
    /// Whether a qualifying nonce was found
    pub found: bool,
    /// Coordinator output
    pub result: MiningResult,
    /// Utilization sampled during the run
    pub monitor: Vec<UtilizationSnapshot>,
}

impl MiningReport {
    /// Bundles a mining result with its inputs and monitor log
    pub fn new(
        block_data: impl Into<String>,
        difficulty: u32,
        workers: usize,
        result: MiningResult,
        monitor: Vec<UtilizationSnapshot>,
    ) -> Self {
        MiningReport {
            block_data: block_data.into(),
            difficulty,
            workers,
            found: result.found(),
            result,
            monitor,
        }
    }
}

impl fmt::Display for MiningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crypto Mining Simulation Report")?;
        writeln!(f, "===============================\n")?;
        writeln!(f, "Block Data: {}", self.block_data)?;
        writeln!(f, "Difficulty: {}", self.difficulty)?;
        writeln!(f, "Workers:    {}", self.workers)?;

        match (&self.result.nonce, &self.result.hash) {
            (Some(nonce), Some(hash)) => {
                writeln!(f, "Result:     SUCCESS")?;
                writeln!(f, "Nonce:      {}", nonce)?;
                writeln!(f, "Hash:       {}", hash)?;
            }
            _ => writeln!(f, "Result:     FAILED (Not found in range)")?,
        }
        writeln!(f, "Time Taken: {:.4} s", self.result.elapsed_seconds)?;
        writeln!(
            f,
            "Hashes:     {} ({} H/s)",
            self.result.hashes_tried,
            format_rate(self.result.approx_hashrate())
        )?;
        for range in &self.result.unexplored {
            writeln!(
                f,
                "Unexplored: [{}, {}) (worker {} crashed)",
                range.start, range.end, range.worker_id
            )?;
        }

        writeln!(f)?;
        write_monitor_log(f, &self.monitor)
    }
}

impl Report for MiningReport {}

/// Single- versus multi-core benchmark results
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Host description
    pub hardware: HardwareSummary,
    /// One-worker measurement
    pub single: BenchmarkSample,
    /// All-workers measurement
    pub multi: BenchmarkSample,
    /// `multi / single`, absent when the single-core rate is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speedup: Option<f64>,
    /// Percent gain of multi over single, absent when single is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_gain_percent: Option<f64>,
    /// Utilization sampled during both measurements
    pub monitor: Vec<UtilizationSnapshot>,
}

impl BenchmarkReport {
    /// Builds a report from a completed benchmark run
    pub fn new(hardware: HardwareSummary, summary: BenchmarkSummary) -> Self {
        BenchmarkReport {
            hardware,
            speedup: summary.speedup(),
            efficiency_gain_percent: summary.efficiency_gain_percent(),
            single: summary.single,
            multi: summary.multi,
            monitor: summary.snapshots,
        }
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crypto Mining Simulator - Benchmark Report")?;
        writeln!(f, "==========================================\n")?;

        writeln!(f, "Hardware Information:")?;
        writeln!(f, "OS: {}", self.hardware.os)?;
        writeln!(f, "CPU: {}", self.hardware.cpu)?;
        writeln!(
            f,
            "Cores: {} Physical, {} Logical",
            self.hardware.physical_cores, self.hardware.logical_cores
        )?;
        writeln!(f, "GPU: {}\n", self.hardware.gpu)?;

        writeln!(f, "Benchmark Results:")?;
        writeln!(
            f,
            "Single-Core Hashrate: {} H/s",
            format_rate(self.single.hash_rate())
        )?;
        writeln!(
            f,
            "Multi-Core Hashrate:  {} H/s ({} workers)",
            format_rate(self.multi.hash_rate()),
            self.multi.workers
        )?;
        if let (Some(speedup), Some(gain)) = (self.speedup, self.efficiency_gain_percent) {
            writeln!(f, "Multi-Core Speedup:   {:.2}x", speedup)?;
            writeln!(f, "Efficiency Gain:      {:.2}%", gain)?;
        }
        writeln!(f)?;

        writeln!(f, "Calculation Explanation:")?;
        writeln!(f, "1. Single-Core Hashrate = Total Hashes / Duration")?;
        writeln!(f, "2. Multi-Core Hashrate  = Sum of all Core Hashes / Duration")?;
        writeln!(f, "3. Speedup              = Multi-Core / Single-Core\n")?;

        write_monitor_log(f, &self.monitor)
    }
}

impl Report for BenchmarkReport {}

/// Writes a rendered report to `path`
pub fn write_report(path: impl AsRef<Path>, contents: &str) -> Result<(), MinerError> {
    std::fs::write(path.as_ref(), contents)?;
    log::info!("Report saved to {}", path.as_ref().display());
    Ok(())
}

fn write_monitor_log(f: &mut fmt::Formatter<'_>, monitor: &[UtilizationSnapshot]) -> fmt::Result {
    writeln!(f, "System Monitor Log (Sampled during operation):")?;
    if monitor.is_empty() {
        return writeln!(f, "No monitoring data available.");
    }
    for entry in monitor {
        writeln!(
            f,
            "[{}] CPU Load: {} | GPU Load: {}",
            entry.timestamp.format("%H:%M:%S"),
            format_load(entry.cpu_load_percent),
            format_load(entry.gpu_load_percent)
        )?;
    }
    Ok(())
}

fn format_load(load: Option<f32>) -> String {
    match load {
        Some(value) => format!("{:.1}%", value),
        None => "N/A".to_string(),
    }
}

/// Formats a rate with two decimals and thousands separators, e.g. `1,234,567.89`
pub fn format_rate(rate: f64) -> String {
    let fixed = format!("{:.2}", rate);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::worker::NonceRange;
    use crate::types::BenchmarkMode;
    use chrono::Local;

    fn snapshot(cpu: Option<f32>) -> UtilizationSnapshot {
        UtilizationSnapshot {
            timestamp: Local::now(),
            cpu_load_percent: cpu,
            gpu_load_percent: None,
        }
    }

    fn sample(mode: BenchmarkMode, workers: usize, hashes: u64) -> BenchmarkSample {
        BenchmarkSample {
            mode,
            workers,
            hashes_counted: hashes,
            duration_seconds: 2.0,
        }
    }

    fn hardware() -> HardwareSummary {
        HardwareSummary {
            os: "TestOS".into(),
            cpu: "Test CPU".into(),
            physical_cores: 4,
            logical_cores: 8,
            gpu: "Unknown GPU".into(),
        }
    }

    #[test]
    fn format_rate_groups_thousands() {
        assert_eq!(format_rate(0.0), "0.00");
        assert_eq!(format_rate(999.5), "999.50");
        assert_eq!(format_rate(1234567.891), "1,234,567.89");
        assert_eq!(format_rate(-1000.0), "-1,000.00");
    }

    #[test]
    fn mining_report_success_text() {
        let result = MiningResult {
            nonce: Some(528),
            hash: Some("0034cca6".into()),
            worker_id: Some(0),
            elapsed_seconds: 0.5,
            hashes_tried: 1000,
            unexplored: Vec::new(),
        };
        let report = MiningReport::new("sim_block_1", 2, 1, result, vec![snapshot(Some(50.0))]);
        let text = report.to_string();

        assert!(text.contains("Result:     SUCCESS"));
        assert!(text.contains("Nonce:      528"));
        assert!(text.contains("Time Taken: 0.5000 s"));
        assert!(text.contains("(2,000.00 H/s)"));
        assert!(text.contains("CPU Load: 50.0% | GPU Load: N/A"));
    }

    #[test]
    fn mining_report_failure_lists_unexplored_ranges() {
        let result = MiningResult {
            nonce: None,
            hash: None,
            worker_id: None,
            elapsed_seconds: 1.0,
            hashes_tried: 300,
            unexplored: vec![NonceRange {
                worker_id: 1,
                start: 100,
                end: 200,
            }],
        };
        let report = MiningReport::new("x", 64, 4, result, Vec::new());
        let text = report.to_string();

        assert!(!report.found);
        assert!(text.contains("FAILED (Not found in range)"));
        assert!(text.contains("Unexplored: [100, 200) (worker 1 crashed)"));
        assert!(text.contains("No monitoring data available."));
    }

    #[test]
    fn benchmark_report_includes_derived_metrics() {
        let summary = BenchmarkSummary {
            single: sample(BenchmarkMode::SingleCore, 1, 2_000),
            multi: sample(BenchmarkMode::MultiCore, 4, 7_000),
            snapshots: vec![snapshot(None)],
        };
        let report = BenchmarkReport::new(hardware(), summary);
        let text = report.to_string();

        assert!(text.contains("Single-Core Hashrate: 1,000.00 H/s"));
        assert!(text.contains("Multi-Core Hashrate:  3,500.00 H/s (4 workers)"));
        assert!(text.contains("Multi-Core Speedup:   3.50x"));
        assert!(text.contains("Efficiency Gain:      250.00%"));
        assert!(text.contains("Cores: 4 Physical, 8 Logical"));
    }

    #[test]
    fn benchmark_report_omits_metrics_without_single_rate() {
        let summary = BenchmarkSummary {
            single: sample(BenchmarkMode::SingleCore, 1, 0),
            multi: sample(BenchmarkMode::MultiCore, 4, 7_000),
            snapshots: Vec::new(),
        };
        let report = BenchmarkReport::new(hardware(), summary);
        let text = report.to_string();
        assert!(!text.contains("Multi-Core Speedup:"));
        assert!(!text.contains("Efficiency Gain:"));
        assert!(text.contains("3. Speedup              = Multi-Core / Single-Core"));

        let json = report.render(ReportFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert!(value.get("speedup").is_none());
        assert_eq!(value["multi"]["hashes_counted"], 7_000);
        assert_eq!(value["single"]["mode"], "single-core");
    }

    #[test]
    fn write_report_creates_file() {
        let path =
            std::env::temp_dir().join(format!("sim-miner-report-{}.txt", std::process::id()));
        write_report(&path, "hello").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello");
        let _ = std::fs::remove_file(&path);
    }
}
