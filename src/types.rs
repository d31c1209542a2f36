// src/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Throughput benchmark modes
///
/// Both modes hash the same constant payload; they differ only in how many
/// worker threads run side by side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BenchmarkMode {
    /// A single worker thread
    SingleCore,

    /// One worker thread per available core
    MultiCore,
}

impl fmt::Display for BenchmarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkMode::SingleCore => write!(f, "single-core"),
            BenchmarkMode::MultiCore => write!(f, "multi-core"),
        }
    }
}

/// Output format for written reports
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text report
    #[default]
    Text,

    /// Structured JSON document
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_mode_display_matches_serde_name() {
        for mode in [BenchmarkMode::SingleCore, BenchmarkMode::MultiCore] {
            let json = serde_json::to_string(&mode).expect("serialize");
            assert_eq!(json, format!("\"{}\"", mode));
        }
    }
}
