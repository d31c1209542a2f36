// src/cli/commands.rs
use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Mining simulator CLI - parallel SHA-256 nonce search and hash benchmarks
#[derive(Parser, Debug)]
#[command(name = "sim-miner-rs")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the simulator
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Show detected hardware
    Hardware(HardwareOptions),

    /// Run a mining simulation
    Mine(MineOptions),

    /// Measure single- and multi-core hash rates
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options shared by every command that runs work
#[derive(Args, Debug, Clone)]
pub struct CommonOptions {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for the hardware summary
#[derive(Parser, Debug)]
pub struct HardwareOptions {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options for a mining simulation
#[derive(Parser, Debug)]
pub struct MineOptions {
    /// Config and logging options
    #[command(flatten)]
    pub common: CommonOptions,

    /// Block data to mine (overrides config)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Leading hex zeros required (overrides config)
    #[arg(long)]
    pub difficulty: Option<u32>,

    /// Number of worker threads (overrides config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Size of the nonce space (overrides config)
    #[arg(long)]
    pub max_nonce: Option<u64>,

    /// Report output path
    #[arg(short, long, default_value = "mining_report.txt")]
    pub output: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Options for the throughput benchmark
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Config and logging options
    #[command(flatten)]
    pub common: CommonOptions,

    /// Seconds per measurement (overrides config)
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Multi-core worker threads (overrides config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Report output path
    #[arg(short, long, default_value = "benchmark_report.txt")]
    pub output: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Commands::command().debug_assert();
    }

    #[test]
    fn parses_mine_overrides() {
        let cli = Commands::try_parse_from([
            "sim-miner-rs",
            "mine",
            "--data",
            "block",
            "--difficulty",
            "3",
            "-w",
            "2",
            "--format",
            "json",
        ])
        .expect("parse");

        match cli.action {
            Action::Mine(opts) => {
                assert_eq!(opts.data.as_deref(), Some("block"));
                assert_eq!(opts.difficulty, Some(3));
                assert_eq!(opts.workers, Some(2));
                assert_eq!(opts.format, ReportFormat::Json);
                assert_eq!(opts.common.config, PathBuf::from("config.toml"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    fn accepts(args: &[&str]) -> bool {
        Commands::try_parse_from(args).is_ok()
    }

    #[test]
    fn config_and_verbose_flags_per_subcommand() {
        assert!(accepts(&["sim-miner-rs", "mine", "-c", "alt.toml", "-v"]));
        assert!(accepts(&["sim-miner-rs", "benchmark", "-c", "alt.toml", "-v"]));
        assert!(accepts(&["sim-miner-rs", "hardware", "-v"]));
        assert!(!accepts(&["sim-miner-rs", "hardware", "-c", "alt.toml"]));
        assert!(!accepts(&["sim-miner-rs", "config", "-v"]));

        let cli = Commands::try_parse_from(["sim-miner-rs", "config", "-o", "out.toml"])
            .expect("parse");
        match cli.action {
            Action::Config(opts) => assert_eq!(opts.output, PathBuf::from("out.toml")),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn benchmark_defaults() {
        let cli = Commands::try_parse_from(["sim-miner-rs", "benchmark"])
            .expect("parse");
        match cli.action {
            Action::Benchmark(opts) => {
                assert_eq!(opts.duration, None);
                assert_eq!(opts.output, PathBuf::from("benchmark_report.txt"));
                assert_eq!(opts.format, ReportFormat::Text);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }
}
