// src/main.rs
use clap::Parser;
use sim_miner_rs::stats::{BenchmarkReport, HardwareSummary, MiningReport, Report, report};
use sim_miner_rs::*;
use std::time::Duration;

/// Main entry point for the mining simulator
///
/// # Flow
/// 1. Parses command line arguments
/// 2. Delegates to appropriate subcommand handler
/// 3. Propagates any errors upward
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Hardware(opts) => show_hardware(opts),
        cli::Action::Mine(opts) => start_mining(opts),
        cli::Action::Benchmark(opts) => run_benchmark(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Prints the detected hardware table
fn show_hardware(opts: cli::HardwareOptions) -> Result<(), MinerError> {
    init_logging(opts.verbose);

    let mut probe = SystemProbe::new();
    println!("{}", HardwareSummary::collect(&mut probe));
    Ok(())
}

/// Runs a mining simulation and writes its report
///
/// # Operations
/// 1. Loads configuration and applies CLI overrides
/// 2. Starts the resource sampler
/// 3. Runs the coordinator until a match or exhaustion
/// 4. Stops the sampler and writes the report
fn start_mining(opts: cli::MineOptions) -> Result<(), MinerError> {
    init_logging(opts.common.verbose);

    let config = config::Config::load_or_default(&opts.common.config)?;
    let mining = &config.mining;

    let payload = opts.data.unwrap_or_else(|| mining.default_payload.clone());
    let difficulty = opts.difficulty.unwrap_or(mining.default_difficulty);
    let workers = opts.workers.unwrap_or_else(|| mining.workers());
    let task = MiningTask::new(payload.as_bytes(), difficulty)
        .with_max_nonce(opts.max_nonce.unwrap_or(mining.max_nonce));

    println!(
        "Mining block '{}' with difficulty {} on {} workers...",
        payload, difficulty, workers
    );

    let coordinator = Coordinator::new().poll_interval(mining.poll_interval());
    let mut sampler = ResourceSampler::system(config.monitor.sample_interval());
    sampler.start()?;
    let outcome = coordinator.mine(&task, workers);
    sampler.stop();
    let result = outcome?;

    match (&result.nonce, &result.hash) {
        (Some(nonce), Some(hash)) => {
            println!("BLOCK FOUND!");
            println!("Nonce:      {}", nonce);
            println!("Hash:       {}", hash);
            println!("Time Taken: {:.4} seconds", result.elapsed_seconds);
            println!(
                "Approx H/s: {}",
                report::format_rate(result.approx_hashrate())
            );
        }
        _ => println!("Mining ended without finding a block (search space exhausted)."),
    }

    let mining_report = MiningReport::new(payload, difficulty, workers, result, sampler.data());
    report::write_report(&opts.output, &mining_report.render(opts.format)?)?;
    println!("Report saved to: {}", opts.output.display());
    Ok(())
}

/// Runs the single- and multi-core benchmark and writes its report
fn run_benchmark(opts: cli::BenchmarkOptions) -> Result<(), MinerError> {
    init_logging(opts.common.verbose);

    let config = config::Config::load_or_default(&opts.common.config)?;
    let duration = Duration::from_secs(opts.duration.unwrap_or(config.benchmark.duration_secs));
    let workers = opts.workers.unwrap_or_else(|| config.benchmark.workers());

    let mut probe = SystemProbe::new();
    let hardware = HardwareSummary::collect(&mut probe);

    let sampler = ResourceSampler::new(Box::new(probe), config.monitor.sample_interval());
    let mut benchmark = Benchmark::new(sampler).workers(workers);

    println!("Running Single-Core and Multi-Core tests ({}s each)...", duration.as_secs());
    let summary = benchmark.run(duration)?;
    println!(
        "Single-Core: {} H/s",
        report::format_rate(summary.single.hash_rate())
    );
    println!(
        "Multi-Core:  {} H/s",
        report::format_rate(summary.multi.hash_rate())
    );

    let benchmark_report = BenchmarkReport::new(hardware, summary);
    report::write_report(&opts.output, &benchmark_report.render(opts.format)?)?;
    println!("Report saved to: {}", opts.output.display());
    Ok(())
}

/// Generates configuration template file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    let template = config::generate_template();
    std::fs::write(&opts.output, template)?;
    println!("Configuration template written to {}", opts.output.display());
    Ok(())
}
