// src/config/mod.rs
//! Configuration management for the mining simulator
//!
//! This module handles all configuration-related functionality including:
//! - Loading and parsing configuration files ([`Config::load`])
//! - Generating configuration templates
//!
//! The configuration uses TOML format with `[mining]`, `[benchmark]` and
//! `[monitor]` sections.

/// Core configuration implementation
///
/// Contains the [`Config`] struct and its section types.
pub mod config;

// Re-export key items for easy access
pub use config::{BenchmarkConfig, Config, MiningConfig, MonitorConfig};

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
