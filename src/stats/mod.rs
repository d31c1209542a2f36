//! Statistics collection and reporting module
//!
//! This module provides:
//! - Hardware description and live load queries ([`HardwareQuery`])
//! - A background utilization sampler ([`ResourceSampler`])
//! - Text and JSON reports for mining and benchmark runs
//!

/// Hardware and OS query layer
pub mod hardware;

/// Mining and benchmark report rendering
pub mod report;

/// Background utilization sampler
///
/// The sampler:
/// - Records one snapshot per interval on its own thread
/// - Marks unreadable values as unavailable instead of failing
/// - Joins its thread on stop so no snapshot lands afterwards
pub mod sampler;

// Re-export main components
pub use hardware::{HardwareQuery, HardwareSummary, SystemProbe};
pub use report::{BenchmarkReport, MiningReport, Report};
pub use sampler::{ResourceSampler, UtilizationSnapshot};
