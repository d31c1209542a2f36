// src/stats/sampler.rs
//! Background resource sampler
//!
//! Records one [`UtilizationSnapshot`] per interval on a dedicated thread
//! between `start()` and `stop()`. `stop()` joins the thread, so nothing is
//! appended once it returns.

use crate::stats::hardware::{HardwareQuery, SystemProbe, parse_percent};
use crate::utils::error::MinerError;
use chrono::{DateTime, Local};
use crossbeam_channel::{RecvTimeoutError, SendError, Sender};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default sampling cadence (1 Hz)
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// One utilization reading; `None` means the platform could not supply it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSnapshot {
    /// When the reading was taken
    pub timestamp: DateTime<Local>,
    /// Average CPU load across all cores
    pub cpu_load_percent: Option<f32>,
    /// GPU load as reported by the driver
    pub gpu_load_percent: Option<f32>,
}

impl UtilizationSnapshot {
    /// Takes a reading from `probe`
    pub fn take(probe: &mut dyn HardwareQuery) -> Self {
        let cpu_load_percent = probe.current_cpu_load();
        let gpu_load_percent = probe.current_gpu_load().as_deref().and_then(parse_percent);
        if cpu_load_percent.is_none() || gpu_load_percent.is_none() {
            log::trace!(
                "Partial reading: cpu={:?} gpu={:?}",
                cpu_load_percent,
                gpu_load_percent
            );
        }
        UtilizationSnapshot {
            timestamp: Local::now(),
            cpu_load_percent,
            gpu_load_percent,
        }
    }
}

struct Running {
    stop: Sender<()>,
    handle: JoinHandle<Option<Box<dyn HardwareQuery>>>,
}

/// Periodically samples CPU and GPU load on a background thread
pub struct ResourceSampler {
    interval: Duration,
    data: Arc<Mutex<Vec<UtilizationSnapshot>>>,
    /// Parked here while stopped; owned by the thread while running
    probe: Option<Box<dyn HardwareQuery>>,
    running: Option<Running>,
}

impl ResourceSampler {
    /// Creates a stopped sampler reading from `probe`
    pub fn new(probe: Box<dyn HardwareQuery>, interval: Duration) -> Self {
        ResourceSampler {
            interval,
            data: Arc::new(Mutex::new(Vec::new())),
            probe: Some(probe),
            running: None,
        }
    }

    /// Creates a sampler backed by [`SystemProbe`]
    pub fn system(interval: Duration) -> Self {
        Self::new(Box::new(SystemProbe::new()), interval)
    }

    /// True between `start()` and `stop()`
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Clears previous data and starts sampling
    ///
    /// Does nothing if the sampler is already running. A failed launch
    /// leaves the probe in place, so `start()` can be retried.
    pub fn start(&mut self) -> Result<(), MinerError> {
        self.start_on(thread::Builder::new().name("resource-sampler".into()))
    }

    fn start_on(&mut self, builder: thread::Builder) -> Result<(), MinerError> {
        if self.running.is_some() {
            return Ok(());
        }
        let probe = self
            .probe
            .take()
            .ok_or_else(|| MinerError::TaskError("sampler probe was lost".into()))?;

        lock(&self.data).clear();

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        // The probe only moves to the thread once it is actually running.
        let (probe_tx, probe_rx) = crossbeam_channel::bounded::<Box<dyn HardwareQuery>>(1);
        let data = Arc::clone(&self.data);
        let interval = self.interval;

        let spawned = builder.spawn(move || {
            let mut probe = probe_rx.recv().ok()?;
            loop {
                let snapshot = UtilizationSnapshot::take(probe.as_mut());
                lock(&data).push(snapshot);

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            Some(probe)
        });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.probe = Some(probe);
                return Err(MinerError::WorkerSpawn(format!("resource sampler: {}", e)));
            }
        };

        if let Err(SendError(probe)) = probe_tx.send(probe) {
            self.probe = Some(probe);
            let _ = handle.join();
            return Err(MinerError::TaskError(
                "resource sampler exited before receiving its probe".into(),
            ));
        }

        log::debug!("Resource sampler started ({:?} interval)", self.interval);
        self.running = Some(Running {
            stop: stop_tx,
            handle,
        });
        Ok(())
    }

    /// Stops sampling and waits for the background thread to exit
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        // A full or disconnected channel still ends the loop.
        let _ = running.stop.try_send(());
        drop(running.stop);

        match running.handle.join() {
            Ok(Some(probe)) => self.probe = Some(probe),
            Ok(None) | Err(_) => {
                log::warn!("Resource sampler thread lost its probe; sampler cannot restart")
            }
        }
        log::debug!(
            "Resource sampler stopped with {} snapshots",
            lock(&self.data).len()
        );
    }

    /// Snapshots completed so far
    pub fn data(&self) -> Vec<UtilizationSnapshot> {
        lock(&self.data).clone()
    }
}

impl Drop for ResourceSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(
    data: &Mutex<Vec<UtilizationSnapshot>>,
) -> std::sync::MutexGuard<'_, Vec<UtilizationSnapshot>> {
    data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::hardware::testing::FixedProbe;
    use std::sync::atomic::Ordering;

    #[test]
    fn samples_until_stopped_and_not_after() {
        let probe = FixedProbe {
            cpu_load: Some(42.5),
            gpu_load: Some("17".into()),
            ..FixedProbe::unavailable()
        };
        let calls = Arc::clone(&probe.samples);
        let mut sampler = ResourceSampler::new(Box::new(probe), Duration::from_millis(10));

        sampler.start().expect("start");
        assert!(sampler.is_running());
        thread::sleep(Duration::from_millis(80));
        sampler.stop();
        assert!(!sampler.is_running());

        let data = sampler.data();
        assert!(!data.is_empty());
        assert_eq!(data[0].cpu_load_percent, Some(42.5));
        assert_eq!(data[0].gpu_load_percent, Some(17.0));

        let calls_at_stop = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(sampler.data().len(), data.len());
        assert_eq!(calls.load(Ordering::SeqCst), calls_at_stop);
    }

    #[test]
    fn stop_returns_promptly_with_long_interval() {
        let mut sampler =
            ResourceSampler::new(Box::new(FixedProbe::unavailable()), Duration::from_secs(60));
        sampler.start().expect("start");
        let begun = std::time::Instant::now();
        sampler.stop();
        assert!(begun.elapsed() < Duration::from_secs(5));
        assert_eq!(sampler.data().len(), 1);
    }

    #[test]
    fn unavailable_readings_are_recorded_not_fatal() {
        let mut sampler =
            ResourceSampler::new(Box::new(FixedProbe::unavailable()), Duration::from_millis(5));
        sampler.start().expect("start");
        thread::sleep(Duration::from_millis(20));
        sampler.stop();

        let data = sampler.data();
        assert!(!data.is_empty());
        assert!(
            data.iter()
                .all(|s| s.cpu_load_percent.is_none() && s.gpu_load_percent.is_none())
        );
    }

    #[test]
    fn restart_clears_previous_data() {
        let mut sampler =
            ResourceSampler::new(Box::new(FixedProbe::unavailable()), Duration::from_secs(60));
        sampler.start().expect("start");
        sampler.stop();
        sampler.start().expect("restart");
        sampler.start().expect("second start is a no-op");
        sampler.stop();
        sampler.stop();
        assert_eq!(sampler.data().len(), 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn failed_launch_keeps_the_probe_for_a_retry() {
        let mut sampler =
            ResourceSampler::new(Box::new(FixedProbe::unavailable()), Duration::from_secs(60));

        // No address space can hold a 4 EiB stack, so the spawn fails.
        let oversized = thread::Builder::new().stack_size(1 << 62);
        let err = sampler.start_on(oversized).expect_err("spawn should fail");
        assert!(matches!(err, MinerError::WorkerSpawn(_)), "got {err:?}");
        assert!(!sampler.is_running());

        sampler.start().expect("retry after failed launch");
        sampler.stop();
        assert_eq!(sampler.data().len(), 1);
    }

    #[test]
    fn data_is_readable_while_running() {
        let mut sampler =
            ResourceSampler::new(Box::new(FixedProbe::unavailable()), Duration::from_millis(5));
        sampler.start().expect("start");
        thread::sleep(Duration::from_millis(30));
        let partial = sampler.data().len();
        assert!(partial >= 1);
        drop(sampler);
    }
}
