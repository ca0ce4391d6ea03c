#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ProcessStats {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
#[derive(Debug, Default)]
struct RunLedger {
    last_mark: Option<Instant>,
    phases: Vec<(String, Duration)>,
    peak_memory_mb: u64,
}

/// Samples this process's CPU and memory between pipeline phases and keeps
/// how long each phase took, so a slow scrape or LLM stage stands out.
#[cfg(feature = "cli")]
pub struct ProcessMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    ledger: Mutex<RunLedger>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl ProcessMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Process monitoring unavailable: {}", e))
                .ok()
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            started: Instant::now(),
            ledger: Mutex::new(RunLedger::default()),
            enabled,
        }
    }

    pub fn sample(&self) -> Option<ProcessStats> {
        if !self.enabled {
            return None;
        }

        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut ledger = self.ledger.lock().ok()?;
        ledger.peak_memory_mb = ledger.peak_memory_mb.max(memory_mb);

        Some(ProcessStats {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: ledger.peak_memory_mb,
            elapsed: self.started.elapsed(),
        })
    }

    /// Closes the current phase: records its duration and logs a resource sample.
    pub fn log_phase(&self, phase: &str) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let took = match self.ledger.lock() {
            Ok(mut ledger) => {
                let took = now - ledger.last_mark.unwrap_or(self.started);
                ledger.last_mark = Some(now);
                ledger.phases.push((phase.to_string(), took));
                took
            }
            Err(_) => return,
        };

        match self.sample() {
            Some(stats) => tracing::info!(
                "📊 {} took {:?} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                phase,
                took,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb
            ),
            None => tracing::info!("📊 {} took {:?}", phase, took),
        }
    }

    pub fn log_final(&self) {
        if !self.enabled {
            return;
        }

        let peak = self.sample().map(|s| s.peak_memory_mb).unwrap_or_default();
        let breakdown = self
            .phase_durations()
            .iter()
            .map(|(name, took)| format!("{} {:.1}s", name, took.as_secs_f64()))
            .collect::<Vec<_>>()
            .join(", ");
        tracing::info!(
            "📊 Run finished in {:?} ({}), peak memory {}MB",
            self.started.elapsed(),
            breakdown,
            peak
        );
    }

    pub fn phase_durations(&self) -> Vec<(String, Duration)> {
        self.ledger
            .lock()
            .map(|ledger| ledger.phases.clone())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 無 sysinfo 時的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct ProcessMonitor;

#[cfg(not(feature = "cli"))]
impl ProcessMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_final(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = ProcessMonitor::new(false);
        monitor.log_phase("Extract");

        assert!(!monitor.is_enabled());
        assert!(monitor.sample().is_none());
        assert!(monitor.phase_durations().is_empty());
    }

    #[test]
    fn test_enabled_monitor_keeps_phase_order() {
        let monitor = ProcessMonitor::new(true);
        monitor.log_phase("Extract");
        monitor.log_phase("Transform");

        let phases: Vec<String> = monitor.phase_durations().into_iter().map(|(n, _)| n).collect();
        assert_eq!(phases, vec!["Extract", "Transform"]);
    }
}
