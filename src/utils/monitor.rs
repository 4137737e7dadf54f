use serde::Serialize;
use std::time::Duration;
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// ETL stage a resource sample is taken after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Start,
    Extract,
    Transform,
    Load,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Start => "Inicio",
            Phase::Extract => "Extracción",
            Phase::Transform => "Transformación",
            Phase::Load => "Carga",
        }
    }
}

/// Process resources measured at the end of a phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStats {
    pub phase: Phase,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    /// Time since the monitor was created.
    pub elapsed: Duration,
}

impl PhaseStats {
    pub fn report_line(&self) -> String {
        format!(
            "  - {}: CPU {:.1}%, memoria {} MB (pico {} MB), {:.2}s",
            self.phase.label(),
            self.cpu_usage,
            self.memory_mb,
            self.peak_memory_mb,
            self.elapsed.as_secs_f64()
        )
    }
}

#[cfg(feature = "cli")]
struct ProcessSampler {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

/// Samples CPU and memory of this process after each ETL phase.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    sampler: Option<Mutex<ProcessSampler>>,
    started: Instant,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let sampler = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(Mutex::new(ProcessSampler {
                    system: System::new(),
                    pid,
                    peak_memory_mb: 0,
                })),
                Err(e) => {
                    tracing::warn!("⚠️ Could not resolve current PID, monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            sampler,
            started: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sampler.is_some()
    }

    /// Takes a sample and logs it; `None` when monitoring is off or the
    /// process could not be read.
    pub fn record(&self, phase: Phase) -> Option<PhaseStats> {
        let mut sampler = self.sampler.as_ref()?.lock().ok()?;
        let pid = sampler.pid;
        sampler.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let (cpu_usage, memory_mb) = {
            let process = sampler.system.process(pid)?;
            (process.cpu_usage(), process.memory() / 1024 / 1024)
        };
        sampler.peak_memory_mb = sampler.peak_memory_mb.max(memory_mb);

        let stats = PhaseStats {
            phase,
            cpu_usage,
            memory_mb,
            peak_memory_mb: sampler.peak_memory_mb,
            elapsed: self.started.elapsed(),
        };
        tracing::info!(
            "📊 {:?} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
            phase,
            stats.cpu_usage,
            stats.memory_mb,
            stats.peak_memory_mb,
            stats.elapsed
        );
        Some(stats)
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// Without the cli feature there is no sysinfo and nothing is sampled.
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn record(&self, _phase: Phase) -> Option<PhaseStats> {
        None
    }
}
