//! Process metrics for the gateway itself (CPU time, memory, start time),
//! refreshed from `sysinfo` on every scrape.

use std::sync::{Mutex, PoisonError};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use metrix_core::error::{MetrixError, Result};
use metrix_core::Registry;

pub const CPU_SECONDS_TOTAL: &str = "process_cpu_seconds_total";
pub const RESIDENT_MEMORY_BYTES: &str = "process_resident_memory_bytes";
pub const VIRTUAL_MEMORY_BYTES: &str = "process_virtual_memory_bytes";
pub const START_TIME_SECONDS: &str = "process_start_time_seconds";

pub struct ProcessCollector {
    pid: Pid,
    sys: Mutex<System>,
}

impl ProcessCollector {
    pub fn new() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| MetrixError::Internal(format!("current pid unavailable: {e}")))?;
        Ok(Self {
            pid,
            sys: Mutex::new(System::new()),
        })
    }

    /// Refresh this process and write the figures into `registry`.
    ///
    /// The lock serializes collections, so the CPU counter only ever advances
    /// by the difference to what it already holds.
    pub fn collect(&self, registry: &Registry) -> Result<()> {
        let mut sys = self.sys.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let process = sys
            .process(self.pid)
            .ok_or_else(|| MetrixError::Internal(format!("process {} not found", self.pid)))?;

        // accumulated_cpu_time is in milliseconds.
        let cpu_seconds = process.accumulated_cpu_time() as f64 / 1000.0;
        let cpu = registry.get_or_create_counter(
            CPU_SECONDS_TOTAL,
            "Total user and system CPU time spent in seconds.",
            &[],
        )?;
        let seen = cpu.get(&[])?.unwrap_or(0.0);
        if cpu_seconds > seen {
            cpu.inc_by(&[], cpu_seconds - seen)?;
        }

        registry
            .get_or_create_gauge(RESIDENT_MEMORY_BYTES, "Resident memory size in bytes.", &[])?
            .set(&[], process.memory() as f64)?;
        registry
            .get_or_create_gauge(VIRTUAL_MEMORY_BYTES, "Virtual memory size in bytes.", &[])?
            .set(&[], process.virtual_memory() as f64)?;
        registry
            .get_or_create_gauge(
                START_TIME_SECONDS,
                "Start time of the process since unix epoch in seconds.",
                &[],
            )?
            .set(&[], process.start_time() as f64)?;
        Ok(())
    }
}
