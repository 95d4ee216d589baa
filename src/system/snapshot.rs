use serde::Serialize;

use super::counters::CoreId;
use crate::format::{GIB, memory_label};

/// Memory usage derived from one instantaneous read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub fraction: f64,
}

impl MemorySnapshot {
    pub fn from_totals(total_bytes: u64, free_bytes: u64) -> Self {
        let used_bytes = total_bytes.saturating_sub(free_bytes);
        let fraction = if total_bytes > 0 {
            (used_bytes as f64 / total_bytes as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        MemorySnapshot {
            used_bytes,
            total_bytes,
            fraction,
        }
    }

    pub fn used_gib(&self) -> f64 {
        self.used_bytes as f64 / GIB
    }

    pub fn total_gib(&self) -> f64 {
        self.total_bytes as f64 / GIB
    }

    pub fn label(&self) -> String {
        memory_label(self.used_gib(), self.total_gib())
    }
}

/// Per-core utilization as published to the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoreUsage {
    pub id: CoreId,
    pub fraction: f64,
}

/// Owned copy of everything the engine derived in its last update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UtilizationSnapshot {
    pub cpu_usage_percent: f64,
    pub cores: Vec<CoreUsage>,
    pub memory: MemorySnapshot,
    pub memory_label: String,
    pub uptime_seconds: i64,
    pub cpu_available: bool,
    pub memory_available: bool,
    pub updates: u64,
}

impl UtilizationSnapshot {
    pub fn core_fractions(&self) -> impl Iterator<Item = f64> + '_ {
        self.cores.iter().map(|c| c.fraction)
    }
}
