use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::counters::{self, CoreId, CounterSample};
use super::platform::{self, MemoryReading};

/// One-shot reads of the raw kernel counters.
///
/// Implementations keep no memory of previous calls. `None` means the source
/// could not be read or did not parse; callers decide how to degrade.
pub trait RawSampler {
    fn read_aggregate_cpu(&self) -> Option<CounterSample>;
    fn read_per_core_cpu(&self) -> BTreeMap<CoreId, CounterSample>;
    fn read_memory(&self) -> Option<MemoryReading>;
    fn read_uptime_seconds(&self) -> Option<i64>;
}

/// Reads procfs text sources and the OS memory query.
#[derive(Debug, Clone)]
pub struct ProcSampler {
    stat_path: PathBuf,
    uptime_path: PathBuf,
}

impl Default for ProcSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcSampler {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Read `<root>/stat` and `<root>/uptime` instead of the live procfs.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        ProcSampler {
            stat_path: root.join("stat"),
            uptime_path: root.join("uptime"),
        }
    }

    fn read_source(path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "source unavailable");
                None
            }
        }
    }
}

impl RawSampler for ProcSampler {
    fn read_aggregate_cpu(&self) -> Option<CounterSample> {
        let contents = Self::read_source(&self.stat_path)?;
        let sample = counters::parse_aggregate(&contents);
        if sample.is_none() {
            tracing::debug!(path = %self.stat_path.display(), "malformed aggregate cpu line");
        }
        sample
    }

    fn read_per_core_cpu(&self) -> BTreeMap<CoreId, CounterSample> {
        Self::read_source(&self.stat_path)
            .map(|contents| counters::parse_per_core(&contents))
            .unwrap_or_default()
    }

    fn read_memory(&self) -> Option<MemoryReading> {
        platform::memory_reading()
    }

    fn read_uptime_seconds(&self) -> Option<i64> {
        counters::parse_uptime(&Self::read_source(&self.uptime_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root(name: &str, stat: &str, uptime: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("sysgauge_sampler_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("stat"), stat).unwrap();
        std::fs::write(root.join("uptime"), uptime).unwrap();
        root
    }

    #[test]
    fn reads_fixture_sources() {
        let root = fixture_root(
            "fixture",
            "cpu  10 0 10 80 0 0 0 0\ncpu0 5 0 5 40 0 0 0 0\ncpu1 5 0 5 40 0 0 0 0\n",
            "3600.75 7000.00\n",
        );
        let sampler = ProcSampler::with_root(&root);

        assert_eq!(sampler.read_aggregate_cpu(), Some(CounterSample::new(20, 100)));
        assert_eq!(sampler.read_per_core_cpu().len(), 2);
        assert_eq!(sampler.read_uptime_seconds(), Some(3600));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_root_degrades_to_none() {
        let sampler = ProcSampler::with_root("/nonexistent/sysgauge/proc");
        assert_eq!(sampler.read_aggregate_cpu(), None);
        assert!(sampler.read_per_core_cpu().is_empty());
        assert_eq!(sampler.read_uptime_seconds(), None);
    }

    #[test]
    fn malformed_stat_degrades_to_none() {
        let root = fixture_root("malformed", "cpu 1 2 three\n", "oops\n");
        let sampler = ProcSampler::with_root(&root);

        assert_eq!(sampler.read_aggregate_cpu(), None);
        assert!(sampler.read_per_core_cpu().is_empty());
        assert_eq!(sampler.read_uptime_seconds(), None);

        let _ = std::fs::remove_dir_all(&root);
    }
}
