//! Delta-based utilization over consecutive raw samples.
//!
//! The engine keeps the previous and current counters, and turns the window
//! between two [`UtilizationEngine::update`] calls into percentages. Every
//! accessor is total: missing sources and empty windows read as zero, with
//! availability reported separately.

use std::collections::BTreeMap;

use super::counters::{CoreId, CounterSample};
use super::sampler::RawSampler;
use super::snapshot::{CoreUsage, MemorySnapshot, UtilizationSnapshot};

pub struct UtilizationEngine<S> {
    sampler: S,
    previous_aggregate: CounterSample,
    current_aggregate: CounterSample,
    previous_cores: BTreeMap<CoreId, CounterSample>,
    current_cores: BTreeMap<CoreId, CounterSample>,
    tracked_cores: Vec<CoreId>,
    aggregate_usage_percent: f64,
    per_core_usage_fraction: Vec<f64>,
    memory: MemorySnapshot,
    cpu_available: bool,
    memory_available: bool,
    core_set_mismatch: bool,
    updates: u64,
}

impl<S: RawSampler> UtilizationEngine<S> {
    /// Seed the window with one read so the first update measures from now.
    pub fn new(sampler: S) -> Self {
        let aggregate = sampler.read_aggregate_cpu();
        let cores = sampler.read_per_core_cpu();
        let tracked_cores: Vec<CoreId> = cores.keys().copied().collect();

        tracing::debug!(
            cores = tracked_cores.len(),
            cpu_available = aggregate.is_some(),
            "utilization engine seeded"
        );

        let mut engine = UtilizationEngine {
            sampler,
            previous_aggregate: aggregate.unwrap_or_default(),
            current_aggregate: aggregate.unwrap_or_default(),
            previous_cores: cores.clone(),
            current_cores: cores,
            per_core_usage_fraction: vec![0.0; tracked_cores.len()],
            tracked_cores,
            aggregate_usage_percent: 0.0,
            memory: MemorySnapshot::default(),
            cpu_available: aggregate.is_some(),
            memory_available: false,
            core_set_mismatch: false,
            updates: 0,
        };
        engine.refresh_memory();
        engine
    }

    /// Advance the window: read, diff against the retained sample, roll
    /// forward, then refresh memory.
    pub fn update(&mut self) {
        let _span = tracing::debug_span!("engine.update", updates = self.updates).entered();

        let aggregate = self.sampler.read_aggregate_cpu();
        self.cpu_available = aggregate.is_some();
        self.current_aggregate = aggregate.unwrap_or_default();
        self.current_cores = self.sampler.read_per_core_cpu();

        self.aggregate_usage_percent = 100.0
            * self
                .current_aggregate
                .busy_fraction_since(&self.previous_aggregate);

        self.update_core_fractions();

        self.previous_aggregate = self.current_aggregate;
        self.previous_cores = self.current_cores.clone();

        self.refresh_memory();
        self.updates += 1;
    }

    /// Memory needs no window; every read stands on its own.
    fn refresh_memory(&mut self) {
        match self.sampler.read_memory() {
            Some(reading) => {
                self.memory = MemorySnapshot::from_totals(reading.total_bytes, reading.free_bytes);
                self.memory_available = true;
            }
            None => {
                self.memory = MemorySnapshot::default();
                self.memory_available = false;
            }
        }
    }

    fn update_core_fractions(&mut self) {
        let mismatch = self.current_cores.len() != self.tracked_cores.len()
            || self
                .tracked_cores
                .iter()
                .any(|id| !self.current_cores.contains_key(id));
        if mismatch != self.core_set_mismatch {
            if mismatch {
                tracing::warn!(
                    tracked = self.tracked_cores.len(),
                    reported = self.current_cores.len(),
                    "core set differs from the one detected at startup"
                );
            } else {
                tracing::info!("core set matches startup again");
            }
            self.core_set_mismatch = mismatch;
        }

        for (slot, id) in self
            .per_core_usage_fraction
            .iter_mut()
            .zip(self.tracked_cores.iter())
        {
            if let (Some(previous), Some(current)) =
                (self.previous_cores.get(id), self.current_cores.get(id))
            {
                *slot = current.busy_fraction_since(previous);
            }
        }
    }

    pub fn cpu_usage_percent(&self) -> f64 {
        self.aggregate_usage_percent
    }

    pub fn cpu_core_fractions(&self) -> &[f64] {
        &self.per_core_usage_fraction
    }

    /// Core ids index-aligned with [`Self::cpu_core_fractions`].
    pub fn core_ids(&self) -> &[CoreId] {
        &self.tracked_cores
    }

    pub fn memory(&self) -> &MemorySnapshot {
        &self.memory
    }

    pub fn memory_fraction(&self) -> f64 {
        self.memory.fraction
    }

    pub fn memory_label(&self) -> String {
        self.memory.label()
    }

    /// Reads the uptime source on every call; 0 when it is unavailable.
    pub fn uptime_seconds(&self) -> i64 {
        self.sampler.read_uptime_seconds().unwrap_or(0)
    }

    pub fn cpu_available(&self) -> bool {
        self.cpu_available
    }

    pub fn memory_available(&self) -> bool {
        self.memory_available
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn snapshot(&self) -> UtilizationSnapshot {
        UtilizationSnapshot {
            cpu_usage_percent: self.cpu_usage_percent(),
            cores: self
                .tracked_cores
                .iter()
                .zip(self.per_core_usage_fraction.iter())
                .map(|(&id, &fraction)| CoreUsage { id, fraction })
                .collect(),
            memory: self.memory,
            memory_label: self.memory_label(),
            uptime_seconds: self.uptime_seconds(),
            cpu_available: self.cpu_available,
            memory_available: self.memory_available,
            updates: self.updates,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;
    use crate::system::platform::MemoryReading;

    /// Replays queued readings; once a queue runs dry the last value repeats.
    #[derive(Default)]
    pub(crate) struct ScriptedSampler {
        aggregate: RefCell<VecDeque<Option<CounterSample>>>,
        cores: RefCell<VecDeque<BTreeMap<CoreId, CounterSample>>>,
        memory: RefCell<VecDeque<Option<MemoryReading>>>,
        pub(crate) uptime: Option<i64>,
    }

    impl ScriptedSampler {
        pub(crate) fn push_cpu(&self, aggregate: CounterSample, cores: &[CounterSample]) {
            self.aggregate.borrow_mut().push_back(Some(aggregate));
            self.cores.borrow_mut().push_back(
                cores
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (i as CoreId, *s))
                    .collect(),
            );
        }

        pub(crate) fn push_memory(&self, reading: Option<MemoryReading>) {
            self.memory.borrow_mut().push_back(reading);
        }

        fn next<T: Clone + Default>(queue: &RefCell<VecDeque<T>>) -> T {
            let mut queue = queue.borrow_mut();
            if queue.len() > 1 {
                queue.pop_front().unwrap_or_default()
            } else {
                queue.front().cloned().unwrap_or_default()
            }
        }
    }

    impl RawSampler for ScriptedSampler {
        fn read_aggregate_cpu(&self) -> Option<CounterSample> {
            Self::next(&self.aggregate)
        }

        fn read_per_core_cpu(&self) -> BTreeMap<CoreId, CounterSample> {
            Self::next(&self.cores)
        }

        fn read_memory(&self) -> Option<MemoryReading> {
            Self::next(&self.memory)
        }

        fn read_uptime_seconds(&self) -> Option<i64> {
            self.uptime
        }
    }

    fn sample(active: u64, total: u64) -> CounterSample {
        CounterSample::new(active, total)
    }

    #[test]
    fn fresh_engine_reports_zero() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(1000, 2000), &[sample(10, 20); 4]);
        let engine = UtilizationEngine::new(sampler);

        assert_eq!(engine.cpu_usage_percent(), 0.0);
        assert_eq!(engine.cpu_core_fractions(), &[0.0; 4]);
        assert_eq!(engine.memory_fraction(), 0.0);
    }

    #[test]
    fn fully_busy_window_is_one_hundred_percent() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(1000, 2000), &[]);
        sampler.push_cpu(sample(1500, 2500), &[]);
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 100.0);
    }

    #[test]
    fn unchanged_counters_are_zero_percent() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(100, 500), &[]);
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 0.0);
        assert!(!engine.cpu_usage_percent().is_nan());
    }

    #[test]
    fn idle_core_reads_zero_among_busy_ones() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(400, 1000), &[sample(100, 250); 4]);
        sampler.push_cpu(
            sample(600, 1400),
            &[
                sample(150, 350),
                sample(125, 350),
                sample(100, 250),
                sample(200, 350),
            ],
        );
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_core_fractions(), &[0.5, 0.25, 0.0, 1.0]);
        assert_eq!(engine.cpu_usage_percent(), 50.0);
    }

    #[test]
    fn window_rolls_forward() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(0, 100), &[]);
        sampler.push_cpu(sample(50, 200), &[]);
        sampler.push_cpu(sample(60, 300), &[]);
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 50.0);
        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 10.0);
        assert_eq!(engine.updates(), 2);
    }

    #[test]
    fn counter_decrease_rebaselines() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(5000, 9000), &[]);
        sampler.push_cpu(sample(10, 20), &[]);
        sampler.push_cpu(sample(30, 60), &[]);
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 0.0);
        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 50.0);
    }

    #[test]
    fn core_count_is_fixed_at_construction() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(0, 0), &[sample(0, 100); 2]);
        // Hot-plugged third core, then core 1 vanishes.
        sampler.push_cpu(sample(0, 0), &[sample(50, 200), sample(10, 200), sample(1, 2)]);
        sampler.push_cpu(sample(0, 0), &[sample(150, 300)]);
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_core_fractions(), &[0.5, 0.1]);
        engine.update();
        assert_eq!(engine.cpu_core_fractions().len(), 2);
        assert_eq!(engine.cpu_core_fractions(), &[1.0, 0.1]);
        assert_eq!(engine.core_ids(), &[0, 1]);
    }

    #[test]
    fn memory_is_recomputed_each_update() {
        let gib = 1u64 << 30;
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(0, 0), &[]);
        sampler.push_memory(Some(MemoryReading {
            total_bytes: 4 * gib,
            free_bytes: 0,
        }));
        sampler.push_memory(Some(MemoryReading {
            total_bytes: 16 * gib,
            free_bytes: 8 * gib,
        }));
        sampler.push_memory(None);
        let mut engine = UtilizationEngine::new(sampler);
        assert_eq!(engine.memory_fraction(), 1.0);

        engine.update();
        assert_eq!(engine.memory_fraction(), 0.5);
        assert_eq!(engine.memory_label(), "8.0 / 16.0 GB");
        assert!(engine.memory_available());

        engine.update();
        assert_eq!(engine.memory_fraction(), 0.0);
        assert!(!engine.memory_available());
    }

    #[test]
    fn unavailable_cpu_reads_as_zero() {
        let sampler = ScriptedSampler::default();
        sampler.aggregate.borrow_mut().push_back(None);
        let mut engine = UtilizationEngine::new(sampler);

        engine.update();
        assert_eq!(engine.cpu_usage_percent(), 0.0);
        assert!(!engine.cpu_available());
        assert!(engine.cpu_core_fractions().is_empty());
    }

    #[test]
    fn uptime_defaults_to_zero() {
        let engine = UtilizationEngine::new(ScriptedSampler::default());
        assert_eq!(engine.uptime_seconds(), 0);

        let engine = UtilizationEngine::new(ScriptedSampler {
            uptime: Some(4242),
            ..Default::default()
        });
        assert_eq!(engine.snapshot().uptime_seconds, 4242);
    }

    #[test]
    fn snapshot_mirrors_accessors() {
        let sampler = ScriptedSampler::default();
        sampler.push_cpu(sample(0, 100), &[sample(0, 50), sample(0, 50)]);
        sampler.push_cpu(sample(25, 200), &[sample(25, 100), sample(0, 100)]);
        let mut engine = UtilizationEngine::new(sampler);
        engine.update();

        let snap = engine.snapshot();
        assert_eq!(snap.cpu_usage_percent, engine.cpu_usage_percent());
        assert_eq!(snap.core_fractions().collect::<Vec<_>>(), engine.cpu_core_fractions());
        assert_eq!(snap.memory_label, engine.memory_label());
        assert_eq!(snap.updates, 1);
    }

    fn monotonic_pair() -> impl Strategy<Value = (CounterSample, CounterSample)> {
        (0u64..1 << 40, 0u64..1 << 40, 0u64..1 << 20, 0u64..1 << 20).prop_map(
            |(active, idle, d_active, d_idle)| {
                let before = CounterSample::new(active, active + idle);
                let after = CounterSample::new(active + d_active, active + idle + d_active + d_idle);
                (before, after)
            },
        )
    }

    proptest! {
        #[test]
        fn usage_percent_stays_in_range((before, after) in monotonic_pair()) {
            let sampler = ScriptedSampler::default();
            sampler.push_cpu(before, &[before]);
            sampler.push_cpu(after, &[after]);
            let mut engine = UtilizationEngine::new(sampler);
            engine.update();

            let percent = engine.cpu_usage_percent();
            prop_assert!((0.0..=100.0).contains(&percent));
            let fraction = engine.cpu_core_fractions()[0];
            prop_assert!((0.0..=1.0).contains(&fraction));
        }

        #[test]
        fn arbitrary_counters_never_escape_range(
            a in any::<u64>(), b in any::<u64>(), c in any::<u64>(), d in any::<u64>()
        ) {
            let sampler = ScriptedSampler::default();
            sampler.push_cpu(CounterSample::new(a, b), &[]);
            sampler.push_cpu(CounterSample::new(c, d), &[]);
            let mut engine = UtilizationEngine::new(sampler);
            engine.update();

            let percent = engine.cpu_usage_percent();
            prop_assert!(percent.is_finite());
            prop_assert!((0.0..=100.0).contains(&percent));
        }

        #[test]
        fn memory_fraction_stays_in_range(total in any::<u64>(), free in any::<u64>()) {
            let sampler = ScriptedSampler::default();
            sampler.push_memory(Some(MemoryReading { total_bytes: total, free_bytes: free }));
            let mut engine = UtilizationEngine::new(sampler);
            engine.update();

            let fraction = engine.memory_fraction();
            prop_assert!((0.0..=1.0).contains(&fraction));
            if total == 0 {
                prop_assert_eq!(fraction, 0.0);
            }
        }

        #[test]
        fn core_array_length_is_stable(cores in 0usize..16, ticks in 1usize..6) {
            let sampler = ScriptedSampler::default();
            for t in 0..=ticks {
                let t = t as u64;
                sampler.push_cpu(CounterSample::new(t, t * 2), &vec![CounterSample::new(t, t * 3); cores]);
            }
            let mut engine = UtilizationEngine::new(sampler);
            for _ in 0..ticks {
                engine.update();
                prop_assert_eq!(engine.cpu_core_fractions().len(), cores);
            }
        }
    }
}
