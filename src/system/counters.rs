use std::collections::BTreeMap;

use serde::Serialize;

/// Numeric suffix of a per-core `cpuN` line.
pub type CoreId = u32;

/// Cumulative tick counters for one CPU line of the stat source.
///
/// `active` is user + nice + system + irq + softirq + steal, `total` adds
/// idle and iowait on top, so `total >= active` for every parsed line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSample {
    pub active: u64,
    pub total: u64,
}

impl CounterSample {
    pub fn new(active: u64, total: u64) -> Self {
        Self { active, total }
    }

    /// Busy fraction of the window between `previous` and `self`.
    ///
    /// An empty window yields 0.0. If either counter went backwards the
    /// window is meaningless and also yields 0.0; the caller keeps `self` as
    /// the new baseline.
    pub fn busy_fraction_since(&self, previous: &CounterSample) -> f64 {
        let (Some(active_diff), Some(total_diff)) = (
            self.active.checked_sub(previous.active),
            self.total.checked_sub(previous.total),
        ) else {
            tracing::debug!(
                prev_active = previous.active,
                prev_total = previous.total,
                active = self.active,
                total = self.total,
                "cpu counters went backwards, rebaselining"
            );
            return 0.0;
        };

        if total_diff == 0 {
            return 0.0;
        }
        (active_diff as f64 / total_diff as f64).clamp(0.0, 1.0)
    }
}

/// Parse the eight tick fields following a `cpu`/`cpuN` label.
///
/// Fields: user nice system idle iowait irq softirq steal. Guest columns
/// beyond the eighth are already folded into user/nice by the kernel and
/// are ignored.
pub fn parse_cpu_fields<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<CounterSample> {
    let mut ticks = [0u64; 8];
    for slot in ticks.iter_mut() {
        *slot = fields.next()?.parse().ok()?;
    }
    let [user, nice, system, idle, iowait, irq, softirq, steal] = ticks;

    let active = user
        .checked_add(nice)?
        .checked_add(system)?
        .checked_add(irq)?
        .checked_add(softirq)?
        .checked_add(steal)?;
    let total = active.checked_add(idle)?.checked_add(iowait)?;
    Some(CounterSample { active, total })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuLabel {
    Aggregate,
    Core(CoreId),
}

/// Classify a stat line label. Anything that is not `cpu` or `cpu<digits>`
/// (`intr`, `ctxt`, `cpufoo`, ...) is `None`.
pub fn classify_label(label: &str) -> Option<CpuLabel> {
    let suffix = label.strip_prefix("cpu")?;
    if suffix.is_empty() {
        return Some(CpuLabel::Aggregate);
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().map(CpuLabel::Core)
}

/// Parse a single stat line into its label and counters.
pub fn parse_cpu_line(line: &str) -> Option<(CpuLabel, CounterSample)> {
    let mut fields = line.split_whitespace();
    let label = classify_label(fields.next()?)?;
    let sample = parse_cpu_fields(fields)?;
    Some((label, sample))
}

/// The aggregate line of a stat source. The kernel always emits it first;
/// a first line that is not a well-formed aggregate line is treated as
/// malformed rather than searched past.
pub fn parse_aggregate(contents: &str) -> Option<CounterSample> {
    match parse_cpu_line(contents.lines().next()?)? {
        (CpuLabel::Aggregate, sample) => Some(sample),
        (CpuLabel::Core(_), _) => None,
    }
}

/// All well-formed per-core lines of a stat source, keyed by core id.
pub fn parse_per_core(contents: &str) -> BTreeMap<CoreId, CounterSample> {
    contents
        .lines()
        .filter_map(parse_cpu_line)
        .filter_map(|(label, sample)| match label {
            CpuLabel::Core(id) => Some((id, sample)),
            CpuLabel::Aggregate => None,
        })
        .collect()
}

/// First field of the uptime source, truncated to whole seconds.
pub fn parse_uptime(contents: &str) -> Option<i64> {
    let first = contents.split_whitespace().next()?;
    let seconds: f64 = first.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(seconds.trunc() as i64)
}
