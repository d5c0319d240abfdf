use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The closed set of quantities a benchmark run can report.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CpuPercent,
    MemoryKb,
    IoRead,
    IoWrite,
    TimeReal,
    TimeUser,
    TimeSys,
    ThroughputGbps,
    LatencyUs,
    CpuCycles,
    L1Misses,
    LlcMisses,
    ContextSwitches,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::CpuPercent => "cpu_percent",
            Metric::MemoryKb => "memory_kb",
            Metric::IoRead => "io_read",
            Metric::IoWrite => "io_write",
            Metric::TimeReal => "time_real",
            Metric::TimeUser => "time_user",
            Metric::TimeSys => "time_sys",
            Metric::ThroughputGbps => "throughput_gbps",
            Metric::LatencyUs => "latency_us",
            Metric::CpuCycles => "cpu_cycles",
            Metric::L1Misses => "l1_misses",
            Metric::LlcMisses => "llc_misses",
            Metric::ContextSwitches => "context_switches",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The values measured for one (variant, axis...) combination.
///
/// Only the metrics a dataset actually reports are present; [`MetricBundle::get`]
/// returns `None` for everything else.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct MetricBundle {
    values: BTreeMap<Metric, f64>,
}

impl MetricBundle {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Metric, f64)> for MetricBundle {
    fn from_iter<T: IntoIterator<Item = (Metric, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
