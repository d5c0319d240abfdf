use serde::{Deserialize, Serialize};

use crate::{
    models::{
        measurement::{Metric, MetricBundle},
        variant::Variant,
        AxisValue,
    },
    store::MeasurementStore,
};

/// Metrics computed from stored fields instead of read from the input.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum DerivedMetric {
    /// CPU cycles spent per byte moved over the sampling window.
    CyclesPerByte,
}

/// Computes derived metrics on demand. Nothing is written back to the store.
#[derive(Clone, Copy, Debug)]
pub struct DerivedMetrics<'a> {
    store: &'a MeasurementStore,
    duration_seconds: f64,
}

impl<'a> DerivedMetrics<'a> {
    pub fn new(store: &'a MeasurementStore, duration_seconds: f64) -> Self {
        Self {
            store,
            duration_seconds,
        }
    }

    pub fn store(&self) -> &'a MeasurementStore {
        self.store
    }

    pub fn cycles_per_byte(
        &self,
        variant: &Variant,
        msg_size: AxisValue,
        thread_count: AxisValue,
    ) -> f64 {
        self.store
            .get(variant, msg_size, Some(thread_count))
            .map(|bundle| self.cycles_per_byte_of(bundle))
            .unwrap_or(0.0)
    }

    /// Cycles divided by the bytes moved during the sampling window.
    ///
    /// A zero or absent throughput yields zero.
    pub fn cycles_per_byte_of(&self, bundle: &MetricBundle) -> f64 {
        let Some(throughput_gbps) = bundle.get(Metric::ThroughputGbps) else {
            return 0.0;
        };
        let total_bytes = throughput_gbps * 1e9 / 8.0 * self.duration_seconds;
        if total_bytes.is_nan() || total_bytes <= 0.0 {
            return 0.0;
        }
        match bundle.get(Metric::CpuCycles) {
            Some(cycles) => cycles / total_bytes,
            None => {
                tracing::warn!("no cycle count recorded, reporting zero cycles per byte");
                0.0
            }
        }
    }

    pub fn evaluate(&self, metric: DerivedMetric, bundle: &MetricBundle) -> f64 {
        match metric {
            DerivedMetric::CyclesPerByte => self.cycles_per_byte_of(bundle),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::store::MeasurementKey;

    fn store_with(throughput: f64, cycles: f64) -> (MeasurementStore, Variant) {
        let variant = Variant::new("two_copy");
        let mut store = MeasurementStore::new();
        store.insert(
            MeasurementKey::new(variant.clone(), AxisValue(16384), Some(AxisValue(4))),
            [
                (Metric::ThroughputGbps, throughput),
                (Metric::CpuCycles, cycles),
            ]
            .into_iter()
            .collect(),
        );
        (store, variant)
    }

    #[test]
    fn divides_cycles_by_bytes_moved() {
        let (store, variant) = store_with(10.0, 1e10);
        let derived = DerivedMetrics::new(&store, 10.0);

        // 10 Gbps for 10 s moves 1.25e10 bytes.
        assert_relative_eq!(
            derived.cycles_per_byte(&variant, AxisValue(16384), AxisValue(4)),
            0.8
        );
    }

    #[test]
    fn matches_formula_for_positive_throughput() {
        for throughput in [0.5, 4.0526, 75.9788, 153.0088] {
            let cycles = 98_527_099_274.0;
            let (store, variant) = store_with(throughput, cycles);
            let derived = DerivedMetrics::new(&store, 10.0);

            assert_relative_eq!(
                derived.cycles_per_byte(&variant, AxisValue(16384), AxisValue(4)),
                cycles / (throughput * 1e9 / 8.0 * 10.0)
            );
        }
    }

    #[test]
    fn zero_throughput_reports_zero() {
        let (store, variant) = store_with(0.0, 1e10);
        let derived = DerivedMetrics::new(&store, 10.0);

        assert_eq!(
            derived.cycles_per_byte(&variant, AxisValue(16384), AxisValue(4)),
            0.0
        );
    }

    #[test]
    fn unavailable_key_reports_zero() {
        let (store, variant) = store_with(10.0, 1e10);
        let derived = DerivedMetrics::new(&store, 10.0);

        assert_eq!(
            derived.cycles_per_byte(&variant, AxisValue(1024), AxisValue(4)),
            0.0
        );
    }

    #[test]
    fn duration_is_taken_from_construction() {
        let (store, variant) = store_with(10.0, 1e10);
        let derived = DerivedMetrics::new(&store, 5.0);

        assert_relative_eq!(
            derived.cycles_per_byte(&variant, AxisValue(16384), AxisValue(4)),
            1.6
        );
    }
}
