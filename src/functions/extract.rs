use serde::{Deserialize, Serialize};

use super::derived::{DerivedMetric, DerivedMetrics};
use crate::{
    models::{
        measurement::{Metric, MetricBundle},
        variant::Variant,
        AxisValue,
    },
    store::{MeasurementKey, MeasurementStore},
};

/// What to plot on the y axis.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum MetricSelector {
    /// A stored field divided by `scale`.
    Field { metric: Metric, scale: f64 },
    Derived(DerivedMetric),
}

impl MetricSelector {
    pub fn field(metric: Metric) -> Self {
        Self::Field { metric, scale: 1.0 }
    }

    pub fn scaled(metric: Metric, scale: f64) -> Self {
        Self::Field { metric, scale }
    }

    fn apply(&self, derived: &DerivedMetrics<'_>, bundle: &MetricBundle) -> Option<f64> {
        match *self {
            MetricSelector::Field { metric, scale } => bundle.get(metric).map(|v| v / scale),
            MetricSelector::Derived(metric) => Some(derived.evaluate(metric, bundle)),
        }
    }
}

/// Which axis varies along the x axis, and the value the other one is held at.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sweep {
    /// Sweep the primary axis. `None` matches every secondary value.
    Primary { fixed: Option<AxisValue> },
    /// Sweep the secondary axis at a fixed primary value.
    Secondary { fixed: AxisValue },
}

impl Sweep {
    fn select(&self, key: &MeasurementKey) -> Option<AxisValue> {
        match *self {
            Sweep::Primary { fixed: None } => Some(key.primary),
            Sweep::Primary { fixed: Some(fixed) } => {
                (key.secondary == Some(fixed)).then_some(key.primary)
            }
            Sweep::Secondary { fixed } => {
                if key.primary == fixed {
                    key.secondary
                } else {
                    None
                }
            }
        }
    }
}

/// Turns store entries into ordered `(axis value, metric value)` series.
#[derive(Clone, Copy, Debug)]
pub struct SeriesExtractor<'a> {
    derived: DerivedMetrics<'a>,
}

impl<'a> SeriesExtractor<'a> {
    pub fn new(derived: DerivedMetrics<'a>) -> Self {
        Self { derived }
    }

    pub fn store(&self) -> &'a MeasurementStore {
        self.derived.store()
    }

    /// Sweeps the primary axis, optionally at a fixed secondary value.
    pub fn extract(
        &self,
        variant: &Variant,
        selector: &MetricSelector,
        fixed_axis_value: Option<AxisValue>,
    ) -> Vec<(AxisValue, f64)> {
        self.extract_sweep(
            variant,
            selector,
            Sweep::Primary {
                fixed: fixed_axis_value,
            },
        )
    }

    /// Returns the matching points sorted by ascending axis value.
    ///
    /// No matching keys gives an empty series. When two keys land on the same
    /// axis value the one written last wins.
    pub fn extract_sweep(
        &self,
        variant: &Variant,
        selector: &MetricSelector,
        sweep: Sweep,
    ) -> Vec<(AxisValue, f64)> {
        let mut points: Vec<(AxisValue, u64, f64)> = self
            .store()
            .iter_ordered()
            .filter(|(key, _, _)| &key.variant == variant)
            .filter_map(|(key, seq, bundle)| {
                let axis = sweep.select(key)?;
                match selector.apply(&self.derived, bundle) {
                    Some(value) => Some((axis, seq, value)),
                    None => {
                        tracing::warn!(%variant, axis = %axis, ?selector, "metric not recorded, dropping point");
                        None
                    }
                }
            })
            .collect();

        points.sort_by_key(|(axis, seq, _)| (*axis, *seq));

        let mut series: Vec<(AxisValue, f64)> = Vec::with_capacity(points.len());
        for (axis, _, value) in points {
            match series.last_mut() {
                Some(last) if last.0 == axis => last.1 = value,
                _ => series.push((axis, value)),
            }
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn bundle(cpu: f64, mem: f64) -> MetricBundle {
        [(Metric::CpuPercent, cpu), (Metric::MemoryKb, mem)]
            .into_iter()
            .collect()
    }

    fn one_dimensional() -> MeasurementStore {
        let a = Variant::new("A");
        let mut store = MeasurementStore::new();
        store.insert(MeasurementKey::new(a.clone(), AxisValue(2), None), bundle(20.0, 200.0));
        store.insert(MeasurementKey::new(a, AxisValue(1), None), bundle(10.0, 100.0));
        store
    }

    #[test]
    fn extracts_sorted_series() {
        let store = one_dimensional();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("A"),
            &MetricSelector::field(Metric::CpuPercent),
            None,
        );
        assert_eq!(series, vec![(AxisValue(1), 10.0), (AxisValue(2), 20.0)]);
    }

    #[test]
    fn overwritten_key_is_reflected() {
        let mut store = one_dimensional();
        store.insert(
            MeasurementKey::new(Variant::new("A"), AxisValue(1), None),
            bundle(99.0, 100.0),
        );
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("A"),
            &MetricSelector::field(Metric::CpuPercent),
            None,
        );
        assert_eq!(series, vec![(AxisValue(1), 99.0), (AxisValue(2), 20.0)]);
    }

    #[test]
    fn loaded_rows_extract_with_last_row_winning() {
        use crate::functions::load_table::{load_table, MetricColumn, TableSchema};

        const SCHEMA: TableSchema = TableSchema {
            family: None,
            variant: "Variant",
            primary: "Count",
            secondary: None,
            metrics: &[MetricColumn::required(Metric::CpuPercent, &["CPU_Percent"])],
        };
        let csv = "Variant,Count,CPU_Percent\nA,1,10.0\nA,2,20.0\nA,1,99.0\n";
        let store = load_table(csv.as_bytes(), &SCHEMA, &[Variant::new("A")]).unwrap();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("A"),
            &MetricSelector::field(Metric::CpuPercent),
            None,
        );
        assert_eq!(series, vec![(AxisValue(1), 99.0), (AxisValue(2), 20.0)]);
    }

    #[test]
    fn unknown_variant_is_empty() {
        let store = one_dimensional();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("missing"),
            &MetricSelector::field(Metric::CpuPercent),
            None,
        );
        assert!(series.is_empty());
    }

    #[test]
    fn scaled_field_divides_value() {
        let store = one_dimensional();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("A"),
            &MetricSelector::scaled(Metric::MemoryKb, 100.0),
            None,
        );
        assert_eq!(series, vec![(AxisValue(1), 1.0), (AxisValue(2), 2.0)]);
    }

    #[test]
    fn absent_field_drops_points() {
        let store = one_dimensional();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("A"),
            &MetricSelector::field(Metric::LatencyUs),
            None,
        );
        assert!(series.is_empty());
    }

    fn grid() -> MeasurementStore {
        let v = Variant::new("zero_copy");
        let mut store = MeasurementStore::new();
        for (msg, threads, tp) in [
            (65536, 4, 108.0),
            (1024, 4, 5.8),
            (1024, 8, 6.5),
            (4096, 4, 14.3),
            (4096, 8, 22.8),
        ] {
            store.insert(
                MeasurementKey::new(v.clone(), AxisValue(msg), Some(AxisValue(threads))),
                [
                    (Metric::ThroughputGbps, tp),
                    (Metric::CpuCycles, tp * 1e9),
                ]
                .into_iter()
                .collect(),
            );
        }
        store
    }

    #[test]
    fn fixed_secondary_value_filters_primary_sweep() {
        let store = grid();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("zero_copy"),
            &MetricSelector::field(Metric::ThroughputGbps),
            Some(AxisValue(4)),
        );
        let axes: Vec<_> = series.iter().map(|(axis, _)| axis.0).collect();
        assert_eq!(axes, vec![1024, 4096, 65536]);
    }

    #[test]
    fn secondary_sweep_holds_primary_fixed() {
        let store = grid();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract_sweep(
            &Variant::new("zero_copy"),
            &MetricSelector::field(Metric::ThroughputGbps),
            Sweep::Secondary {
                fixed: AxisValue(4096),
            },
        );
        assert_eq!(series, vec![(AxisValue(4), 14.3), (AxisValue(8), 22.8)]);
    }

    #[test]
    fn series_are_strictly_increasing() {
        let store = grid();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        // Without a fixed value, keys sharing a primary value collapse to one point.
        let series = extractor.extract(
            &Variant::new("zero_copy"),
            &MetricSelector::field(Metric::ThroughputGbps),
            None,
        );
        assert!(series.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn tie_keeps_latest_write() {
        let store = grid();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        // (1024, 8) was written after (1024, 4).
        let series = extractor.extract(
            &Variant::new("zero_copy"),
            &MetricSelector::field(Metric::ThroughputGbps),
            None,
        );
        assert_eq!(series[0], (AxisValue(1024), 6.5));
    }

    #[test]
    fn derived_selector_uses_engine() {
        let store = grid();
        let extractor = SeriesExtractor::new(DerivedMetrics::new(&store, 10.0));

        let series = extractor.extract(
            &Variant::new("zero_copy"),
            &MetricSelector::Derived(DerivedMetric::CyclesPerByte),
            Some(AxisValue(4)),
        );
        assert_eq!(series.len(), 3);
        for (_, cpb) in series {
            // cycles = tp * 1e9, bytes = tp * 1e9 / 8 * 10
            assert_relative_eq!(cpb, 0.8);
        }
    }
}
