use crate::{
    error::{Error, Result},
    models::{
        measurement::{Metric, MetricBundle},
        variant::Variant,
        AxisValue,
    },
    store::{MeasurementKey, MeasurementStore},
};

/// Values of one metric, per variant name, as `[primary index][secondary index]`.
#[derive(Clone, Copy, Debug)]
pub struct MetricTable<'a> {
    pub metric: Metric,
    pub values: &'a [(&'a str, &'a [&'a [f64]])],
}

/// A dataset written down as literals, one table per metric family.
#[derive(Clone, Copy, Debug)]
pub struct NestedSource<'a> {
    pub primary: &'a [u64],
    pub secondary: &'a [u64],
    pub tables: &'a [MetricTable<'a>],
}

/// Flattens index-addressed tables into a keyed store.
///
/// Every table must have one row per primary value and one column per
/// secondary value. Variant names that are not in `variants` are ignored.
pub fn load_nested(source: &NestedSource<'_>, variants: &[Variant]) -> Result<MeasurementStore> {
    let mut store = MeasurementStore::new();

    for variant in variants {
        for (pi, primary) in source.primary.iter().enumerate() {
            for (si, secondary) in source.secondary.iter().enumerate() {
                let mut bundle = Vec::with_capacity(source.tables.len());
                for table in source.tables {
                    if let Some(value) = table.lookup(&variant.name, pi, si, source)? {
                        bundle.push((table.metric, value));
                    }
                }
                if bundle.is_empty() {
                    continue;
                }
                store.insert(
                    MeasurementKey::new(
                        variant.clone(),
                        AxisValue(*primary),
                        Some(AxisValue(*secondary)),
                    ),
                    bundle.into_iter().collect::<MetricBundle>(),
                );
            }
        }
    }

    tracing::debug!(measurements = store.len(), "loaded built-in measurements");
    Ok(store)
}

impl MetricTable<'_> {
    fn lookup(
        &self,
        variant: &str,
        pi: usize,
        si: usize,
        source: &NestedSource<'_>,
    ) -> Result<Option<f64>> {
        let Some((_, rows)) = self.values.iter().find(|(name, _)| *name == variant) else {
            return Ok(None);
        };
        if rows.len() != source.primary.len() {
            return Err(Error::malformed_table(
                self.metric,
                format!(
                    "`{variant}` has {} rows, expected {}",
                    rows.len(),
                    source.primary.len()
                ),
            ));
        }
        let row = rows[pi];
        if row.len() != source.secondary.len() {
            return Err(Error::malformed_table(
                self.metric,
                format!(
                    "`{variant}` row {pi} has {} values, expected {}",
                    row.len(),
                    source.secondary.len()
                ),
            ));
        }
        Ok(Some(row[si]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: NestedSource<'static> = NestedSource {
        primary: &[1024, 4096],
        secondary: &[1, 2],
        tables: &[
            MetricTable {
                metric: Metric::ThroughputGbps,
                values: &[
                    ("fast", &[&[1.0, 2.0], &[3.0, 4.0]]),
                    ("slow", &[&[0.5, 1.0], &[1.5, 2.0]]),
                ],
            },
            MetricTable {
                metric: Metric::CpuCycles,
                values: &[("fast", &[&[10.0, 20.0], &[30.0, 40.0]])],
            },
        ],
    };

    #[test]
    fn flattens_tables_into_keys() {
        let fast = Variant::new("fast");
        let store = load_nested(&SOURCE, &[fast.clone(), Variant::new("slow")]).unwrap();

        assert_eq!(store.len(), 8);
        let bundle = store
            .get(&fast, AxisValue(4096), Some(AxisValue(1)))
            .unwrap();
        assert_eq!(bundle.get(Metric::ThroughputGbps), Some(3.0));
        assert_eq!(bundle.get(Metric::CpuCycles), Some(30.0));
    }

    #[test]
    fn missing_family_entries_stay_absent() {
        let slow = Variant::new("slow");
        let store = load_nested(&SOURCE, &[slow.clone()]).unwrap();
        let bundle = store.get(&slow, AxisValue(1024), Some(AxisValue(2))).unwrap();

        assert_eq!(bundle.get(Metric::ThroughputGbps), Some(1.0));
        assert_eq!(bundle.get(Metric::CpuCycles), None);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let source = NestedSource {
            primary: &[1024, 4096],
            secondary: &[1, 2],
            tables: &[MetricTable {
                metric: Metric::LatencyUs,
                values: &[("fast", &[&[1.0, 2.0], &[3.0]])],
            }],
        };
        let err = load_nested(&source, &[Variant::new("fast")]).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTable {
                metric: Metric::LatencyUs,
                ..
            }
        ));
    }
}
