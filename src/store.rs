use std::collections::BTreeMap;

use crate::models::{measurement::MetricBundle, variant::Variant, AxisValue};

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct MeasurementKey {
    pub variant: Variant,
    pub primary: AxisValue,
    pub secondary: Option<AxisValue>,
}

impl MeasurementKey {
    pub fn new(variant: Variant, primary: AxisValue, secondary: Option<AxisValue>) -> Self {
        Self {
            variant,
            primary,
            secondary,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
struct Entry {
    /// Position of the write that produced this entry.
    seq: u64,
    bundle: MetricBundle,
}

/// All measurements of one run, keyed by variant and axis values.
///
/// Inserting an existing key replaces the whole bundle.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MeasurementStore {
    entries: BTreeMap<MeasurementKey, Entry>,
    writes: u64,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bundle` under `key`, returning the bundle it replaced.
    pub fn insert(&mut self, key: MeasurementKey, bundle: MetricBundle) -> Option<MetricBundle> {
        let seq = self.writes;
        self.writes += 1;
        self.entries
            .insert(key, Entry { seq, bundle })
            .map(|previous| previous.bundle)
    }

    pub fn get(
        &self,
        variant: &Variant,
        primary: AxisValue,
        secondary: Option<AxisValue>,
    ) -> Option<&MetricBundle> {
        let key = MeasurementKey::new(variant.clone(), primary, secondary);
        self.entries.get(&key).map(|entry| &entry.bundle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MeasurementKey, &MetricBundle)> {
        self.entries.iter().map(|(key, entry)| (key, &entry.bundle))
    }

    /// Like [`MeasurementStore::iter`], with the write position of each entry.
    pub(crate) fn iter_ordered(&self) -> impl Iterator<Item = (&MeasurementKey, u64, &MetricBundle)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key, entry.seq, &entry.bundle))
    }
}
