use serde::{Deserialize, Serialize};

pub mod measurement;
pub mod variant;

/// A point along a sweep dimension: a worker count, a message size or a thread count.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AxisValue(pub u64);

impl AxisValue {
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::fmt::Display for AxisValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AxisValue {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
