use serde::{Deserialize, Serialize};

/// One experimental strategy being compared.
///
/// `family` groups variants that were swept independently of each other, e.g.
/// the forking and the threading build of the same workers. Datasets without
/// such a split leave it empty.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Variant {
    pub family: Option<String>,
    pub name: String,
}

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            family: None,
            name: name.into(),
        }
    }

    pub fn in_family(family: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.family {
            Some(family) => write!(f, "{family}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
