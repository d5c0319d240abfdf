//! Figure catalogues. Each view turns a run label into the charts it writes.

use crate::components::{figure::FigureSpec, style::StyleRegistry};

pub mod network;
pub mod processes;

/// One output file: its name, what goes in it and how its lines look.
#[derive(Clone, Debug)]
pub struct Chart {
    pub filename: String,
    pub spec: FigureSpec,
    pub styles: StyleRegistry,
}

impl Chart {
    fn new(label: &str, suffix: &str, spec: FigureSpec, styles: StyleRegistry) -> Self {
        Self {
            filename: format!("{label}_{suffix}.png"),
            spec,
            styles,
        }
    }
}
