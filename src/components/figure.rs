use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::style::{SeriesStyle, StyleRegistry};
use crate::{
    functions::extract::{MetricSelector, SeriesExtractor, Sweep},
    models::variant::Variant,
};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum AxisScale {
    Linear,
    Log2,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickMode {
    /// Let the renderer pick tick positions.
    Auto,
    /// Put one tick on every plotted sweep value.
    Exact,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickFormat {
    Plain,
    /// Binary byte units, e.g. `16 KiB`.
    Bytes,
}

#[derive(Clone, PartialEq, Debug)]
pub struct LineSpec {
    pub variant: Variant,
    pub selector: MetricSelector,
    pub sweep: Sweep,
    pub label: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct PanelSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub scale: AxisScale,
    pub ticks: TickMode,
    pub tick_format: TickFormat,
    pub lines: Vec<LineSpec>,
}

impl PanelSpec {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            scale: AxisScale::Linear,
            ticks: TickMode::Auto,
            tick_format: TickFormat::Plain,
            lines: Vec::new(),
        }
    }

    pub fn log2(mut self) -> Self {
        self.scale = AxisScale::Log2;
        self
    }

    pub fn exact_ticks(mut self) -> Self {
        self.ticks = TickMode::Exact;
        self
    }

    pub fn byte_ticks(mut self) -> Self {
        self.tick_format = TickFormat::Bytes;
        self
    }

    pub fn line(
        mut self,
        variant: Variant,
        selector: MetricSelector,
        sweep: Sweep,
        label: impl Into<String>,
    ) -> Self {
        self.lines.push(LineSpec {
            variant,
            selector,
            sweep,
            label: label.into(),
        });
        self
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct FigureSpec {
    pub title: String,
    /// Width and height in inches.
    pub size: (f64, f64),
    /// Rows and columns of the panel grid.
    pub grid: (usize, usize),
    pub panels: Vec<PanelSpec>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Line {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub scale: AxisScale,
    /// Forced x tick positions, ascending.
    pub ticks: Option<Vec<f64>>,
    pub tick_format: TickFormat,
    pub lines: Vec<Line>,
}

/// A composed figure, ready for a renderer.
#[derive(Clone, PartialEq, Debug)]
pub struct Figure {
    pub title: String,
    pub annotation: Option<String>,
    pub size: (f64, f64),
    pub grid: (usize, usize),
    pub panels: Vec<Panel>,
}

pub struct FigureComposer<'a> {
    extractor: SeriesExtractor<'a>,
    styles: &'a StyleRegistry,
    annotation: Option<String>,
}

impl<'a> FigureComposer<'a> {
    pub fn new(extractor: SeriesExtractor<'a>, styles: &'a StyleRegistry) -> Self {
        Self {
            extractor,
            styles,
            annotation: None,
        }
    }

    /// Attaches run metadata, printed once per figure.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn compose(&self, spec: FigureSpec) -> Figure {
        Figure {
            title: spec.title,
            annotation: self.annotation.clone(),
            size: spec.size,
            grid: spec.grid,
            panels: spec
                .panels
                .into_iter()
                .map(|panel| self.compose_panel(panel))
                .collect(),
        }
    }

    fn compose_panel(&self, spec: PanelSpec) -> Panel {
        let lines: Vec<Line> = spec
            .lines
            .iter()
            .filter_map(|line| {
                let series =
                    self.extractor
                        .extract_sweep(&line.variant, &line.selector, line.sweep);
                if series.is_empty() {
                    tracing::debug!(variant = %line.variant, panel = %spec.title, "no data, omitting line");
                    return None;
                }
                Some(Line {
                    label: line.label.clone(),
                    points: series
                        .into_iter()
                        .map(|(axis, value)| (axis.as_f64(), value))
                        .collect(),
                    style: self.styles.style(&line.variant),
                })
            })
            .collect();

        let ticks = match spec.ticks {
            TickMode::Auto => None,
            TickMode::Exact => Some(
                lines
                    .iter()
                    .flat_map(|line| line.points.iter().map(|(x, _)| *x))
                    .sorted_by(f64::total_cmp)
                    .dedup()
                    .collect(),
            ),
        };

        Panel {
            title: spec.title,
            x_label: spec.x_label,
            y_label: spec.y_label,
            scale: spec.scale,
            ticks,
            tick_format: spec.tick_format,
            lines,
        }
    }
}
