//! Composes a catalogue of charts from a loaded store and writes them out.

use std::path::{Path, PathBuf};

use crate::{
    components::figure::FigureComposer,
    config::Config,
    datasets,
    error::Result,
    functions::{derived::DerivedMetrics, extract::SeriesExtractor},
    models::AxisValue,
    render::{FigureWriter, Renderer},
    store::MeasurementStore,
    views::{self, network::Slice, Chart},
};

/// Text printed under every figure of a run.
pub fn annotation(label: &str, system: Option<&str>) -> String {
    match system {
        Some(system) if !system.is_empty() => format!("{label} | {system}"),
        _ => label.to_owned(),
    }
}

/// Writes each chart in order. Stops at the first failure.
pub fn write_charts<R: Renderer>(
    writer: &FigureWriter<R>,
    extractor: SeriesExtractor<'_>,
    charts: Vec<Chart>,
    output_dir: &Path,
    annotation: &str,
) -> Result<Vec<PathBuf>> {
    charts
        .into_iter()
        .map(|chart| {
            let figure = FigureComposer::new(extractor, &chart.styles)
                .with_annotation(annotation)
                .compose(chart.spec);
            writer.write(&figure, output_dir, &chart.filename)
        })
        .collect()
}

pub fn processes<R: Renderer>(
    writer: &FigureWriter<R>,
    store: &MeasurementStore,
    config: &Config,
    output_dir: &Path,
    label: &str,
) -> Result<Vec<PathBuf>> {
    let extractor = SeriesExtractor::new(DerivedMetrics::new(store, config.duration_seconds));
    write_charts(
        writer,
        extractor,
        views::processes::charts(label),
        output_dir,
        &annotation(label, config.system_info.as_deref()),
    )
}

pub fn network<R: Renderer>(
    writer: &FigureWriter<R>,
    store: &MeasurementStore,
    config: &Config,
    output_dir: &Path,
    label: &str,
) -> Result<Vec<PathBuf>> {
    let extractor = SeriesExtractor::new(DerivedMetrics::new(store, config.duration_seconds));
    let slice = Slice {
        threads: AxisValue(config.threads),
        msg_size: AxisValue(config.msg_size),
    };
    let system = config
        .system_info
        .as_deref()
        .unwrap_or(datasets::network::SYSTEM_INFO);
    write_charts(
        writer,
        extractor,
        views::network::charts(label, slice),
        output_dir,
        &annotation(label, Some(system)),
    )
}
