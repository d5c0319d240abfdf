use std::{collections::HashMap, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    error::{Error, Result},
    models::{
        measurement::{Metric, MetricBundle},
        variant::Variant,
        AxisValue,
    },
    store::{MeasurementKey, MeasurementStore},
};

/// Where a metric lives in a delimited table.
#[derive(Clone, Copy, Debug)]
pub struct MetricColumn {
    pub metric: Metric,
    /// Header names accepted for this metric, preferred name first.
    pub headers: &'static [&'static str],
    /// Optional columns default to zero when no header is present.
    pub required: bool,
}

impl MetricColumn {
    pub const fn required(metric: Metric, header: &'static [&'static str]) -> Self {
        Self {
            metric,
            headers: header,
            required: true,
        }
    }

    pub const fn optional(metric: Metric, headers: &'static [&'static str]) -> Self {
        Self {
            metric,
            headers,
            required: false,
        }
    }
}

/// Column layout of one tabular dataset.
#[derive(Clone, Copy, Debug)]
pub struct TableSchema {
    pub family: Option<&'static str>,
    pub variant: &'static str,
    pub primary: &'static str,
    pub secondary: Option<&'static str>,
    pub metrics: &'static [MetricColumn],
}

pub fn load_table_path(
    path: &Path,
    schema: &TableSchema,
    variants: &[Variant],
) -> Result<MeasurementStore> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let store = load_table(file, schema, variants).map_err(|err| match err {
        Error::Read { source, .. } => Error::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    tracing::info!(
        path = %path.display(),
        measurements = store.len(),
        "loaded measurements"
    );
    Ok(store)
}

/// Builds a store from delimited text with a header row.
///
/// Rows naming a variant outside `variants` are skipped. A missing or
/// non-numeric value in any metric column fails the whole load.
pub fn load_table<R: Read>(
    reader: R,
    schema: &TableSchema,
    variants: &[Variant],
) -> Result<MeasurementStore> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().map_err(read_error)?.clone();
    let layout = Layout::resolve(&headers, schema)?;

    let mut store = MeasurementStore::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record.map_err(read_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let variant = layout.variant(&record);
        if !variants.contains(&variant) {
            skipped += 1;
            tracing::trace!(line, %variant, "skipping unrecognized variant");
            continue;
        }

        let primary = layout.axis(&record, line, layout.primary, schema.primary)?;
        let secondary = match (layout.secondary, schema.secondary) {
            (Some(index), Some(name)) => Some(layout.axis(&record, line, index, name)?),
            _ => None,
        };

        let bundle = layout
            .metrics
            .iter()
            .map(|column| {
                let value = match column.index {
                    Some(index) => parse_number(&record, line, index, column.header)?,
                    None => 0.0,
                };
                Ok((column.metric, value))
            })
            .collect::<Result<MetricBundle>>()?;

        store.insert(MeasurementKey::new(variant, primary, secondary), bundle);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "ignored rows for unrecognized variants");
    }
    Ok(store)
}

fn read_error(source: csv::Error) -> Error {
    Error::Read {
        path: "<input>".into(),
        source,
    }
}

struct ResolvedColumn {
    metric: Metric,
    header: &'static str,
    index: Option<usize>,
}

struct Layout {
    family: Option<usize>,
    variant: usize,
    primary: usize,
    secondary: Option<usize>,
    metrics: Vec<ResolvedColumn>,
}

impl Layout {
    fn resolve(headers: &StringRecord, schema: &TableSchema) -> Result<Self> {
        let positions: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (name, index))
            .collect();
        let find = |name: &'static str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| Error::malformed_row(1, name, "is missing from the header"))
        };

        let metrics = schema
            .metrics
            .iter()
            .map(|column| {
                let found = column
                    .headers
                    .iter()
                    .enumerate()
                    .find_map(|(rank, header)| positions.get(header).map(|i| (rank, *header, *i)));
                match found {
                    Some((rank, header, index)) => {
                        if rank > 0 {
                            tracing::warn!(
                                metric = %column.metric,
                                preferred = column.headers[0],
                                used = header,
                                "reading metric from an alias column, units may differ"
                            );
                        }
                        Ok(ResolvedColumn {
                            metric: column.metric,
                            header,
                            index: Some(index),
                        })
                    }
                    None if column.required => Err(Error::malformed_row(
                        1,
                        column.headers.first().copied().unwrap_or_default(),
                        "is missing from the header",
                    )),
                    None => Ok(ResolvedColumn {
                        metric: column.metric,
                        header: column.headers.first().copied().unwrap_or_default(),
                        index: None,
                    }),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            family: schema.family.map(find).transpose()?,
            variant: find(schema.variant)?,
            primary: find(schema.primary)?,
            secondary: schema.secondary.map(find).transpose()?,
            metrics,
        })
    }

    fn variant(&self, record: &StringRecord) -> Variant {
        let name = record.get(self.variant).unwrap_or_default();
        match self.family {
            Some(index) => Variant::in_family(record.get(index).unwrap_or_default(), name),
            None => Variant::new(name),
        }
    }

    fn axis(
        &self,
        record: &StringRecord,
        line: u64,
        index: usize,
        header: &str,
    ) -> Result<AxisValue> {
        let cell = cell(record, line, index, header)?;
        cell.parse::<u64>().map(AxisValue).map_err(|_| {
            Error::malformed_row(line, header, format!("is not a whole number: `{cell}`"))
        })
    }
}

/// Short rows are read leniently so a missing trailing cell is reported by name.
fn cell<'r>(record: &'r StringRecord, line: u64, index: usize, header: &str) -> Result<&'r str> {
    match record.get(index) {
        None => Err(Error::malformed_row(line, header, "is missing")),
        Some("") => Err(Error::malformed_row(line, header, "is empty")),
        Some(cell) => Ok(cell),
    }
}

fn parse_number(record: &StringRecord, line: u64, index: usize, header: &str) -> Result<f64> {
    let cell = cell(record, line, index, header)?;
    cell.parse::<f64>()
        .map_err(|_| Error::malformed_row(line, header, format!("is not numeric: `{cell}`")))
}
