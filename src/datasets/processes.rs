//! Worker benchmark comparing `fork`ed processes with `pthread` threads.
//!
//! Each program runs a CPU-bound, a memory-bound and an I/O-bound worker at
//! increasing worker counts.

use crate::{
    components::style::{LineStyle, Marker, Rgb, StyleRegistry},
    functions::load_table::{MetricColumn, TableSchema},
    models::{measurement::Metric, variant::Variant},
};

pub const PROCESSES: &str = "Program_A";
pub const THREADS: &str = "Program_B";

pub const FAMILIES: [&str; 2] = [PROCESSES, THREADS];
pub const WORKERS: [&str; 3] = ["cpu", "mem", "io"];

pub const SCHEMA: TableSchema = TableSchema {
    family: Some("Program"),
    variant: "Function",
    primary: "Count",
    secondary: None,
    metrics: &[
        MetricColumn::required(Metric::CpuPercent, &["CPU_Percent"]),
        MetricColumn::required(Metric::MemoryKb, &["Memory_KB"]),
        MetricColumn::optional(Metric::IoRead, &["IO_Read_KB", "IO_Read_KBps"]),
        MetricColumn::optional(Metric::IoWrite, &["IO_Write_KB", "IO_Write_KBps"]),
        MetricColumn::required(Metric::TimeReal, &["Exec_Time_Real"]),
        MetricColumn::required(Metric::TimeUser, &["Exec_Time_User"]),
        MetricColumn::required(Metric::TimeSys, &["Exec_Time_Sys"]),
    ],
};

/// Both families, workers in canonical order.
pub fn variants() -> Vec<Variant> {
    FAMILIES
        .into_iter()
        .flat_map(|family| {
            WORKERS
                .into_iter()
                .map(move |worker| Variant::in_family(family, worker))
        })
        .collect()
}

pub fn variants_of(family: &str) -> Vec<Variant> {
    WORKERS
        .into_iter()
        .map(|worker| Variant::in_family(family, worker))
        .collect()
}

pub fn styles() -> StyleRegistry {
    StyleRegistry::new()
        .color("cpu", Rgb::from_hex(0xe74c3c))
        .color("mem", Rgb::from_hex(0x3498db))
        .color("io", Rgb::from_hex(0x2ecc71))
        .marker(PROCESSES, Marker::Circle)
        .marker(THREADS, Marker::Square)
        .label("cpu", "CPU worker")
        .label("mem", "MEM worker")
        .label("io", "IO worker")
        .label(PROCESSES, "Process")
        .label(THREADS, "Thread")
}

/// Overlay styling: processes solid, threads dashed.
pub fn comparison_styles() -> StyleRegistry {
    styles()
        .line(PROCESSES, LineStyle::Solid)
        .line(THREADS, LineStyle::Dashed)
}
